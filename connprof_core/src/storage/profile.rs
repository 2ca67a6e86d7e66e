use std::fmt;

use serde::{Deserialize, Serialize};

/// Settings key under which the profile array lives in the global document.
pub const PROFILES_KEY: &str = "Zowe-Zosmf-Profiles";

/// A user-named connection preset.
///
/// The password is held in memory only: it is skipped by serde in both
/// directions, so the JSON looks like
/// `{ "name":"sys1", "url":"https://host:443", "username":"ibmuser", "reject_unauthorized":"true" }`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionProfile {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip)]
    pub password: Option<String>,
    /// Stored as `"true"` / `"false"` to stay readable by older clients.
    #[serde(default = "reject_by_default", with = "string_bool")]
    pub reject_unauthorized: bool,
}

fn reject_by_default() -> bool {
    true
}

impl ConnectionProfile {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            username: None,
            password: None,
            reject_unauthorized: true,
        }
    }

    /// Returns the unique, human-readable identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }
}

// Keeps secrets out of `{:?}` and therefore out of every log line.
impl fmt::Debug for ConnectionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionProfile")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("reject_unauthorized", &self.reject_unauthorized)
            .finish()
    }
}

/// `bool` <-> `"true"` / `"false"`. Native JSON booleans are accepted on read.
mod string_bool {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "true" } else { "false" })
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Bool(b) => Ok(b),
            Raw::Text(s) => match s.trim() {
                t if t.eq_ignore_ascii_case("true") => Ok(true),
                t if t.eq_ignore_ascii_case("false") => Ok(false),
                other => Err(de::Error::invalid_value(
                    de::Unexpected::Str(other),
                    &"\"true\" or \"false\"",
                )),
            },
        }
    }
}
