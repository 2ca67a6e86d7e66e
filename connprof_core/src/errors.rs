use std::fmt::{self, Display};

/// A central error enum for profile storage failures.
///
/// Only store-level problems end up here. Cancelled prompts and duplicate
/// names seen by the wizard are reported to the user and never become errors.
#[derive(Debug)]
pub enum ProfileError {
    IoError(std::io::Error),
    Serde(serde_json::Error),
    /// The settings document exists but cannot be used.
    Config(String),
    /// More than one record in a collection carries this name.
    DuplicateName(String),
    /// A record that may not be persisted, e.g. one with an empty name.
    InvalidProfile(String),
    Other(String),
}

/// Convert from std::io::Error.
impl From<std::io::Error> for ProfileError {
    fn from(err: std::io::Error) -> ProfileError {
        ProfileError::IoError(err)
    }
}

/// Convert from serde_json::Error.
/// Without this, `?` won't work on `serde_json::to_*` / `from_*` calls.
impl From<serde_json::Error> for ProfileError {
    fn from(err: serde_json::Error) -> Self {
        ProfileError::Serde(err)
    }
}

impl Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileError::IoError(e) => write!(f, "IO error: {}", e),
            ProfileError::Serde(e) => write!(f, "Serialization error: {}", e),
            ProfileError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ProfileError::DuplicateName(name) => {
                write!(f, "Duplicate profile name: {}", name)
            }
            ProfileError::InvalidProfile(msg) => write!(f, "Invalid profile: {}", msg),
            ProfileError::Other(msg) => write!(f, "Other error: {}", msg),
        }
    }
}

impl std::error::Error for ProfileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProfileError::IoError(e) => Some(e),
            ProfileError::Serde(e) => Some(e),
            _ => None,
        }
    }
}
