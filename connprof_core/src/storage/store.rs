use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use log::{debug, info, warn};
use serde_json::{Map, Value};

use super::config::ConfigStore;
use super::profile::{ConnectionProfile, PROFILES_KEY};
use super::secrets::SecretCache;
use crate::errors::ProfileError;

/// Reads and writes the profile collection.
///
/// Everything except passwords goes to the settings document; passwords go
/// to the session's [`SecretCache`] and are merged back in on [`list`](Self::list).
///
/// Records this crate cannot parse, and keys it does not know, are carried
/// through every write untouched (apart from any `password` key).
#[derive(Clone)]
pub struct ProfileStore {
    config: Arc<dyn ConfigStore>,
    secrets: SecretCache,
}

impl ProfileStore {
    pub fn new(config: Arc<dyn ConfigStore>, secrets: SecretCache) -> Self {
        Self { config, secrets }
    }

    pub fn secrets(&self) -> &SecretCache {
        &self.secrets
    }

    /// The persisted array as raw JSON; anything else reads as empty.
    async fn read_records(&self) -> Result<Vec<Value>, ProfileError> {
        match self.config.read(PROFILES_KEY).await? {
            None => Ok(Vec::new()),
            Some(Value::Array(records)) => Ok(records),
            Some(other) => {
                warn!("Ignoring {PROFILES_KEY}: expected an array, found {other}");
                Ok(Vec::new())
            }
        }
    }

    async fn write_records(&self, records: Vec<Value>) -> Result<(), ProfileError> {
        let records = records.into_iter().map(strip_password).collect();
        self.config.write(PROFILES_KEY, Value::Array(records)).await
    }

    /// Returns every stored profile (skips malformed records with a warning).
    ///
    /// Profiles with a cached secret come back with `password` filled in.
    /// Nothing is written back.
    pub async fn list(&self) -> Result<Vec<ConnectionProfile>, ProfileError> {
        let records = self.read_records().await?;
        let mut out = Vec::with_capacity(records.len());
        for record in records {
            match serde_json::from_value::<ConnectionProfile>(record) {
                Ok(mut profile) => {
                    if let Some(password) = self.secrets.get(&profile.name).await {
                        profile.password = Some(password);
                    }
                    out.push(profile);
                }
                Err(e) => warn!("Skipping malformed profile record: {e}"),
            }
        }
        debug!("Listed {} profile(s)", out.len());
        Ok(out)
    }

    /// Every name present in the document, including records [`list`](Self::list) skips.
    pub async fn stored_names(&self) -> Result<Vec<String>, ProfileError> {
        Ok(self
            .read_records()
            .await?
            .iter()
            .filter_map(record_name)
            .map(str::to_owned)
            .collect())
    }

    /// Look up a single profile by name.
    pub async fn find(&self, name: &str) -> Result<Option<ConnectionProfile>, ProfileError> {
        Ok(self.list().await?.into_iter().find(|p| p.name() == name))
    }

    /// Replace the persisted collection with `profiles`.
    ///
    /// This is not a merge: pass the complete collection, as returned by
    /// [`list`](Self::list) and then modified. A listed profile missing from
    /// `profiles` is removed. Records `list` could not parse stay where they
    /// are, and their names still count as taken. Unknown keys on a kept
    /// record survive. Passwords carried by `profiles` are moved into the
    /// secret cache once the write has succeeded; the persisted records never
    /// contain a `password` key.
    pub async fn update(&self, profiles: &[ConnectionProfile]) -> Result<(), ProfileError> {
        let mut incoming: HashMap<&str, &ConnectionProfile> =
            HashMap::with_capacity(profiles.len());
        for profile in profiles {
            if profile.name.is_empty() {
                return Err(ProfileError::InvalidProfile(
                    "profile name must not be empty".into(),
                ));
            }
            if incoming.insert(profile.name.as_str(), profile).is_some() {
                return Err(ProfileError::DuplicateName(profile.name.clone()));
            }
        }

        let mut out = Vec::with_capacity(profiles.len());
        let mut written: HashSet<&str> = HashSet::with_capacity(profiles.len());
        for record in self.read_records().await? {
            if serde_json::from_value::<ConnectionProfile>(record.clone()).is_err() {
                if let Some(name) = record_name(&record) {
                    if incoming.contains_key(name) {
                        return Err(ProfileError::DuplicateName(name.to_owned()));
                    }
                }
                out.push(record);
                continue;
            }
            // Parsable records are either replaced in place or dropped.
            let Some(name) = record_name(&record) else {
                continue;
            };
            if let Some((&key, profile)) = incoming.get_key_value(name) {
                if written.insert(key) {
                    out.push(merge_record(record, profile)?);
                }
            }
        }
        for profile in profiles {
            if written.insert(profile.name.as_str()) {
                out.push(serde_json::to_value(profile)?);
            }
        }

        self.write_records(out).await?;

        for profile in profiles {
            if let Some(password) = &profile.password {
                self.secrets.insert(profile.name.as_str(), password.as_str()).await;
            }
        }
        info!("Saved {} profile(s)", profiles.len());
        Ok(())
    }

    /// Delete a preset (`Ok(true)` if removed, `Ok(false)` if it didn't exist).
    ///
    /// Works on records `list` skips too. The cached secret for `name` is
    /// dropped as well.
    pub async fn delete(&self, name: &str) -> Result<bool, ProfileError> {
        let mut records = self.read_records().await?;
        let before = records.len();
        records.retain(|r| record_name(r) != Some(name));
        if records.len() == before {
            return Ok(false);
        }

        self.write_records(records).await?;
        self.secrets.remove(name).await;
        info!("Deleted profile {name:?}");
        Ok(true)
    }
}

fn record_name(record: &Value) -> Option<&str> {
    record.get("name").and_then(Value::as_str)
}

fn strip_password(mut record: Value) -> Value {
    if let Value::Object(map) = &mut record {
        map.remove("password");
    }
    record
}

/// Overlays the profile's fields on the stored record, keeping unknown keys.
fn merge_record(stored: Value, profile: &ConnectionProfile) -> Result<Value, ProfileError> {
    let mut merged = match stored {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    // absent in the serialised profile when cleared
    merged.remove("username");
    if let Value::Object(fields) = serde_json::to_value(profile)? {
        merged.extend(fields);
    }
    Ok(Value::Object(merged))
}
