pub mod config;
pub mod profile;
pub mod secrets;
pub mod store;

pub use config::{ConfigStore, JsonFileConfig, MemoryConfig};
pub use profile::{ConnectionProfile, PROFILES_KEY};
pub use secrets::SecretCache;
pub use store::ProfileStore;
