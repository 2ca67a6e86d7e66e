pub mod errors;
pub mod storage;
pub mod utils;
pub mod wizard;

// re‑export ergonomic entry points
pub use errors::ProfileError;
pub use storage::{ConnectionProfile, ProfileStore, SecretCache};
pub use wizard::{ConnectionWizard, WizardOutcome};
