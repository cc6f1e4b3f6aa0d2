//! # promptlift Config
//!
//! Configuration loading and the persisted key-value store for promptlift.

mod error;
mod loader;
mod schema;
mod store;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use store::{
    CredentialStore, FileStore, KeyValueStore, MemoryStore, CREDENTIAL_ENV_VAR,
};
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
