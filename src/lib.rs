//! API key generator for Spring `application.properties` files.
//!
//! Generates random alphanumeric keys from the operating system's entropy
//! source and appends them to the comma-separated `api.security.keys`
//! property, leaving every other line of the file as it was.
//!
//! ## Modules
//! - `cli` — Command-line handlers
//! - `core` — Key generation, properties parsing, file update, path resolution
//! - `models` — Configuration file structures
//! - `util` — Filesystem and logging helpers

pub mod cli;
pub mod constants;
pub mod core;
pub mod error;
pub mod models;
pub mod util;

pub use crate::core::keygen::{generate, generate_token, EntropySource, Mapping, OsEntropy, Token};
pub use crate::core::properties::{KeyLineChange, PropertiesDocument};
pub use crate::core::updater::{append_key, append_key_with, UpdateReport, UpdateRequest, UpdateWarning};
pub use crate::error::KeygenError;
pub use crate::models::config::WriteMode;
