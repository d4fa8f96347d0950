//! Key generation and properties-file update logic.

pub mod file_lock;
pub mod keygen;
pub mod paths;
pub mod properties;
pub mod settings;
pub mod updater;
