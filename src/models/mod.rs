//! Data structures shared across commands.

pub mod config;
