//! Configuration for the Zoltar relay.
//!
//! Everything is sourced from the process environment (optionally seeded
//! from a `.env` file by the binary). Missing OAuth credentials are a
//! startup-fatal [`ConfigError`].

pub mod env;
pub mod error;
pub mod types;

pub use error::{ConfigError, Result};
pub use types::*;
