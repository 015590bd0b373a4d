//! # kedai-core
//!
//! Core types, traits, and configuration for the kedai merchant directory.
//!
//! This crate provides the domain models, request vocabulary and
//! repository traits that the database and API crates depend on.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod search;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use search::*;
pub use traits::*;
