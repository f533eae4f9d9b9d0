//! Core types and utilities

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::SelectionConfig;
pub use error::Error;
pub use types::*;
