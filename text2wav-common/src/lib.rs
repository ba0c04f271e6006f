//! # text2wav Common Library
//!
//! Shared code for the text2wav workspace including:
//! - Error types
//! - Bootstrap configuration (TOML) and config file discovery
//! - Timestamp utilities

pub mod config;
pub mod error;
pub mod time;

pub use error::{Error, Result};
