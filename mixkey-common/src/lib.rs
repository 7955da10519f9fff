//! # MixKey Common Library
//!
//! Shared code for the MixKey workspace:
//! - Common error type and `Result` alias
//! - Layered configuration loading (TOML file, environment, defaults)

pub mod config;
pub mod error;

pub use error::{Error, Result};
