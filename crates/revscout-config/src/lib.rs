//! # revscout Config
//!
//! Configuration for a review crawl: inference provider credentials, crawl
//! timeouts and limits, and browser launch settings. Loaded from TOML with
//! `${VAR}` substitution, then overridden from the process environment.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
