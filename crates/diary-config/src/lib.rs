//! # Diary Config
//!
//! Configuration management for the farm diary writer.
//!
//! A [`DiaryConfig`] is loaded once at startup, validated eagerly and then
//! treated as an immutable snapshot. Changes such as a resumed start date
//! produce a new snapshot instead of mutating the old one.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
