//! # Diary Generator
//!
//! Produces the memo text of a diary entry.
//!
//! Text comes from an OpenAI-compatible chat completion endpoint when one is
//! configured, and from static per-task templates otherwise. Generation never
//! fails: any problem with the external service falls back to the templates.

mod api;
mod client;
mod content;
mod error;
mod season;
mod templates;
mod weather;

pub use client::{CompletionRequest, OpenAiClient, TextCompletion, DEFAULT_API_URL};
pub use content::{ContentGenerator, GeneratorSettings};
pub use error::GeneratorError;
pub use season::Season;
pub use templates::{template_for, truncate_chars};
pub use weather::Weather;
