//! ReqForge OpenAI Integration
//!
//! Client library for generating requirement hierarchies with an
//! OpenAI-compatible chat completions API.

pub mod client;
pub mod error;
pub mod prompt;

pub use client::OpenAiClient;
pub use error::{Error, Result};
