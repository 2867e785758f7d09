//! Content generation for the game.
//!
//! Everything the game asks of the language model goes through the
//! [`ContentGenerator`] trait: JSON chat completions for tells, missions and
//! judging, and image generation for the illustrations. [`OpenAi`] is the
//! production implementation; tests plug in their own.

#[macro_use]
extern crate log;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

mod content;
mod openai;
pub mod prompts;

pub use content::*;
pub use openai::{OpenAi, OpenAiConfig};

/// Errors that can occur while talking to the content provider.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("OpenAI API key not configured")]
    NoApiKey,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("No content in response")]
    EmptyResponse,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        CompletionRequest {
            prompt: prompt.into(),
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Runs a single-message chat completion that must answer with a JSON object.
    async fn complete_json(&self, request: CompletionRequest) -> Result<Value, Error>;

    /// Generates an illustration and returns it as a `data:` URL.
    async fn generate_image(&self, prompt: &str) -> Result<String, Error>;
}
