//! Generative extraction over external LLM providers (Gemini, OpenAI,
//! Anthropic, Groq).
//!
//! Provider calls stream over SSE and are collected into one completion.
//! The gateway builds a domain prompt, makes one call and parses the answer
//! defensively; it never retries.

pub mod config;
pub mod gateway;
pub mod generator;
pub mod parse;
pub mod prompts;
pub mod providers;
pub mod types;

pub use config::LLMConfig;
pub use gateway::GenerativeExtractor;
pub use generator::{ProviderClient, TextGenerator};
pub use parse::{extract_json_object, parse_response};
pub use types::*;
