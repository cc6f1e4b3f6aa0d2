//! # promptlift Provider - Gemini
//!
//! Prompt enhancement through Google Gemini's `generateContent` endpoint.

mod client;
mod enhancer;
mod template;
mod types;

pub use client::{GeminiClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use enhancer::GeminiEnhancer;
pub use template::{render_prompt, ENHANCE_TEMPLATE};
pub use types::*;
