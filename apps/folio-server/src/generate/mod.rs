//! Image generation
//!
//! Turns a prompt into PNG bytes through a remote generative model. The
//! Gemini provider makes exactly one request per call; there is no retry.

mod provider;
mod types;

pub use provider::{reencode_png, GeminiGenerator, ImageGenerator};
pub use types::{GenerateContentResponse, GenerationError};
