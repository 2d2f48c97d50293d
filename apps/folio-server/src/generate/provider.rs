//! Image generation providers
//!
//! Defines the generator trait and the Gemini implementation.

use std::io::Cursor;

use async_trait::async_trait;
use base64::Engine;
use image::ImageFormat;

use super::types::{GenerateContentResponse, GenerationError};
use crate::config::GeminiConfig;

/// Image generator trait
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Short provider name for logs
    fn name(&self) -> &'static str;

    /// Generate an image for `prompt`, returning PNG bytes
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, GenerationError>;
}

/// Gemini `generateContent` provider requesting mixed text and image output
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiGenerator {
    pub fn new(config: &GeminiConfig) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ImageGenerator for GeminiGenerator {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingApiKey)?;

        let request = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseModalities": ["TEXT", "IMAGE"] }
        });

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "Requesting image from Gemini");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api { status, body });
        }

        let result: GenerateContentResponse = response.json().await?;

        let inline = result
            .first_inline_data()
            .ok_or(GenerationError::NoImage)?;
        let raw = base64::engine::general_purpose::STANDARD.decode(inline.data.as_bytes())?;

        tracing::debug!(
            mime_type = inline.mime_type.as_deref().unwrap_or("unknown"),
            bytes = raw.len(),
            "Received inline image"
        );

        tokio::task::spawn_blocking(move || reencode_png(&raw))
            .await
            .map_err(|e| GenerationError::Join(e.to_string()))?
    }
}

/// Decode any supported raster format and re-encode it as PNG
pub fn reencode_png(raw: &[u8]) -> Result<Vec<u8>, GenerationError> {
    let image = image::load_from_memory(raw)?;
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}
