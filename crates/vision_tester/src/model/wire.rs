//! JSON bodies exchanged with the inference server

use serde::{Deserialize, Serialize};

/// Text returned when a 200 generate response carries no `response` field
pub const NO_RESPONSE_PLACEHOLDER: &str = "No response received";

/// Body of `POST /api/generate`
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
    pub images: Vec<&'a str>,
}

impl<'a> GenerateRequest<'a> {
    /// Non-streaming request carrying a single base64 image
    pub fn new(model: &'a str, prompt: &'a str, image_base64: &'a str) -> Self {
        Self {
            model,
            prompt,
            stream: false,
            images: vec![image_base64],
        }
    }
}

/// Body of a successful `POST /api/generate`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: Option<String>,
}

impl GenerateResponse {
    pub fn into_text(self) -> String {
        self.response
            .unwrap_or_else(|| NO_RESPONSE_PLACEHOLDER.to_string())
    }
}

/// Body of a successful `GET /api/tags`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<TagEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagEntry {
    #[serde(default)]
    pub name: Option<String>,
}
