//! Gemini request envelope.
//!
//! Responses are relayed untouched, so only the request side is typed.

use serde::Serialize;
use serde_json::Value;

/// Top-level `generateContent` request body.
#[derive(Debug, Serialize)]
pub struct GenerateContentRequest<'a> {
    pub contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Content<'a> {
    pub parts: Vec<Part<'a>>,
}

/// A text part. The text is whatever JSON the caller supplied; a missing
/// prompt leaves the part empty, an explicit `null` is sent as `null`.
#[derive(Debug, Serialize)]
pub struct Part<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<&'a Value>,
}

impl<'a> GenerateContentRequest<'a> {
    pub fn single_prompt(prompt: Option<&'a Value>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        }
    }
}
