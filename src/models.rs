//! Data models and structures
//!
//! Defines the request/response shapes exchanged with the proxy endpoint,
//! the page content consumed by the client, and runtime configuration.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of a `POST /api/generate` call.
///
/// The server side accepts any JSON value in `prompt` and forwards it
/// untouched; the client always sends a string. A missing field is `None`,
/// an explicit `null` is `Some(Value::Null)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptRequest {
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub prompt: Option<Value>,
}

impl PromptRequest {
    pub fn new(prompt: &str) -> Self {
        Self {
            prompt: Some(Value::String(prompt.to_string())),
        }
    }
}

// Only called when the field is present, so `null` stays distinct from absent.
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Opaque `generateContent` response as relayed by the proxy.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct GenerationResult(pub Value);

impl GenerationResult {
    /// Text of the first part of the first candidate, if present.
    pub fn text(&self) -> Option<&str> {
        self.0
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectCard {
    pub title: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

/// Names the chat assistant introduces itself with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Persona {
    pub owner: String,
    pub assistant_name: String,
}

// Configuration
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-preview-05-20";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_PROXY_URL: &str = "http://localhost:3000/api/generate";

#[derive(Debug, Clone)]
pub struct Config {
    /// Not validated: an empty key surfaces as an upstream auth failure.
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub port: u16,
    pub proxy_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: String::new(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            port: DEFAULT_PORT,
            proxy_url: DEFAULT_PROXY_URL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                crate::Error::Config(format!("PORT must be a valid port number: {}", e))
            })?,
            None => defaults.port,
        };

        Ok(Self {
            gemini_api_key: lookup("GEMINI_API_KEY").unwrap_or(defaults.gemini_api_key),
            gemini_model: lookup("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: lookup("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            port,
            proxy_url: lookup("PROXY_URL").unwrap_or(defaults.proxy_url),
        })
    }
}
