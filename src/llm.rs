//! Gemini HTTP client for chat generation.
//!
//! Generation runs on a blocking reqwest client; callers on the async
//! runtime go through `tokio::task::spawn_blocking`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default generation model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Request timeout for a single generation call.
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Cannot reach the generation API at {0}")]
    Connection(String),
    #[error("Generation request timed out after {0}s")]
    Timeout(u64),
    #[error("HTTP client error: {0}")]
    HttpClient(String),
    #[error("Generation API returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Failed to parse generation response: {0}")]
    ResponseParsing(String),
    #[error("Generation API returned no candidates")]
    EmptyResponse,
}

/// Text-generation seam for the chat engine. Implementations are blocking.
pub trait ChatGenerate: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Google Gemini client over the generateContent REST endpoint.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self::with_base_url(GEMINI_BASE_URL, api_key, model)
    }

    /// Point the client at a different base URL. Used by tests and by
    /// proxy deployments.
    pub fn with_base_url(base_url: &str, api_key: &str, model: &str) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl ChatGenerate for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self.client.post(&url).json(&body).send().map_err(|e| {
            if e.is_connect() {
                LlmError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                LlmError::Timeout(REQUEST_TIMEOUT_SECS)
            } else {
                LlmError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;

        let text: String = parsed
            .candidates
            .first()
            .ok_or(LlmError::EmptyResponse)?
            .content
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect();

        if text.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Mock generator for tests: returns a fixed response, or fails.
pub struct MockGenerate {
    response: String,
    fail: bool,
}

impl MockGenerate {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            response: String::new(),
            fail: true,
        }
    }
}

impl ChatGenerate for MockGenerate {
    fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        if self.fail {
            return Err(LlmError::Connection("mock".into()));
        }
        Ok(self.response.clone())
    }
}
