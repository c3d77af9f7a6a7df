use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::error::Error;
use std::fmt;
use std::time::Duration;

const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug)]
pub enum GeminiError {
    EnvironmentError(String),
    HttpError(reqwest::Error),
    RateLimited,
    ResponseError(String),
}

impl fmt::Display for GeminiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeminiError::EnvironmentError(msg) => write!(f, "Environment error: {}", msg),
            GeminiError::HttpError(err) => write!(f, "HTTP error: {}", err),
            GeminiError::RateLimited => write!(f, "Rate limited by the Gemini API"),
            GeminiError::ResponseError(msg) => write!(f, "Response error: {}", msg),
        }
    }
}

impl Error for GeminiError {}

impl From<reqwest::Error> for GeminiError {
    fn from(err: reqwest::Error) -> Self {
        GeminiError::HttpError(err)
    }
}

/// Thin client for the Gemini `generateContent` endpoint.
///
/// Callers that expect JSON back are responsible for parsing it themselves;
/// the provider offers no structured-output contract here.
#[derive(Clone)]
pub struct GeminiService {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiService {
    pub fn new() -> Result<Self, GeminiError> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| GeminiError::EnvironmentError("GEMINI_API_KEY not set".to_string()))?;

        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    pub async fn generate_text(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
        max_output_tokens: u32,
        temperature: f32,
    ) -> Result<String, GeminiError> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            system_instruction: system_instruction.map(|text| Content {
                parts: vec![Part {
                    text: text.to_string(),
                }],
            }),
            generation_config: GenerationConfig {
                temperature,
                max_output_tokens,
            },
        };

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(GeminiError::RateLimited);
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GeminiError::ResponseError(format!(
                "Generation request failed with status {}: {}",
                status, error_text
            )));
        }

        let generated: GenerateContentResponse = response.json().await.map_err(|e| {
            GeminiError::ResponseError(format!("Failed to parse response: {}", e))
        })?;

        let text = generated
            .candidates
            .and_then(|mut candidates| {
                if candidates.is_empty() {
                    None
                } else {
                    candidates.swap_remove(0).content
                }
            })
            .and_then(|content| content.parts)
            .and_then(|parts| parts.into_iter().find_map(|part| part.text))
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GeminiError::ResponseError(
                "Response contained no generated text".to_string(),
            ));
        }

        Ok(text)
    }
}

/// Strip a Markdown code fence the model may have wrapped around a JSON
/// payload. Returns the trimmed input when no fence is present.
pub fn extract_json_payload(text: &str) -> String {
    if let Ok(re) = Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```") {
        if let Some(caps) = re.captures(text) {
            return caps[1].to_string();
        }
    }
    text.trim().to_string()
}
