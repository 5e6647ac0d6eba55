//! AI plate-idea collaborator.
//!
//! A thin client for a text-generation endpoint: the user describes
//! themselves or their car, the model answers with up to five plate-text
//! ideas plus one-line reasonings, strict-JSON-shaped. The feature is
//! silently disabled when no API credential is configured, and every
//! failure collapses to "no suggestions" after logging; the assistant
//! must never block the configurator.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

/// Credential environment variable; absence disables the feature.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";

pub const MAX_SUGGESTIONS: usize = 5;
/// Plate ideas are capped below the 8-character plate limit to leave
/// room for a user tweak.
pub const MAX_SUGGESTION_LEN: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlateSuggestion {
    pub text: String,
    pub reasoning: String,
}

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("response carried no content")]
    Empty,
}

#[derive(Clone)]
pub struct SuggestionClient {
    api_key: Option<String>,
    endpoint: String,
}

impl SuggestionClient {
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty());
        Self {
            api_key,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// A client with no credential; `generate` always returns nothing.
    pub fn disabled() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Ask for plate ideas. Blocking; run on a worker thread. Missing
    /// credential or any transport/parse failure yields an empty list.
    pub fn generate(&self, user_input: &str) -> Vec<PlateSuggestion> {
        let Some(api_key) = &self.api_key else {
            return Vec::new();
        };
        match self.request(api_key, user_input) {
            Ok(suggestions) => sanitize_suggestions(suggestions),
            Err(err) => {
                log::warn!("plate idea request failed: {err}");
                Vec::new()
            }
        }
    }

    fn request(&self, api_key: &str, user_input: &str) -> Result<Vec<PlateSuggestion>, SuggestError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        let prompt = format!(
            "Generate 5 creative custom license plate text ideas (max 7 characters, \
             alphanumeric only, no special symbols) based on this user input: \"{user_input}\". \
             Also provide a very short reasoning for each. The output must be strict JSON."
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "text": { "type": "STRING" },
                            "reasoning": { "type": "STRING" }
                        },
                        "required": ["text", "reasoning"]
                    }
                }
            }
        });

        let response = client
            .post(format!("{}?key={}", self.endpoint, api_key))
            .json(&body)
            .send()?;
        if !response.status().is_success() {
            return Err(SuggestError::Status(response.status()));
        }

        let value: serde_json::Value = response.json()?;
        let text = value["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or(SuggestError::Empty)?;
        Ok(serde_json::from_str(text)?)
    }
}

/// Enforce the response contract regardless of what the model returned:
/// alphanumeric only, at most 7 characters, uppercase, at most 5 items.
pub fn sanitize_suggestions(suggestions: Vec<PlateSuggestion>) -> Vec<PlateSuggestion> {
    static NON_ALNUM: Lazy<Regex> =
        Lazy::new(|| Regex::new("[^A-Za-z0-9]").expect("static pattern"));

    suggestions
        .into_iter()
        .filter_map(|suggestion| {
            let text: String = NON_ALNUM
                .replace_all(&suggestion.text, "")
                .to_uppercase()
                .chars()
                .take(MAX_SUGGESTION_LEN)
                .collect();
            if text.is_empty() {
                None
            } else {
                Some(PlateSuggestion {
                    text,
                    reasoning: suggestion.reasoning,
                })
            }
        })
        .take(MAX_SUGGESTIONS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(text: &str) -> PlateSuggestion {
        PlateSuggestion {
            text: text.to_string(),
            reasoning: "because".to_string(),
        }
    }

    #[test]
    fn test_disabled_client_returns_empty_without_error() {
        let client = SuggestionClient::disabled();
        assert!(!client.is_enabled());
        assert!(client.generate("David loves BMW").is_empty());
    }

    #[test]
    fn test_sanitize_strips_symbols_and_uppercases() {
        let cleaned = sanitize_suggestions(vec![suggestion("dar-k kn!ight")]);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].text, "DARKKNI");
        assert_eq!(cleaned[0].text.chars().count(), MAX_SUGGESTION_LEN);
    }

    #[test]
    fn test_sanitize_caps_list_at_five() {
        let many = (0..9).map(|i| suggestion(&format!("IDEA{i}"))).collect();
        let cleaned = sanitize_suggestions(many);
        assert_eq!(cleaned.len(), MAX_SUGGESTIONS);
    }

    #[test]
    fn test_sanitize_drops_entries_with_no_usable_text() {
        let cleaned = sanitize_suggestions(vec![suggestion("!!!"), suggestion("OK42")]);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].text, "OK42");
    }
}
