//! Meal analyzers backed by hosted language models.

mod claude;
mod grok;
pub mod prompt;

pub use claude::ClaudeAnalyzer;
pub use grok::GrokAnalyzer;

use nutri_notes_core::{AnalyzerError, MealAnalyzer};
use std::time::Duration;

use crate::config::{AnalyzerConfig, AnalyzerProvider};

/// Upper bound on the length of a reply.
pub const MAX_TOKENS: u32 = 8192;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Builds the analyzer for `provider` from the configured keys.
pub fn build_analyzer(
    provider: AnalyzerProvider,
    config: &AnalyzerConfig,
) -> Result<Box<dyn MealAnalyzer>, AnalyzerError> {
    let model = config.model.clone();
    match provider {
        AnalyzerProvider::Claude => {
            let key = api_key(config.anthropic_api_key.as_deref(), "ANTHROPIC_API_KEY")?;
            Ok(Box::new(ClaudeAnalyzer::new(key, model)?))
        }
        AnalyzerProvider::Grok => {
            let key = api_key(config.xai_api_key.as_deref(), "XAI_API_KEY")?;
            Ok(Box::new(GrokAnalyzer::new(key, model)?))
        }
    }
}

fn api_key(key: Option<&str>, variable: &str) -> Result<String, AnalyzerError> {
    match key.map(str::trim) {
        Some(key) if !key.is_empty() => Ok(key.to_string()),
        _ => Err(AnalyzerError::NotConfigured(format!(
            "set {} or add the key to the config file",
            variable
        ))),
    }
}

/// HTTP client and the runtime that drives it.
///
/// [`MealAnalyzer`] is synchronous, so each analyzer blocks on its own
/// runtime while the request is in flight.
struct Transport {
    runtime: tokio::runtime::Runtime,
    client: reqwest::Client,
}

impl Transport {
    fn new() -> Result<Self, AnalyzerError> {
        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| AnalyzerError::Runtime(format!("Failed to create runtime: {}", e)))?;
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AnalyzerError::Http(e.to_string()))?;
        Ok(Self { runtime, client })
    }

    /// Sends `request` and returns the decoded JSON body of a successful reply.
    fn send(&self, request: reqwest::RequestBuilder) -> Result<serde_json::Value, AnalyzerError> {
        self.runtime.block_on(async {
            let response = request
                .send()
                .await
                .map_err(|e| AnalyzerError::Http(e.to_string()))?;
            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| AnalyzerError::Http(e.to_string()))?;

            if !status.is_success() {
                return Err(AnalyzerError::Api {
                    status: status.as_u16(),
                    message: api_error_message(&text),
                });
            }
            serde_json::from_str(&text).map_err(|e| AnalyzerError::InvalidResponse(e.to_string()))
        })
    }
}

/// Pulls the human readable message out of an error body.
fn api_error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|value| value.get("error"))
        .and_then(|error| {
            error
                .get("message")
                .and_then(|m| m.as_str())
                .or_else(|| error.as_str())
        })
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message() {
        assert_eq!(
            api_error_message(r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#),
            "invalid x-api-key"
        );
        assert_eq!(
            api_error_message(r#"{"code":"400","error":"Incorrect API key provided"}"#),
            "Incorrect API key provided"
        );
        assert_eq!(api_error_message("  Bad Gateway \n"), "Bad Gateway");
    }

    #[test]
    fn test_missing_key_is_not_configured() {
        let config = AnalyzerConfig::default();
        let result = build_analyzer(AnalyzerProvider::Grok, &config);
        match result {
            Err(AnalyzerError::NotConfigured(message)) => assert!(message.contains("XAI_API_KEY")),
            _ => panic!("expected NotConfigured"),
        }
    }

    #[test]
    fn test_blank_key_is_not_configured() {
        let config = AnalyzerConfig {
            anthropic_api_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            build_analyzer(AnalyzerProvider::Claude, &config),
            Err(AnalyzerError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_build_with_key() {
        let config = AnalyzerConfig {
            anthropic_api_key: Some("sk-ant-test".to_string()),
            ..Default::default()
        };
        assert!(build_analyzer(AnalyzerProvider::Claude, &config).is_ok());
    }
}
