use nutri_notes_core::{AnalyzerError, MealAnalyzer, MealBreakdown};
use serde_json::json;

use super::prompt::{build_prompt, parse_breakdowns};
use super::{Transport, MAX_TOKENS};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Analyzer using the Anthropic Messages API.
pub struct ClaudeAnalyzer {
    transport: Transport,
    api_key: String,
    model: String,
}

impl ClaudeAnalyzer {
    pub const DEFAULT_MODEL: &'static str = "claude-3-7-sonnet-latest";

    pub fn new(api_key: impl Into<String>, model: Option<String>) -> Result<Self, AnalyzerError> {
        Ok(Self {
            transport: Transport::new()?,
            api_key: api_key.into(),
            model: model.unwrap_or_else(|| Self::DEFAULT_MODEL.to_string()),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl MealAnalyzer for ClaudeAnalyzer {
    fn meal_breakdowns(
        &self,
        descriptions: &[String],
        knowledge_base: &str,
    ) -> Result<Vec<MealBreakdown>, AnalyzerError> {
        let payload = json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "messages": [
                {"role": "user", "content": build_prompt(descriptions, knowledge_base)}
            ]
        });
        tracing::debug!(model = %self.model, meals = descriptions.len(), "Calling Anthropic");

        let request = self
            .transport
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&payload);
        let body = self.transport.send(request)?;

        let text = reply_text(&body)
            .ok_or_else(|| AnalyzerError::InvalidResponse("reply has no text content".into()))?;
        parse_breakdowns(&text)
    }
}

/// Concatenates the text blocks of a Messages API reply.
fn reply_text(body: &serde_json::Value) -> Option<String> {
    let blocks = body.get("content")?.as_array()?;
    let text: String = blocks
        .iter()
        .filter(|block| block.get("type").and_then(|t| t.as_str()) == Some("text"))
        .filter_map(|block| block.get("text").and_then(|t| t.as_str()))
        .collect();
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_text() {
        let body = json!({
            "content": [
                {"type": "text", "text": "[{\"entries\": "},
                {"type": "text", "text": "[]}]"}
            ],
            "stop_reason": "end_turn"
        });
        assert_eq!(reply_text(&body).as_deref(), Some("[{\"entries\": []}]"));
    }

    #[test]
    fn test_reply_without_text() {
        assert_eq!(reply_text(&json!({"content": []})), None);
        assert_eq!(reply_text(&json!({"id": "msg_1"})), None);
    }

    #[test]
    fn test_default_model() {
        let analyzer = ClaudeAnalyzer::new("key", None).unwrap();
        assert_eq!(analyzer.model(), "claude-3-7-sonnet-latest");
        let analyzer = ClaudeAnalyzer::new("key", Some("claude-sonnet-4-0".into())).unwrap();
        assert_eq!(analyzer.model(), "claude-sonnet-4-0");
    }
}
