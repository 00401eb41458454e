use nutri_notes_core::{AnalyzerError, MealAnalyzer, MealBreakdown};
use serde_json::json;

use super::prompt::{build_prompt, parse_breakdowns};
use super::{Transport, MAX_TOKENS};

const XAI_BASE_URL: &str = "https://api.x.ai/v1";

/// Analyzer using the OpenAI compatible xAI chat completions API.
pub struct GrokAnalyzer {
    transport: Transport,
    api_key: String,
    model: String,
}

impl GrokAnalyzer {
    pub const DEFAULT_MODEL: &'static str = "grok-3";

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

impl MealAnalyzer for GrokAnalyzer {
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
        tracing::debug!(model = %self.model, meals = descriptions.len(), "Calling xAI");

        let request = self
            .transport
            .client
            .post(format!("{}/chat/completions", XAI_BASE_URL))
            .bearer_auth(&self.api_key)
            .json(&payload);
        let body = self.transport.send(request)?;

        let text = reply_text(&body)
            .ok_or_else(|| AnalyzerError::InvalidResponse("reply has no message content".into()))?;
        parse_breakdowns(text)
    }
}

fn reply_text(body: &serde_json::Value) -> Option<&str> {
    body.get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_text() {
        let body = json!({
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "[]"}}
            ]
        });
        assert_eq!(reply_text(&body), Some("[]"));
        assert_eq!(reply_text(&json!({"choices": []})), None);
    }

    #[test]
    fn test_default_model() {
        let analyzer = GrokAnalyzer::new("key", None).unwrap();
        assert_eq!(analyzer.model(), "grok-3");
    }
}
