//! LLM-backed pros and cons narrative generation

use crate::error::{MarketError, Result};
use crate::providers::NarrativeGenerator;
use analyst_core::{AnalysisType, Fundamentals};
use analyst_llm::{ChatMessage, ChatRequest, LLMProvider};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

const DEFAULT_MAX_TOKENS: usize = 1024;

/// Generates the pros and cons narrative through a chat completion model
pub struct LlmNarrativeGenerator {
    provider: Arc<dyn LLMProvider>,
    model: String,
    max_tokens: usize,
}

impl LlmNarrativeGenerator {
    /// Create a generator using `model` on the given provider
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Cap the number of completion tokens requested per analysis
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Build the analysis prompt sent to the model
///
/// Fundamentals are embedded as pretty-printed JSON so the model sees the
/// same metric labels that appear in reports.
fn build_prompt(
    fundamentals: &Fundamentals,
    analysis_type: AnalysisType,
    custom_prompt: &str,
) -> Result<String> {
    let fundamentals_json = serde_json::to_string_pretty(fundamentals)?;
    Ok(format!(
        "Analyze this stock as a {analysis_type} investment:\n{fundamentals_json}\n\nCustom Input: {custom_prompt}"
    ))
}

#[async_trait]
impl NarrativeGenerator for LlmNarrativeGenerator {
    async fn narrative(
        &self,
        fundamentals: &Fundamentals,
        analysis_type: AnalysisType,
        custom_prompt: &str,
    ) -> Result<String> {
        let prompt = build_prompt(fundamentals, analysis_type, custom_prompt)?;

        debug!(model = %self.model, %analysis_type, "requesting pros and cons narrative");

        let request = ChatRequest::builder(&self.model)
            .add_message(ChatMessage::user(prompt))
            .max_tokens(self.max_tokens)
            .build();

        let response = self.provider.complete(request).await?;

        if response.content.trim().is_empty() {
            return Err(MarketError::ApiError(
                "model returned an empty analysis".to_string(),
            ));
        }

        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analyst_llm::{ChatResponse, LLMError};
    use std::sync::Mutex;

    struct FakeProvider {
        reply: String,
        last_request: Mutex<Option<ChatRequest>>,
    }

    impl FakeProvider {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                last_request: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl LLMProvider for FakeProvider {
        async fn complete(&self, request: ChatRequest) -> analyst_llm::Result<ChatResponse> {
            let reply = self.reply.clone();
            *self.last_request.lock().unwrap() = Some(request);
            if reply == "fail" {
                return Err(LLMError::RequestFailed("connection refused".to_string()));
            }
            Ok(ChatResponse {
                content: reply,
                usage: None,
            })
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn sample_fundamentals() -> Fundamentals {
        Fundamentals {
            market_cap: Some(3_000_000_000_000.0),
            pe_ratio: Some(28.5),
            revenue: None,
            eps: Some(6.57),
            debt_to_equity: None,
        }
    }

    #[test]
    fn test_prompt_format() {
        let prompt = build_prompt(
            &sample_fundamentals(),
            AnalysisType::Growth,
            "Focus on long-term investment potential.",
        )
        .unwrap();

        assert!(prompt.starts_with("Analyze this stock as a growth investment:\n"));
        assert!(prompt.contains("\"P/E Ratio\": 28.5"));
        assert!(prompt.contains("\"Revenue\": null"));
        assert!(prompt.ends_with("\n\nCustom Input: Focus on long-term investment potential."));
    }

    #[tokio::test]
    async fn test_narrative_returns_model_content() {
        let provider = Arc::new(FakeProvider::new("Pros:\n- Solid balance sheet"));
        let generator = LlmNarrativeGenerator::new(provider.clone(), "llama3.1");

        let narrative = generator
            .narrative(&sample_fundamentals(), AnalysisType::Value, "")
            .await
            .unwrap();

        assert_eq!(narrative, "Pros:\n- Solid balance sheet");

        let request = provider.last_request.lock().unwrap().take().unwrap();
        assert_eq!(request.model, "llama3.1");
        assert_eq!(request.messages.len(), 1);
        assert!(request.messages[0]
            .content
            .contains("Analyze this stock as a value investment:"));
    }

    #[tokio::test]
    async fn test_empty_reply_is_an_error() {
        let provider = Arc::new(FakeProvider::new("   \n"));
        let generator = LlmNarrativeGenerator::new(provider, "llama3.1");

        let err = generator
            .narrative(&Fundamentals::default(), AnalysisType::General, "")
            .await
            .unwrap_err();

        assert!(matches!(err, MarketError::ApiError(_)));
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let provider = Arc::new(FakeProvider::new("fail"));
        let generator = LlmNarrativeGenerator::new(provider, "llama3.1");

        let err = generator
            .narrative(&Fundamentals::default(), AnalysisType::General, "")
            .await
            .unwrap_err();

        assert!(matches!(err, MarketError::LlmError(_)));
    }
}
