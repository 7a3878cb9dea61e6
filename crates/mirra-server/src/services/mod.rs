pub mod analysis;
pub mod classification;
pub mod embedding;
pub mod gemini;
pub mod generation;
pub mod insight;
pub mod persona_index;
pub mod simulation;

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use mirra::{
        ChatMessage, CompletionOptions, CompletionResponse, DomainError, LlmProvider, TokenUsage,
    };

    /// Scripted LLM provider returning queued responses in call order
    pub struct StubLlm {
        responses: Mutex<VecDeque<String>>,
    }

    impl StubLlm {
        pub fn with_responses(responses: Vec<String>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for StubLlm {
        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _options: &CompletionOptions,
        ) -> Result<CompletionResponse, DomainError> {
            let content = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| DomainError::ExternalService("stub llm exhausted".into()))?;

            Ok(CompletionResponse {
                content,
                model: "stub".to_string(),
                usage: TokenUsage::default(),
                finish_reason: None,
            })
        }

        fn provider_name(&self) -> &str {
            "stub"
        }

        fn model_id(&self) -> &str {
            "stub"
        }
    }
}
