//! Insight generation - pipeline step 6
//!
//! Free-text marketing insights for one representative consumer per
//! archetype. The output stays markdown; the frontend renders it as-is.

use std::sync::Arc;

use mirra::{DomainError, LlmProvider};

/// Generates marketing insights for representative consumers
pub struct InsightGenerator {
    llm: Arc<dyn LlmProvider>,
}

impl InsightGenerator {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Generate insights for one consumer
    pub async fn generate(
        &self,
        product_description: &str,
        archetype: &str,
        persona_summary: &str,
    ) -> Result<String, DomainError> {
        let prompt = format!(
            r#"You are a marketing strategist. A consumer of the "{archetype}" archetype decided they would buy the product below. Write concise marketing insights about this consumer:
1. What drew them to the product
2. What objections nearly stopped them
3. Which messages and channels would reach more consumers like them

## Product
{product}

## Consumer
{summary}

Write well-structured markdown. No preamble."#,
            archetype = archetype,
            product = product_description,
            summary = persona_summary
        );

        self.llm.complete_simple(&prompt).await
    }
}
