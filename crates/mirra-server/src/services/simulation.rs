//! Purchase simulation - pipeline step 4
//!
//! One LLM call per cohort persona: would this person buy the product?
//! Individual failures are collected, not fatal.

use std::sync::Arc;

use serde::Deserialize;

use mirra::{Decision, DecisionRecord, DomainError, LlmProvider, Persona};

use crate::services::gemini::parse_model_json;

/// Simulates purchase decisions for dataset personas
pub struct PurchaseSimulator {
    llm: Arc<dyn LlmProvider>,
}

#[derive(Debug, Deserialize)]
struct RawDecision {
    decision: String,
    #[serde(default)]
    reason: String,
}

impl PurchaseSimulator {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Ask for one persona's purchase decision
    pub async fn simulate(
        &self,
        product_description: &str,
        persona: &Persona,
    ) -> Result<DecisionRecord, DomainError> {
        let prompt = format!(
            r#"You are roleplaying a real consumer deciding whether to buy a product.

## Consumer
Age: {age}
Gender: {gender}
Profile: {summary}

## Product
{product}

## Output
Decide as this consumer would, not as an optimist. Respond with a JSON object only:
{{"decision": "yes" | "no", "reason": "<one sentence in the consumer's voice>"}}"#,
            age = persona.age,
            gender = persona.gender,
            summary = persona.summary,
            product = product_description
        );

        let text = self.llm.complete_simple(&prompt).await?;
        let raw: RawDecision = parse_model_json(&text)?;

        let decision: Decision = raw
            .decision
            .parse()
            .map_err(DomainError::ModelOutput)?;

        Ok(DecisionRecord {
            persona_id: persona.id,
            decision,
            reason: raw.reason,
            age: persona.age,
            persona_summary: persona.summary.clone(),
        })
    }

    /// Simulate the whole cohort sequentially, collecting per-persona errors
    pub async fn simulate_cohort(
        &self,
        product_description: &str,
        personas: &[Persona],
    ) -> (Vec<DecisionRecord>, Vec<String>) {
        let mut records = Vec::with_capacity(personas.len());
        let mut errors = Vec::new();

        for persona in personas {
            match self.simulate(product_description, persona).await {
                Ok(record) => records.push(record),
                Err(e) => {
                    let message = format!("Persona {}: {}", persona.id, e);
                    tracing::warn!("Purchase simulation error: {}", message);
                    errors.push(message);
                }
            }
        }

        (records, errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::StubLlm;
    use mirra::Gender;

    fn persona(age: i32) -> Persona {
        Persona::new(
            "Urban cyclist who avoids subscriptions".to_string(),
            age,
            Gender::Female,
            Some("Designer".to_string()),
            None,
            None,
        )
    }

    #[tokio::test]
    async fn test_simulate_parses_decision_case_insensitively() {
        let llm = Arc::new(StubLlm::with_responses(vec![
            r#"{"decision": "Yes", "reason": "Fits my commute."}"#.to_string(),
        ]));
        let simulator = PurchaseSimulator::new(llm);

        let record = simulator.simulate("a bike light", &persona(31)).await.unwrap();
        assert_eq!(record.decision, Decision::Yes);
        assert_eq!(record.age, 31);
        assert_eq!(record.reason, "Fits my commute.");
    }

    #[tokio::test]
    async fn test_simulate_rejects_non_decision() {
        let llm = Arc::new(StubLlm::with_responses(vec![
            r#"{"decision": "maybe", "reason": "..."}"#.to_string(),
        ]));
        let simulator = PurchaseSimulator::new(llm);

        let err = simulator.simulate("a bike light", &persona(31)).await.unwrap_err();
        assert!(matches!(err, DomainError::ModelOutput(_)));
    }

    #[tokio::test]
    async fn test_cohort_collects_errors_without_aborting() {
        let llm = Arc::new(StubLlm::with_responses(vec![
            r#"{"decision": "yes", "reason": "ok"}"#.to_string(),
            "garbage".to_string(),
            r#"{"decision": "no", "reason": "too pricey"}"#.to_string(),
        ]));
        let simulator = PurchaseSimulator::new(llm);

        let cohort = vec![persona(25), persona(40), persona(52)];
        let (records, errors) = simulator.simulate_cohort("a bike light", &cohort).await;

        assert_eq!(records.len(), 2);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains(&cohort[1].id.to_string()));
    }
}
