//! Archetype classification - pipeline step 5
//!
//! One batched LLM call assigns every "yes" persona to a product archetype.
//! Assignments naming an archetype outside the product profile are dropped.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use mirra::{ArchetypeAssignment, DecisionRecord, DomainError, LlmProvider};

use crate::services::gemini::parse_model_json;

/// Classifies buying personas into product archetypes
pub struct ArchetypeClassifier {
    llm: Arc<dyn LlmProvider>,
}

#[derive(Debug, Deserialize)]
struct RawAssignment {
    persona_id: Uuid,
    assigned_archetype: String,
}

impl ArchetypeClassifier {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Assign each buying persona to the best-fitting archetype
    pub async fn classify(
        &self,
        archetypes: &[String],
        buyers: &[DecisionRecord],
    ) -> Result<Vec<ArchetypeAssignment>, DomainError> {
        if archetypes.is_empty() || buyers.is_empty() {
            return Ok(vec![]);
        }

        let archetype_list = archetypes
            .iter()
            .map(|a| format!("- {}", a))
            .collect::<Vec<_>>()
            .join("\n");

        let buyer_list = buyers
            .iter()
            .map(|b| format!("- persona_id {}: {}", b.persona_id, b.persona_summary))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            r#"You are a consumer research analyst. Assign each consumer below to exactly one of the product archetypes.

## Archetypes
{archetypes}

## Consumers
{buyers}

## Output
Respond with a JSON array only. One element per consumer:
{{"persona_id": "<uuid>", "assigned_archetype": "<archetype name, verbatim from the list>"}}"#,
            archetypes = archetype_list,
            buyers = buyer_list
        );

        let text = self.llm.complete_simple(&prompt).await?;
        let raw: Vec<RawAssignment> = parse_model_json(&text)?;

        let known: HashSet<&str> = archetypes.iter().map(String::as_str).collect();

        let assignments = raw
            .into_iter()
            .filter_map(|a| {
                if known.contains(a.assigned_archetype.as_str()) {
                    Some(ArchetypeAssignment {
                        persona_id: a.persona_id,
                        archetype: a.assigned_archetype,
                    })
                } else {
                    tracing::warn!(
                        "Dropping assignment to unknown archetype: {}",
                        a.assigned_archetype
                    );
                    None
                }
            })
            .collect();

        Ok(assignments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::StubLlm;
    use mirra::Decision;

    fn buyer(summary: &str) -> DecisionRecord {
        DecisionRecord {
            persona_id: Uuid::new_v4(),
            decision: Decision::Yes,
            reason: "sure".to_string(),
            age: 33,
            persona_summary: summary.to_string(),
        }
    }

    #[tokio::test]
    async fn test_classify_drops_unknown_archetypes() {
        let buyers = vec![buyer("runner"), buyer("collector")];
        let response = format!(
            r#"[
                {{"persona_id": "{}", "assigned_archetype": "Active Minimalist"}},
                {{"persona_id": "{}", "assigned_archetype": "Impulse Shopper"}}
            ]"#,
            buyers[0].persona_id, buyers[1].persona_id
        );
        let llm = Arc::new(StubLlm::with_responses(vec![response]));
        let classifier = ArchetypeClassifier::new(llm);

        let assignments = classifier
            .classify(&["Active Minimalist".to_string()], &buyers)
            .await
            .unwrap();

        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].persona_id, buyers[0].persona_id);
        assert_eq!(assignments[0].archetype, "Active Minimalist");
    }

    #[tokio::test]
    async fn test_classify_short_circuits_on_empty_input() {
        // No LLM response queued: the call must not reach the model
        let llm = Arc::new(StubLlm::with_responses(vec![]));
        let classifier = ArchetypeClassifier::new(llm);

        let none = classifier
            .classify(&["Active Minimalist".to_string()], &[])
            .await
            .unwrap();
        assert!(none.is_empty());
    }
}
