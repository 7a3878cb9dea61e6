//! Persona generation - pipeline steps 1 and 2
//!
//! Step 1 asks the model for hypothetical consumer sketches relevant to the
//! product. Step 2 asks for the product's archetypes and target demographics.

use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;

use mirra::{AgeRange, DomainError, LlmProvider, PersonaSketch, ProductProfile, TargetGender};

use crate::services::gemini::parse_model_json;

/// Number of sketches requested per product
const SKETCH_COUNT: usize = 5;

/// Generates persona sketches and product profiles
pub struct PersonaGenerator {
    llm: Arc<dyn LlmProvider>,
}

/// Raw step-2 payload as the model emits it
#[derive(Debug, Deserialize)]
struct RawProductProfile {
    personas: Vec<String>,
    #[serde(default)]
    age_ranges: Vec<String>,
    gender: Option<String>,
}

impl PersonaGenerator {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Generate hypothetical consumer sketches for a product
    pub async fn generate_sketches(
        &self,
        product_description: &str,
    ) -> Result<Vec<PersonaSketch>, DomainError> {
        let prompt = format!(
            r#"You are a consumer research analyst. For the product below, invent {count} distinct consumer personas who would plausibly encounter this product. Vary their lifestyles, priorities, and spending habits.

## Product
{product}

## Output
Respond with a JSON array only, no prose. Each element:
{{"name": "<short persona name>", "description": "<2-3 sentence profile: who they are, what they value, how they shop>"}}"#,
            count = SKETCH_COUNT,
            product = product_description
        );

        let text = self.llm.complete_simple(&prompt).await?;
        let sketches: Vec<PersonaSketch> = parse_model_json(&text)?;

        if sketches.is_empty() {
            return Err(DomainError::ModelOutput(
                "model returned no persona sketches".into(),
            ));
        }

        Ok(sketches)
    }

    /// Generate the product's archetypes and target demographics
    pub async fn generate_product_profile(
        &self,
        product_description: &str,
    ) -> Result<ProductProfile, DomainError> {
        let prompt = format!(
            r#"You are a consumer research analyst. For the product below, name the consumer archetypes it is made for (3-5 short evocative names like "Active Minimalist"), the target age ranges, and the target gender.

## Product
{product}

## Output
Respond with a JSON object only, no prose:
{{"personas": ["<archetype>", ...], "age_ranges": ["18-29" | "30-49" | "50-64" | "65+", ...], "gender": "female" | "male" | "both"}}"#,
            product = product_description
        );

        let text = self.llm.complete_simple(&prompt).await?;
        let raw: RawProductProfile = parse_model_json(&text)?;

        if raw.personas.is_empty() {
            return Err(DomainError::ModelOutput(
                "model returned no archetypes".into(),
            ));
        }

        let age_ranges: Vec<AgeRange> = raw
            .age_ranges
            .iter()
            .filter_map(|label| match AgeRange::from_str(label) {
                Ok(range) => Some(range),
                Err(_) => {
                    tracing::warn!("Skipping unrecognized age range: {}", label);
                    None
                }
            })
            .collect();

        let gender = raw
            .gender
            .as_deref()
            .map(TargetGender::from_model_output)
            .unwrap_or_default();

        Ok(ProductProfile {
            archetypes: raw.personas,
            age_ranges,
            gender,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::StubLlm;

    #[tokio::test]
    async fn test_generate_sketches_parses_fenced_json() {
        let llm = Arc::new(StubLlm::with_responses(vec![
            "```json\n[{\"name\": \"Busy Parent\", \"description\": \"Time-poor, values convenience.\"}]\n```"
                .to_string(),
        ]));
        let generator = PersonaGenerator::new(llm);

        let sketches = generator.generate_sketches("a meal kit").await.unwrap();
        assert_eq!(sketches.len(), 1);
        assert_eq!(sketches[0].name, "Busy Parent");
    }

    #[tokio::test]
    async fn test_generate_sketches_rejects_empty_array() {
        let llm = Arc::new(StubLlm::with_responses(vec!["[]".to_string()]));
        let generator = PersonaGenerator::new(llm);

        let err = generator.generate_sketches("a meal kit").await.unwrap_err();
        assert!(matches!(err, DomainError::ModelOutput(_)));
    }

    #[tokio::test]
    async fn test_product_profile_skips_bad_ranges_and_defaults_gender() {
        let llm = Arc::new(StubLlm::with_responses(vec![
            r#"{"personas": ["Active Minimalist"], "age_ranges": ["18-29", "13-17", "65 and up"], "gender": "everyone"}"#
                .to_string(),
        ]));
        let generator = PersonaGenerator::new(llm);

        let profile = generator
            .generate_product_profile("a water bottle")
            .await
            .unwrap();
        assert_eq!(profile.archetypes, vec!["Active Minimalist".to_string()]);
        assert_eq!(
            profile.age_ranges,
            vec![AgeRange::Age18To29, AgeRange::Age65Plus]
        );
        assert_eq!(profile.gender, TargetGender::Both);
    }

    #[tokio::test]
    async fn test_product_profile_requires_archetypes() {
        let llm = Arc::new(StubLlm::with_responses(vec![
            r#"{"personas": [], "age_ranges": [], "gender": "both"}"#.to_string(),
        ]));
        let generator = PersonaGenerator::new(llm);

        let err = generator
            .generate_product_profile("a water bottle")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ModelOutput(_)));
    }
}
