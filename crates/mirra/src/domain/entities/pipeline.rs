//! Pipeline artifacts - intermediate and final outputs of an analysis run

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{AgeRange, Decision, TargetGender};

/// A hypothetical consumer sketch generated for a product (pipeline step 1)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaSketch {
    pub name: String,
    pub description: String,
}

/// Target profile for a product: named archetypes plus the demographics
/// the simulation cohort is filtered by (pipeline step 2)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductProfile {
    pub archetypes: Vec<String>,
    pub age_ranges: Vec<AgeRange>,
    pub gender: TargetGender,
}

/// A similarity hit from the persona vector index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaMatch {
    pub persona_id: Uuid,
    pub score: f32,
    pub summary: String,
}

/// One simulated purchase decision (pipeline step 4)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub persona_id: Uuid,
    pub decision: Decision,
    pub reason: String,
    pub age: i32,
    pub persona_summary: String,
}

/// Assignment of a "yes" persona to a product archetype (pipeline step 5)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypeAssignment {
    pub persona_id: Uuid,
    pub archetype: String,
}

/// Marketing insights for one representative consumer (pipeline step 6)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumerInsight {
    pub persona_id: Uuid,
    pub archetype: String,
    /// LLM-authored markdown
    pub insights: String,
}

/// Everything an analysis run produced.
///
/// `top_matches` is recorded here even though the HTTP response omits it;
/// callers of the pipeline get the full picture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub sketches: Vec<PersonaSketch>,
    pub profile: ProductProfile,
    pub top_matches: Vec<PersonaMatch>,
    pub decisions: Vec<DecisionRecord>,
    pub assignments: Vec<ArchetypeAssignment>,
    pub insights: Vec<ConsumerInsight>,
    /// Non-fatal per-persona failures collected along the way
    #[serde(default)]
    pub errors: Vec<String>,
}
