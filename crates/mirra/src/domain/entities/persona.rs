//! Persona - a consumer record from the real persona dataset
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::Gender;

/// A real consumer persona. The `summary` narrative is what gets embedded
/// into the vector index and quoted in simulation prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub id: Uuid,
    pub summary: String,
    pub age: i32,
    pub gender: Gender,
    pub occupation: Option<String>,
    pub location: Option<String>,
    /// Free-form attributes (interests, income band, household, ...)
    #[serde(default)]
    pub traits: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Persona {
    /// Create a new Persona with generated ID and timestamps
    pub fn new(
        summary: String,
        age: i32,
        gender: Gender,
        occupation: Option<String>,
        location: Option<String>,
        traits: Option<serde_json::Value>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            summary,
            age,
            gender,
            occupation,
            location,
            traits: traits.unwrap_or(serde_json::json!({})),
            created_at: now,
            updated_at: now,
        }
    }
}
