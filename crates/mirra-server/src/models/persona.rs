//! Persona DTOs - dataset management requests and responses

use chrono::{DateTime, Utc};
use mirra::{Gender, Persona, PersonaMatch};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Create persona request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePersonaRequest {
    /// Persona narrative; embedded into the vector index
    pub summary: String,
    pub age: i32,
    #[schema(value_type = String, example = "female")]
    pub gender: Gender,
    pub occupation: Option<String>,
    pub location: Option<String>,
    #[schema(value_type = Object)]
    pub traits: Option<serde_json::Value>,
}

/// Persona response
#[derive(Debug, Serialize, ToSchema)]
pub struct PersonaResponse {
    pub id: Uuid,
    pub summary: String,
    pub age: i32,
    #[schema(value_type = String, example = "female")]
    pub gender: Gender,
    pub occupation: Option<String>,
    pub location: Option<String>,
    #[schema(value_type = Object)]
    pub traits: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Persona> for PersonaResponse {
    fn from(persona: Persona) -> Self {
        Self {
            id: persona.id,
            summary: persona.summary,
            age: persona.age,
            gender: persona.gender,
            occupation: persona.occupation,
            location: persona.location,
            traits: persona.traits,
            created_at: persona.created_at,
            updated_at: persona.updated_at,
        }
    }
}

/// Pagination parameters for persona listing
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListPersonasParams {
    /// Max personas to return (default 50)
    pub limit: Option<i64>,
    /// Offset into the dataset (default 0)
    pub offset: Option<i64>,
}

/// Bulk import request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ImportPersonasRequest {
    pub personas: Vec<CreatePersonaRequest>,
}

/// Bulk import result
#[derive(Debug, Serialize, ToSchema)]
pub struct ImportPersonasResponse {
    pub imported: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

/// Similarity search request
#[derive(Debug, Deserialize, ToSchema)]
pub struct SimilarPersonasRequest {
    /// Free-text description of the consumer to look for
    pub query: String,
    /// Max matches to return (default 10)
    pub top_k: Option<usize>,
}

/// One similarity hit
#[derive(Debug, Serialize, ToSchema)]
pub struct PersonaMatchResponse {
    pub persona_id: Uuid,
    pub score: f32,
    pub summary: String,
}

impl From<PersonaMatch> for PersonaMatchResponse {
    fn from(m: PersonaMatch) -> Self {
        Self {
            persona_id: m.persona_id,
            score: m.score,
            summary: m.summary,
        }
    }
}
