//! Persona Index Port
//!
//! Abstract interface for the persona vector index.
//! Note: persona vectors live in a vector database (Qdrant), not PostgreSQL.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, PersonaMatch};

/// Vector index over persona summaries
#[async_trait]
pub trait PersonaIndex: Send + Sync {
    /// Insert or update a persona's vector with its summary as payload
    async fn upsert(
        &self,
        persona_id: Uuid,
        summary: &str,
        embedding: Vec<f32>,
    ) -> Result<(), DomainError>;

    /// Search personas by semantic similarity
    async fn search(
        &self,
        query_vector: Vec<f32>,
        limit: usize,
    ) -> Result<Vec<PersonaMatch>, DomainError>;

    /// Remove a persona's vector
    async fn remove(&self, persona_id: Uuid) -> Result<(), DomainError>;
}
