//! Persona Repository Port
//!
//! Abstract interface for persona dataset persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, AgeRange, Persona, TargetGender};

/// Repository interface for the persona dataset
#[async_trait]
pub trait PersonaRepository: Send + Sync {
    /// Find a persona by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Persona>, DomainError>;

    /// Page through the dataset, newest first
    async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<Persona>, DomainError>;

    /// Save a persona (insert or update)
    async fn save(&self, persona: &Persona) -> Result<Persona, DomainError>;

    /// Delete a persona by ID
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Total dataset size
    async fn count(&self) -> Result<i64, DomainError>;

    /// Personas matching the target demographics.
    ///
    /// An empty `age_ranges` slice means no age filter; `TargetGender::Both`
    /// means no gender filter.
    async fn find_by_demographics(
        &self,
        age_ranges: &[AgeRange],
        gender: TargetGender,
        limit: i64,
    ) -> Result<Vec<Persona>, DomainError>;
}
