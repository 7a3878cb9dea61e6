//! Persona Application Service (Use Case)
//!
//! Orchestrates domain operations for dataset persona management.

use std::sync::Arc;
use uuid::Uuid;

use mirra::{AgeRange, DomainError, Gender, Persona, PersonaRepository, TargetGender};

const MIN_AGE: i32 = 18;
const MAX_AGE: i32 = 120;
const MAX_PAGE_SIZE: i64 = 500;

/// Application service for persona dataset operations
pub struct PersonaService<R: PersonaRepository> {
    repo: Arc<R>,
}

impl<R: PersonaRepository> PersonaService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Page through the dataset
    pub async fn list(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Persona>, DomainError> {
        let limit = limit.unwrap_or(50).clamp(1, MAX_PAGE_SIZE);
        let offset = offset.unwrap_or(0).max(0);
        self.repo.find_all(limit, offset).await
    }

    /// Get a persona by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Persona>, DomainError> {
        self.repo.find_by_id(id).await
    }

    /// Create a new dataset persona
    pub async fn create(
        &self,
        summary: String,
        age: i32,
        gender: Gender,
        occupation: Option<String>,
        location: Option<String>,
        traits: Option<serde_json::Value>,
    ) -> Result<Persona, DomainError> {
        if summary.trim().is_empty() {
            return Err(DomainError::Validation("summary must not be empty".into()));
        }
        if !(MIN_AGE..=MAX_AGE).contains(&age) {
            return Err(DomainError::Validation(format!(
                "age must be between {} and {}",
                MIN_AGE, MAX_AGE
            )));
        }

        let persona = Persona::new(summary, age, gender, occupation, location, traits);
        let saved = self.repo.save(&persona).await?;

        tracing::info!("Created persona {}", saved.id);
        Ok(saved)
    }

    /// Delete a persona
    pub async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let deleted = self.repo.delete(id).await?;
        if deleted {
            tracing::info!("Deleted persona {}", id);
        }
        Ok(deleted)
    }

    /// Total dataset size
    pub async fn count(&self) -> Result<i64, DomainError> {
        self.repo.count().await
    }

    /// Personas matching the target demographics
    pub async fn find_by_demographics(
        &self,
        age_ranges: &[AgeRange],
        gender: TargetGender,
        limit: i64,
    ) -> Result<Vec<Persona>, DomainError> {
        self.repo.find_by_demographics(age_ranges, gender, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingRepo {
        saved: Mutex<Vec<Persona>>,
    }

    #[async_trait]
    impl PersonaRepository for RecordingRepo {
        async fn find_by_id(&self, _id: Uuid) -> Result<Option<Persona>, DomainError> {
            Ok(None)
        }

        async fn find_all(&self, _limit: i64, _offset: i64) -> Result<Vec<Persona>, DomainError> {
            Ok(vec![])
        }

        async fn save(&self, persona: &Persona) -> Result<Persona, DomainError> {
            self.saved.lock().unwrap().push(persona.clone());
            Ok(persona.clone())
        }

        async fn delete(&self, _id: Uuid) -> Result<bool, DomainError> {
            Ok(true)
        }

        async fn count(&self) -> Result<i64, DomainError> {
            Ok(0)
        }

        async fn find_by_demographics(
            &self,
            _age_ranges: &[AgeRange],
            _gender: TargetGender,
            _limit: i64,
        ) -> Result<Vec<Persona>, DomainError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_create_rejects_blank_summary() {
        let service = PersonaService::new(Arc::new(RecordingRepo::default()));
        let err = service
            .create("   ".to_string(), 30, Gender::Female, None, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_out_of_range_age() {
        let service = PersonaService::new(Arc::new(RecordingRepo::default()));
        for age in [17, 121, -1] {
            let err = service
                .create("ok".to_string(), age, Gender::Male, None, None, None)
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn test_create_saves_valid_persona() {
        let repo = Arc::new(RecordingRepo::default());
        let service = PersonaService::new(repo.clone());
        let persona = service
            .create(
                "Thrifty gardener".to_string(),
                64,
                Gender::Other,
                Some("Retired".to_string()),
                None,
                None,
            )
            .await
            .unwrap();
        assert_eq!(persona.age, 64);
        assert_eq!(repo.saved.lock().unwrap().len(), 1);
    }
}
