//! PostgreSQL implementation of PersonaRepository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use mirra::{AgeRange, DomainError, Gender, Persona, PersonaRepository, TargetGender};

/// PostgreSQL implementation of PersonaRepository
pub struct PgPersonaRepository {
    pool: PgPool,
}

impl PgPersonaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct PersonaRow {
    id: Uuid,
    summary: String,
    age: i32,
    gender: String,
    occupation: Option<String>,
    location: Option<String>,
    traits: serde_json::Value,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<PersonaRow> for Persona {
    fn from(row: PersonaRow) -> Self {
        Self {
            id: row.id,
            summary: row.summary,
            age: row.age,
            // Rows predating the gender enum fall back to `other`
            gender: row.gender.parse().unwrap_or(Gender::Other),
            occupation: row.occupation,
            location: row.location,
            traits: row.traits,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// SQL predicate over the age column for the requested buckets, or None when
/// no age filtering was requested. Bounds come from the AgeRange enum, never
/// from user input.
fn age_clause(age_ranges: &[AgeRange]) -> Option<String> {
    if age_ranges.is_empty() {
        return None;
    }

    let clauses: Vec<String> = age_ranges
        .iter()
        .map(|range| match range.bounds() {
            (low, Some(high)) => format!("age BETWEEN {} AND {}", low, high),
            (low, None) => format!("age >= {}", low),
        })
        .collect();

    Some(format!("({})", clauses.join(" OR ")))
}

#[async_trait]
impl PersonaRepository for PgPersonaRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Persona>, DomainError> {
        let row = sqlx::query_as::<_, PersonaRow>("SELECT * FROM personas WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<Persona>, DomainError> {
        let rows = sqlx::query_as::<_, PersonaRow>(
            "SELECT * FROM personas ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn save(&self, persona: &Persona) -> Result<Persona, DomainError> {
        // Check if exists
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM personas WHERE id = $1)")
                .bind(persona.id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| DomainError::Repository(e.to_string()))?;

        let row = if exists {
            // Update
            sqlx::query_as::<_, PersonaRow>(
                r#"
                UPDATE personas
                SET summary = $2, age = $3, gender = $4, occupation = $5,
                    location = $6, traits = $7, updated_at = NOW()
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(persona.id)
            .bind(&persona.summary)
            .bind(persona.age)
            .bind(persona.gender.to_string())
            .bind(&persona.occupation)
            .bind(&persona.location)
            .bind(&persona.traits)
            .fetch_one(&self.pool)
            .await
        } else {
            // Insert
            sqlx::query_as::<_, PersonaRow>(
                r#"
                INSERT INTO personas (id, summary, age, gender, occupation, location, traits)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
                "#,
            )
            .bind(persona.id)
            .bind(&persona.summary)
            .bind(persona.age)
            .bind(persona.gender.to_string())
            .bind(&persona.occupation)
            .bind(&persona.location)
            .bind(&persona.traits)
            .fetch_one(&self.pool)
            .await
        }
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.into())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM personas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, DomainError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM personas")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))
    }

    async fn find_by_demographics(
        &self,
        age_ranges: &[AgeRange],
        gender: TargetGender,
        limit: i64,
    ) -> Result<Vec<Persona>, DomainError> {
        let mut sql = String::from("SELECT * FROM personas WHERE 1=1");

        if let Some(clause) = age_clause(age_ranges) {
            sql.push_str(" AND ");
            sql.push_str(&clause);
        }

        // random() keeps the capped cohort an unbiased dataset sample
        let rows = if let Some(persona_gender) = gender.persona_gender() {
            sql.push_str(" AND gender = $1 ORDER BY random() LIMIT $2");
            sqlx::query_as::<_, PersonaRow>(&sql)
                .bind(persona_gender.to_string())
                .bind(limit)
                .fetch_all(&self.pool)
                .await
        } else {
            sql.push_str(" ORDER BY random() LIMIT $1");
            sqlx::query_as::<_, PersonaRow>(&sql)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
        }
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_clause_is_empty_without_ranges() {
        assert_eq!(age_clause(&[]), None);
    }

    #[test]
    fn test_age_clause_ors_ranges() {
        let clause = age_clause(&[AgeRange::Age18To29, AgeRange::Age65Plus]).unwrap();
        assert_eq!(clause, "(age BETWEEN 18 AND 29 OR age >= 65)");
    }

    #[test]
    fn test_age_clause_single_range() {
        let clause = age_clause(&[AgeRange::Age50To64]).unwrap();
        assert_eq!(clause, "(age BETWEEN 50 AND 64)");
    }
}
