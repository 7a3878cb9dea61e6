//! Persona vector index backed by Qdrant
//!
//! A single `personas` collection holds one point per dataset persona,
//! keyed by the persona UUID, with the summary in the payload.

use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::qdrant::{
    point_id::PointIdOptions, value::Kind, CreateCollectionBuilder, DeletePointsBuilder, Distance,
    PointStruct, PointsIdsList, SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::Qdrant;
use uuid::Uuid;

use mirra::{DomainError, PersonaIndex, PersonaMatch};

use crate::services::embedding::EMBEDDING_DIM;

const COLLECTION: &str = "personas";

/// Qdrant-backed persona index
pub struct PersonaVectorIndex {
    client: Qdrant,
}

impl PersonaVectorIndex {
    /// Connect to Qdrant and make sure the collection exists
    pub async fn new(url: &str, api_key: Option<String>) -> Result<Self, DomainError> {
        let client = if let Some(key) = api_key {
            Qdrant::from_url(url).api_key(key).build()
        } else {
            Qdrant::from_url(url).build()
        }
        .map_err(|e| DomainError::ExternalService(format!("Qdrant connection failed: {}", e)))?;

        let index = Self { client };
        index.ensure_collection().await?;

        tracing::info!("Connected to persona index");
        Ok(index)
    }

    async fn ensure_collection(&self) -> Result<(), DomainError> {
        let exists = self
            .client
            .collection_exists(COLLECTION)
            .await
            .map_err(|e| DomainError::ExternalService(e.to_string()))?;

        if exists {
            return Ok(());
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(COLLECTION)
                    .vectors_config(VectorParamsBuilder::new(EMBEDDING_DIM, Distance::Cosine)),
            )
            .await
            .map_err(|e| DomainError::ExternalService(e.to_string()))?;

        tracing::info!("Created collection: {}", COLLECTION);
        Ok(())
    }
}

#[async_trait]
impl PersonaIndex for PersonaVectorIndex {
    async fn upsert(
        &self,
        persona_id: Uuid,
        summary: &str,
        embedding: Vec<f32>,
    ) -> Result<(), DomainError> {
        let payload: HashMap<String, serde_json::Value> = HashMap::from([(
            "summary".to_string(),
            serde_json::Value::String(summary.to_string()),
        )]);

        let point = PointStruct::new(persona_id.to_string(), embedding, payload);

        self.client
            .upsert_points(UpsertPointsBuilder::new(COLLECTION, vec![point]))
            .await
            .map_err(|e| DomainError::ExternalService(format!("Qdrant upsert failed: {}", e)))?;

        Ok(())
    }

    async fn search(
        &self,
        query_vector: Vec<f32>,
        limit: usize,
    ) -> Result<Vec<PersonaMatch>, DomainError> {
        let search_result = self
            .client
            .search_points(
                SearchPointsBuilder::new(COLLECTION, query_vector, limit as u64)
                    .with_payload(true),
            )
            .await
            .map_err(|e| DomainError::ExternalService(format!("Qdrant search failed: {}", e)))?;

        let matches: Vec<PersonaMatch> = search_result
            .result
            .into_iter()
            .filter_map(|point| {
                let persona_id = match point.id.and_then(|id| id.point_id_options) {
                    Some(PointIdOptions::Uuid(raw)) => Uuid::parse_str(&raw).ok()?,
                    _ => return None,
                };

                let summary = point
                    .payload
                    .get("summary")
                    .and_then(|value| match &value.kind {
                        Some(Kind::StringValue(s)) => Some(s.clone()),
                        _ => None,
                    })
                    .unwrap_or_default();

                Some(PersonaMatch {
                    persona_id,
                    score: point.score,
                    summary,
                })
            })
            .collect();

        Ok(matches)
    }

    async fn remove(&self, persona_id: Uuid) -> Result<(), DomainError> {
        self.client
            .delete_points(
                DeletePointsBuilder::new(COLLECTION).points(PointsIdsList {
                    ids: vec![persona_id.to_string().into()],
                }),
            )
            .await
            .map_err(|e| DomainError::ExternalService(format!("Qdrant delete failed: {}", e)))?;

        Ok(())
    }
}
