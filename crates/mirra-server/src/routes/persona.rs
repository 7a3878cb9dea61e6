//! Persona Routes - dataset management
//!
//! HTTP handlers that delegate to PersonaService for business logic.
//! Created personas are embedded into the vector index when the embedding
//! service and index are configured; the Postgres row stays the source of
//! truth either way.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::models::{
    CreatePersonaRequest, ImportPersonasRequest, ImportPersonasResponse, ListPersonasParams,
    PersonaMatchResponse, PersonaResponse, SimilarPersonasRequest,
};
use crate::routes::error_response;
use crate::AppState;

use mirra::{EmbeddingService, Persona, PersonaIndex};

/// List dataset personas
#[utoipa::path(
    get,
    path = "/mirra/personas",
    params(ListPersonasParams),
    responses(
        (status = 200, description = "Personas in the dataset", body = Vec<PersonaResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Persona"
)]
pub async fn list_personas(
    State(state): State<AppState>,
    Query(params): Query<ListPersonasParams>,
) -> Result<Json<Vec<PersonaResponse>>, (StatusCode, String)> {
    let personas = state
        .persona_service
        .list(params.limit, params.offset)
        .await
        .map_err(error_response)?;

    Ok(Json(personas.into_iter().map(PersonaResponse::from).collect()))
}

/// Create a dataset persona
#[utoipa::path(
    post,
    path = "/mirra/personas",
    request_body = CreatePersonaRequest,
    responses(
        (status = 200, description = "Persona created", body = PersonaResponse),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Persona"
)]
pub async fn create_persona(
    State(state): State<AppState>,
    Json(payload): Json<CreatePersonaRequest>,
) -> Result<Json<PersonaResponse>, (StatusCode, String)> {
    let persona = state
        .persona_service
        .create(
            payload.summary,
            payload.age,
            payload.gender,
            payload.occupation,
            payload.location,
            payload.traits,
        )
        .await
        .map_err(error_response)?;

    index_persona(&state, &persona).await;

    Ok(Json(persona.into()))
}

/// Get a persona by ID
#[utoipa::path(
    get,
    path = "/mirra/personas/{id}",
    params(("id" = Uuid, Path, description = "Persona ID")),
    responses(
        (status = 200, description = "Persona found", body = PersonaResponse),
        (status = 404, description = "Persona not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Persona"
)]
pub async fn get_persona(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PersonaResponse>, (StatusCode, String)> {
    let persona = state
        .persona_service
        .get_by_id(id)
        .await
        .map_err(error_response)?
        .ok_or((StatusCode::NOT_FOUND, "Persona not found".to_string()))?;

    Ok(Json(persona.into()))
}

/// Delete a persona
#[utoipa::path(
    delete,
    path = "/mirra/personas/{id}",
    params(("id" = Uuid, Path, description = "Persona ID")),
    responses(
        (status = 200, description = "Persona deleted"),
        (status = 404, description = "Persona not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Persona"
)]
pub async fn delete_persona(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let deleted = state
        .persona_service
        .delete(id)
        .await
        .map_err(error_response)?;

    if !deleted {
        return Err((StatusCode::NOT_FOUND, "Persona not found".to_string()));
    }

    if let Some(index) = &state.index {
        if let Err(e) = index.remove(id).await {
            tracing::warn!("Failed to remove persona {} from index: {}", id, e);
        }
    }

    Ok(Json(serde_json::json!({
        "status": "ok",
        "message": "Persona deleted"
    })))
}

/// Bulk import dataset personas
#[utoipa::path(
    post,
    path = "/mirra/personas/import",
    request_body = ImportPersonasRequest,
    responses(
        (status = 200, description = "Import finished", body = ImportPersonasResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Persona"
)]
pub async fn import_personas(
    State(state): State<AppState>,
    Json(payload): Json<ImportPersonasRequest>,
) -> Result<Json<ImportPersonasResponse>, (StatusCode, String)> {
    let mut imported = 0;
    let mut errors = Vec::new();

    for (i, item) in payload.personas.into_iter().enumerate() {
        match state
            .persona_service
            .create(
                item.summary,
                item.age,
                item.gender,
                item.occupation,
                item.location,
                item.traits,
            )
            .await
        {
            Ok(persona) => {
                index_persona(&state, &persona).await;
                imported += 1;
            }
            Err(e) => errors.push(format!("persona {}: {}", i, e)),
        }
    }

    tracing::info!("Imported {} personas ({} failed)", imported, errors.len());

    Ok(Json(ImportPersonasResponse {
        imported,
        failed: errors.len(),
        errors,
    }))
}

/// Find dataset personas similar to a free-text description
#[utoipa::path(
    post,
    path = "/mirra/personas/similar",
    request_body = SimilarPersonasRequest,
    responses(
        (status = 200, description = "Closest dataset personas", body = Vec<PersonaMatchResponse>),
        (status = 503, description = "Embedding service or index unavailable"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Persona"
)]
pub async fn similar_personas(
    State(state): State<AppState>,
    Json(payload): Json<SimilarPersonasRequest>,
) -> Result<Json<Vec<PersonaMatchResponse>>, (StatusCode, String)> {
    let index = state.index.as_ref().ok_or((
        StatusCode::SERVICE_UNAVAILABLE,
        "Persona index not available".to_string(),
    ))?;

    let embedding = state.embedding.as_ref().ok_or((
        StatusCode::SERVICE_UNAVAILABLE,
        "Embedding service not available".to_string(),
    ))?;

    let query_vector = embedding
        .embed(&payload.query)
        .await
        .map_err(error_response)?;

    let top_k = payload.top_k.unwrap_or(10);
    let matches = index
        .search(query_vector, top_k)
        .await
        .map_err(error_response)?;

    Ok(Json(matches.into_iter().map(PersonaMatchResponse::from).collect()))
}

/// Push a persona's vector into the index; failures degrade to a warning
async fn index_persona(state: &AppState, persona: &Persona) {
    let (Some(embedding), Some(index)) = (&state.embedding, &state.index) else {
        return;
    };

    match embedding.embed(&persona.summary).await {
        Ok(vector) => {
            if let Err(e) = index.upsert(persona.id, &persona.summary, vector).await {
                tracing::warn!("Failed to index persona {}: {}", persona.id, e);
            }
        }
        Err(e) => {
            tracing::warn!("Failed to embed persona {}: {}", persona.id, e);
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/mirra/personas", get(list_personas).post(create_persona))
        .route("/mirra/personas/import", post(import_personas))
        .route("/mirra/personas/similar", post(similar_personas))
        .route(
            "/mirra/personas/:id",
            get(get_persona).delete(delete_persona),
        )
}
