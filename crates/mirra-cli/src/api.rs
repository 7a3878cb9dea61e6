//! Mirra API Client

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// API Client for Mirra
pub struct MirraClient {
    client: Client,
    base_url: String,
    api_key: String,
}

// ============================================
// API Request/Response Types
// ============================================

#[derive(Debug, Deserialize)]
pub struct PersonaResponse {
    pub id: Uuid,
    pub summary: String,
    pub age: i32,
    pub gender: String,
    pub occupation: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePersonaRequest {
    pub summary: String,
    pub age: i32,
    pub gender: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traits: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct ImportPersonasRequest<'a> {
    personas: &'a [CreatePersonaRequest],
}

#[derive(Debug, Deserialize)]
pub struct ImportPersonasResponse {
    pub imported: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    product_description: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct WouldBuyCounts {
    pub yes: usize,
    pub no: usize,
}

#[derive(Debug, Deserialize)]
pub struct ConsumerInsight {
    pub persona_id: Uuid,
    pub insights: String,
}

#[derive(Debug, Deserialize)]
pub struct Demographics {
    pub target_age_ranges: Vec<String>,
    pub target_gender: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeResponse {
    pub would_buy_pie: WouldBuyCounts,
    pub yes_pie: BTreeMap<String, usize>,
    pub age_distribution: BTreeMap<String, usize>,
    pub consumer_insights: BTreeMap<String, ConsumerInsight>,
    pub demographics: Demographics,
}

impl MirraClient {
    /// Create a new API client
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        Ok(resp.status().is_success())
    }

    /// Run a product analysis
    pub async fn analyze(&self, product_description: &str) -> Result<AnalyzeResponse> {
        let url = format!("{}/mirra/analyze", self.base_url);

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&AnalyzeRequest {
                product_description,
            })
            .send()
            .await
            .context("Failed to connect to Mirra API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        let analysis: AnalyzeResponse = resp.json().await.context("Failed to parse response")?;

        Ok(analysis)
    }

    /// List dataset personas
    pub async fn list_personas(&self, limit: usize) -> Result<Vec<PersonaResponse>> {
        let url = format!("{}/mirra/personas?limit={}", self.base_url, limit);

        let resp = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .context("Failed to connect to Mirra API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        let personas: Vec<PersonaResponse> =
            resp.json().await.context("Failed to parse response")?;

        Ok(personas)
    }

    /// Add a single dataset persona
    pub async fn create_persona(&self, request: &CreatePersonaRequest) -> Result<PersonaResponse> {
        let url = format!("{}/mirra/personas", self.base_url);

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(request)
            .send()
            .await
            .context("Failed to connect to Mirra API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        let persona: PersonaResponse = resp.json().await.context("Failed to parse response")?;

        Ok(persona)
    }

    /// Bulk import dataset personas
    pub async fn import_personas(
        &self,
        personas: &[CreatePersonaRequest],
    ) -> Result<ImportPersonasResponse> {
        let url = format!("{}/mirra/personas/import", self.base_url);

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&ImportPersonasRequest { personas })
            .send()
            .await
            .context("Failed to connect to Mirra API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        let result: ImportPersonasResponse =
            resp.json().await.context("Failed to parse response")?;

        Ok(result)
    }
}
