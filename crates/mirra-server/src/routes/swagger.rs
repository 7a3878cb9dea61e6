//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{
    AgeDistributionResponse,
    // Analysis models
    AnalyzeRequest,
    AnalyzeResponse,
    ConsumerInsightResponse,
    // Persona models
    CreatePersonaRequest,
    DemographicsResponse,
    ImportPersonasRequest,
    ImportPersonasResponse,
    PersonaMatchResponse,
    PersonaResponse,
    SimilarPersonasRequest,
    WouldBuyCounts,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Persona endpoints
        super::persona::list_personas,
        super::persona::create_persona,
        super::persona::get_persona,
        super::persona::delete_persona,
        super::persona::import_personas,
        super::persona::similar_personas,
        // Analysis endpoints
        super::analyze::analyze_product,
    ),
    info(
        title = "Mirra API",
        version = "0.1.0",
        description = "Persona Analysis API\n\nSimulates how a dataset of real consumer personas reacts to a product and distills the result into marketing insights.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Persona", description = "Persona dataset management and similarity search"),
        (name = "Analysis", description = "Product analysis pipeline"),
    ),
    components(
        schemas(
            // Persona
            CreatePersonaRequest,
            PersonaResponse,
            ImportPersonasRequest,
            ImportPersonasResponse,
            SimilarPersonasRequest,
            PersonaMatchResponse,
            // Analysis
            AnalyzeRequest,
            AnalyzeResponse,
            WouldBuyCounts,
            AgeDistributionResponse,
            ConsumerInsightResponse,
            DemographicsResponse,
        )
    ),
)]
pub struct ApiDoc;
