//! Mirra Domain Library
//!
//! Core domain types and interfaces for the Mirra persona analysis system.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (Persona, the pipeline artifacts)
//!   - `value_objects/`: Immutable value types (AgeRange, Gender, Decision)
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Data access interfaces (Postgres rows, vector index)
//!   - `services/`: External service interfaces (LLM, embeddings)
//!
//! # Usage
//!
//! ```rust,ignore
//! use mirra::domain::{Persona, AgeRange, Decision};
//! use mirra::ports::{PersonaRepository, LlmProvider};
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    AgeRange, AnalysisReport, ArchetypeAssignment, ConsumerInsight, Decision, DecisionRecord,
    DomainError, Gender, Persona, PersonaMatch, PersonaSketch, ProductProfile, TargetGender,
};
pub use ports::{
    ChatMessage,
    CompletionOptions,
    CompletionResponse,
    EmbeddingService,
    LlmProvider,
    MessageRole,
    // Repositories
    PersonaIndex,
    PersonaRepository,
    TokenUsage,
};
