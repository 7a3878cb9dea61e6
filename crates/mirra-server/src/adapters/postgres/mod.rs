//! PostgreSQL Repository Implementations

mod persona_repository;

pub use persona_repository::PgPersonaRepository;
