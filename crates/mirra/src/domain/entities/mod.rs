//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - Persona: a record from the real persona dataset
//! - Pipeline artifacts: sketches, product profile, decisions, assignments,
//!   insights, and the assembled analysis report

mod persona;
mod pipeline;

pub use persona::*;
pub use pipeline::*;
