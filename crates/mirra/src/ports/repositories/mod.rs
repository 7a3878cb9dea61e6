//! Repository Ports
//!
//! Abstract interfaces for data persistence operations.

mod persona_index;
mod persona_repository;

pub use persona_index::*;
pub use persona_repository::*;
