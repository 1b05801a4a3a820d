//! Static catalogs: personas, current moods and desired feelings.
//!
//! Catalogs are loaded once at process start and never mutated. Lookups by
//! key fail with [`CatalogError::UnknownKey`](crate::utilities::errors::CatalogError),
//! which callers should treat as a programming error since keys are always
//! sourced from the catalogs themselves.

pub mod mood;
pub mod persona;

pub use mood::{DesiredFeeling, Mood};
pub use persona::{Persona, PersonaCatalog};
