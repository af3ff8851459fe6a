//! Persona system: who the simulated commenters are.
//!
//! [`Persona`] is the role/goal/backstory triple handed to the generator.
//! [`PersonaStore`] holds the built-in catalog plus any custom personas a
//! session creates at runtime.

pub mod profile;
pub mod registry;

pub use profile::{builtin_personas, Persona, SUGGESTED_TONES};
pub use registry::PersonaStore;
