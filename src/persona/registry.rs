//! Persona store for built-in and session-scoped custom personas.
//!
//! Resolution is by name. Custom personas shadow built-ins with the same
//! name, and re-spawning an existing custom name replaces it (last write
//! wins). Nothing here is persisted; the store lives as long as its session.

use std::collections::HashMap;

use super::profile::{builtin_personas, Persona};
use crate::utilities::errors::EngineError;

/// Catalog of personas available to one session.
#[derive(Debug, Clone, Default)]
pub struct PersonaStore {
    /// Built-in personas, catalog order.
    defaults: Vec<Persona>,
    /// User-defined personas, creation order.
    custom: Vec<Persona>,
}

impl PersonaStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already populated with the built-in catalog.
    pub fn with_defaults() -> Self {
        let mut store = Self::new();
        store.register_default_personas();
        store
    }

    /// Populate the built-in catalog. Calling it again leaves the store
    /// unchanged.
    pub fn register_default_personas(&mut self) {
        self.defaults = builtin_personas().to_vec();
    }

    /// Create a custom persona and upsert it into the custom registry.
    ///
    /// Name and goal are trimmed and must be non-empty.
    pub fn spawn_custom_persona(
        &mut self,
        name: &str,
        tone: &str,
        goal: &str,
    ) -> Result<Persona, EngineError> {
        let name = name.trim();
        let goal = goal.trim();
        if name.is_empty() {
            return Err(EngineError::InvalidPersona {
                message: "name must not be empty".to_string(),
            });
        }
        if goal.is_empty() {
            return Err(EngineError::InvalidPersona {
                message: "goal must not be empty".to_string(),
            });
        }

        let persona = Persona::custom(name, tone.trim(), goal);
        match self.custom.iter_mut().find(|p| p.name == persona.name) {
            Some(existing) => {
                log::debug!("Replacing custom persona '{}'", persona.name);
                *existing = persona.clone();
            }
            None => {
                log::debug!("Spawned custom persona '{}'", persona.name);
                self.custom.push(persona.clone());
            }
        }
        Ok(persona)
    }

    /// Resolve a persona by name, custom entries first.
    pub fn get(&self, name: &str) -> Option<&Persona> {
        self.custom
            .iter()
            .find(|p| p.name == name)
            .or_else(|| self.defaults.iter().find(|p| p.name == name))
    }

    /// Whether `name` resolves in this store.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Union of built-in and custom personas keyed by name.
    pub fn all_personas(&self) -> HashMap<String, Persona> {
        self.defaults
            .iter()
            .chain(self.custom.iter())
            .map(|p| (p.name.clone(), p.clone()))
            .collect()
    }

    /// Names of every persona: built-ins in catalog order, then custom
    /// personas that do not shadow a built-in, in creation order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.defaults.iter().map(|p| p.name.clone()).collect();
        for p in &self.custom {
            if !names.contains(&p.name) {
                names.push(p.name.clone());
            }
        }
        names
    }

    /// User-defined personas in creation order.
    pub fn custom_personas(&self) -> &[Persona] {
        &self.custom
    }

    /// Number of distinct persona names.
    pub fn len(&self) -> usize {
        self.names().len()
    }

    /// Whether the store holds no persona at all.
    pub fn is_empty(&self) -> bool {
        self.defaults.is_empty() && self.custom.is_empty()
    }

    /// Drop every persona, built-in and custom.
    pub fn clear(&mut self) {
        self.defaults.clear();
        self.custom.clear();
    }
}
