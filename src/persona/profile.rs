//! Persona profile: the identity a commenter speaks with.
//!
//! The built-in catalog ships as YAML embedded in the binary
//! (`persona/defaults.yaml`) and is parsed once on first use.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Embedded built-in persona catalog.
pub const DEFAULTS_YAML: &str = include_str!("defaults.yaml");

/// Tones offered by the persona creator. Any tone string is accepted.
pub const SUGGESTED_TONES: [&str; 10] = [
    "Sarcastic",
    "Supportive",
    "Analytical",
    "Playful",
    "Cold",
    "Enthusiastic",
    "Skeptical",
    "Wise",
    "Chaotic",
    "Professional",
];

/// A named personality profile that biases the tone of generated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    /// Display identity and store key.
    pub name: String,
    /// Short archetype descriptor.
    pub role: String,
    /// What kind of feedback this persona produces.
    pub goal: String,
    /// Flavor text for tone and style.
    pub backstory: String,
}

impl Persona {
    /// Create a persona from its four parts.
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
        }
    }

    /// Build a user-defined persona. Role and backstory are templated from
    /// `tone`; `goal` is kept verbatim.
    pub fn custom(name: impl Into<String>, tone: &str, goal: impl Into<String>) -> Self {
        let goal = goal.into();
        Self {
            name: name.into(),
            role: format!("Custom commenter with a {} tone", tone),
            backstory: format!(
                "You are a commenter with a {} personality. Your approach to content is guided by: {}",
                tone, goal
            ),
            goal,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    personas: Vec<Persona>,
}

static BUILTIN_PERSONAS: Lazy<Vec<Persona>> = Lazy::new(|| {
    serde_yaml::from_str::<CatalogFile>(DEFAULTS_YAML)
        .map(|catalog| catalog.personas)
        .expect("embedded persona catalog must be valid YAML")
});

/// The built-in personas, in catalog order.
pub fn builtin_personas() -> &'static [Persona] {
    &BUILTIN_PERSONAS
}
