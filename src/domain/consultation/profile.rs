//! Pet profile captured at intake.
//!
//! Every attribute is a display string. Nothing is parsed or range checked;
//! the values are embedded verbatim into the model instructions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of animal being consulted about.
///
/// Dogs and cats are the supported cases; anything else is kept as the
/// owner typed it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Dog,
    Cat,
    #[serde(untagged)]
    Other(String),
}

impl Species {
    /// Parses free text, recognizing "dog" and "cat" in any case.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "dog" => Species::Dog,
            "cat" => Species::Cat,
            _ => Species::Other(trimmed.to_string()),
        }
    }

    /// Returns true for the two species the consultation is tuned for.
    pub fn is_supported(&self) -> bool {
        matches!(self, Species::Dog | Species::Cat)
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Species::Dog => write!(f, "Dog"),
            Species::Cat => write!(f, "Cat"),
            Species::Other(other) => write!(f, "{}", other),
        }
    }
}

/// Immutable snapshot of the pet's attributes for one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetProfile {
    pub name: String,
    pub species: Species,
    pub age: String,
    pub breed: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
}

impl PetProfile {
    /// Creates a profile with the required attributes.
    pub fn new(
        name: impl Into<String>,
        species: Species,
        age: impl Into<String>,
        breed: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            species,
            age: age.into(),
            breed: breed.into(),
            gender: None,
            weight: None,
        }
    }

    /// Sets the gender. Blank values are treated as absent.
    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = non_blank(gender.into());
        self
    }

    /// Sets the weight. Blank values are treated as absent.
    pub fn with_weight(mut self, weight: impl Into<String>) -> Self {
        self.weight = non_blank(weight.into());
        self
    }

    /// Attribute lines in a fixed order, as embedded in instructions.
    pub fn attribute_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("- Pet Name: {}", self.name),
            format!("- Pet Type (Dog/Cat): {}", self.species),
            format!("- Pet Age: {}", self.age),
            format!("- Pet Breed: {}", self.breed),
        ];
        if let Some(gender) = &self.gender {
            lines.push(format!("- Pet Gender: {}", gender));
        }
        if let Some(weight) = &self.weight {
            lines.push(format!("- Pet Weight: {}", weight));
        }
        lines
    }

    /// One-line summary used by the condensed reminder.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} ({}, age {}, breed {}",
            self.name, self.species, self.age, self.breed
        );
        if let Some(gender) = &self.gender {
            summary.push_str(&format!(", {}", gender));
        }
        if let Some(weight) = &self.weight {
            summary.push_str(&format!(", {}", weight));
        }
        summary.push(')');
        summary
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
