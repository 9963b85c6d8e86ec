//! Wire DTOs of the batch request and response envelopes.
//!
//! These types decouple the JSON contract from domain types.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Full request envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsultRequestEnvelope {
    pub pet_details: PetDetailsDto,
    #[serde(default)]
    pub chat_history: Vec<HistoryTurnDto>,
    /// Files accompanying `message`; only their types are used.
    #[serde(default)]
    pub files: Vec<FileDeclarationDto>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Pet attributes plus the dialogue counters.
///
/// Every attribute may be missing or blank; a session can start before
/// the owner has filled in the pet form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PetDetailsDto {
    #[serde(default)]
    pub pet_name: String,
    #[serde(default)]
    pub pet_type: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub pet_age: String,
    #[serde(default)]
    pub pet_breed: String,
    #[serde(default)]
    pub pet_gender: Option<String>,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub pet_weight: Option<String>,
    #[serde(default)]
    pub questions_asked: Option<u32>,
    #[serde(default)]
    pub max_questions: Option<u32>,
}

/// One prior turn.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryTurnDto {
    pub role: String,
    #[serde(default)]
    pub parts: Vec<PartDto>,
}

/// One part of a prior turn.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PartDto {
    Text { text: String },
    File { file: FileReferenceDto },
    Bare(String),
}

/// A file behind a link.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileReferenceDto {
    #[serde(rename = "type", default)]
    pub file_type: String,
    pub file_link: String,
    #[serde(default)]
    pub file_name: String,
}

/// A file declared for the new message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileDeclarationDto {
    #[serde(rename = "type")]
    pub file_type: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// `{"response": ...}` or `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConsultResponseEnvelope {
    Response { response: String },
    Error { error: String },
}

impl ConsultResponseEnvelope {
    pub fn response(text: impl Into<String>) -> Self {
        Self::Response {
            response: text.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn to_json(&self) -> String {
        // Two string-only shapes; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════════════

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer)
        .map(String::from)
        .map_err(|_| de::Error::custom("expected a string or a number"))
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<StringOrNumber>::deserialize(deserializer)
        .map(|value| value.map(String::from))
        .map_err(|_| de::Error::custom("expected a string or a number"))
}
