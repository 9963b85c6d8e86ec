//! Batch envelope adapter.
//!
//! Parses the JSON request envelope, rejects malformed shapes before any
//! model call, and converts it into a [`ConsultCommand`]. Replies go back
//! out as a [`ConsultResponseEnvelope`].

mod dto;

pub use dto::{
    ConsultRequestEnvelope, ConsultResponseEnvelope, FileDeclarationDto, FileReferenceDto,
    HistoryTurnDto, PartDto, PetDetailsDto,
};

use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

use crate::adapters::media::RemoteFile;
use crate::application::handlers::ConsultCommand;
use crate::domain::consultation::{
    DialogueState, MediaReference, PetProfile, RawTurn, Role, Species,
};
use crate::ports::MediaFetcher;

/// Input validation errors. Raised before composition; no model call is
/// attempted and no partial output is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    #[error("{field} must be {expected}")]
    InvalidShape {
        field: String,
        expected: &'static str,
    },

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("chat_history[{index}] has unknown role '{role}'")]
    UnknownRole { index: usize, role: String },

    #[error("invalid field: {0}")]
    InvalidField(String),
}

impl EnvelopeError {
    fn shape(field: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidShape {
            field: field.into(),
            expected,
        }
    }
}

impl ConsultRequestEnvelope {
    /// Parses and validates a request envelope.
    pub fn parse(input: &str) -> Result<Self, EnvelopeError> {
        let mut value: Value =
            serde_json::from_str(input).map_err(|e| EnvelopeError::MalformedJson(e.to_string()))?;

        let root = value
            .as_object_mut()
            .ok_or_else(|| EnvelopeError::shape("request", "an object"))?;
        check_shapes(root)?;

        let envelope: Self =
            serde_json::from_value(value).map_err(|e| EnvelopeError::InvalidField(e.to_string()))?;
        envelope.validate()?;
        Ok(envelope)
    }

    /// Pet attributes are free display strings and are not checked here;
    /// only history roles are.
    fn validate(&self) -> Result<(), EnvelopeError> {
        for (index, turn) in self.chat_history.iter().enumerate() {
            if Role::parse(&turn.role).is_none() {
                return Err(EnvelopeError::UnknownRole {
                    index,
                    role: turn.role.clone(),
                });
            }
        }
        Ok(())
    }

    /// Converts the envelope into a handler command.
    ///
    /// File parts in the history become [`RemoteFile`] attachments read
    /// through `fetcher`. `default_max_questions` applies when the envelope
    /// does not carry `max_questions`.
    pub fn into_command(
        self,
        fetcher: Arc<dyn MediaFetcher>,
        default_max_questions: u32,
    ) -> Result<ConsultCommand, EnvelopeError> {
        let details = self.pet_details;
        let profile = PetProfile::new(
            details.pet_name.trim(),
            Species::parse(&details.pet_type),
            details.pet_age.trim(),
            details.pet_breed.trim(),
        )
        .with_gender(details.pet_gender.unwrap_or_default())
        .with_weight(details.pet_weight.unwrap_or_default());

        let state = DialogueState::new(
            details.questions_asked.unwrap_or(0),
            details.max_questions.unwrap_or(default_max_questions),
        );

        let history = self
            .chat_history
            .into_iter()
            .enumerate()
            .map(|(index, turn)| history_turn(index, turn, &fetcher))
            .collect::<Result<Vec<_>, _>>()?;

        let message = self.message.map(|text| {
            self.files
                .into_iter()
                .fold(RawTurn::user(text), |turn, file| {
                    turn.with_declared_media(file.file_type)
                })
        });

        Ok(ConsultCommand {
            profile,
            state,
            history,
            message,
        })
    }
}

fn history_turn(
    index: usize,
    turn: HistoryTurnDto,
    fetcher: &Arc<dyn MediaFetcher>,
) -> Result<RawTurn, EnvelopeError> {
    let role = Role::parse(&turn.role).ok_or_else(|| EnvelopeError::UnknownRole {
        index,
        role: turn.role.clone(),
    })?;

    let mut texts = Vec::new();
    let mut raw = RawTurn::new(role, "");
    for part in turn.parts {
        match part {
            PartDto::Text { text } | PartDto::Bare(text) => texts.push(text),
            PartDto::File { file } => {
                let name = if file.file_name.trim().is_empty() {
                    name_from_link(&file.file_link)
                } else {
                    file.file_name
                };
                let reference = MediaReference::new(file.file_type, file.file_link, name);
                raw = raw.with_attachment(Arc::new(RemoteFile::new(reference, fetcher.clone())));
            }
        }
    }
    raw.text = texts.join("\n");
    Ok(raw)
}

/// Last path segment of a link, without query or fragment.
fn name_from_link(link: &str) -> String {
    let path = link.split(['?', '#']).next().unwrap_or(link);
    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Shape checks that serde alone would report poorly.
///
/// `null` optional fields are removed so they read as absent.
fn check_shapes(root: &mut Map<String, Value>) -> Result<(), EnvelopeError> {
    match root.get_mut("pet_details") {
        None | Some(Value::Null) => return Err(EnvelopeError::MissingField("pet_details")),
        Some(Value::Object(details)) => details.retain(|_, value| !value.is_null()),
        Some(_) => return Err(EnvelopeError::shape("pet_details", "an object")),
    }

    for key in ["chat_history", "files", "message"] {
        if matches!(root.get(key), Some(Value::Null)) {
            root.remove(key);
        }
    }

    if let Some(history) = root.get("chat_history") {
        let turns = history
            .as_array()
            .ok_or_else(|| EnvelopeError::shape("chat_history", "an array"))?;
        for (index, turn) in turns.iter().enumerate() {
            check_history_turn(index, turn)?;
        }
    }

    if let Some(files) = root.get("files") {
        let files = files
            .as_array()
            .ok_or_else(|| EnvelopeError::shape("files", "an array"))?;
        for (index, file) in files.iter().enumerate() {
            if !file.get("type").map_or(false, Value::is_string) {
                return Err(EnvelopeError::shape(
                    format!("files[{}]", index),
                    "an object with a string 'type'",
                ));
            }
        }
    }

    if let Some(message) = root.get("message") {
        if !message.is_string() {
            return Err(EnvelopeError::shape("message", "a string"));
        }
    }

    Ok(())
}

fn check_history_turn(index: usize, turn: &Value) -> Result<(), EnvelopeError> {
    let turn = turn
        .as_object()
        .ok_or_else(|| EnvelopeError::shape(format!("chat_history[{}]", index), "an object"))?;

    if !turn.get("role").map_or(false, Value::is_string) {
        return Err(EnvelopeError::shape(
            format!("chat_history[{}].role", index),
            "a string",
        ));
    }

    let Some(parts) = turn.get("parts") else {
        return Ok(());
    };
    let parts = parts.as_array().ok_or_else(|| {
        EnvelopeError::shape(format!("chat_history[{}].parts", index), "an array")
    })?;

    for (part_index, part) in parts.iter().enumerate() {
        let valid = match part {
            Value::String(_) => true,
            Value::Object(fields) => {
                fields.get("text").map_or(false, Value::is_string)
                    || fields
                        .get("file")
                        .and_then(|file| file.get("file_link"))
                        .map_or(false, Value::is_string)
            }
            _ => false,
        };
        if !valid {
            return Err(EnvelopeError::shape(
                format!("chat_history[{}].parts[{}]", index, part_index),
                "a {text}, {file} or string part",
            ));
        }
    }
    Ok(())
}
