//! Turns and parts exchanged with the model.
//!
//! A [`RawTurn`] is what the caller hands in: text that may embed inline
//! media markers, plus attachments behind the [`BinaryResource`] port.
//! The normalizer turns it into a [`Turn`] whose parts are only text or
//! inline media, ready to serialize for the provider.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::media::{self, MediaKind};
use crate::ports::BinaryResource;

/// Author of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[serde(alias = "assistant")]
    Model,
}

impl Role {
    /// Parses a wire role; "assistant" is accepted as [`Role::Model`].
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "user" => Some(Role::User),
            "model" | "assistant" => Some(Role::Model),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized inline media: bytes plus their MIME type.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaPart {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl MediaPart {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Base64 (standard alphabet) encoding used on the wire.
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.data)
    }
}

impl fmt::Debug for MediaPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaPart")
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Atomic content unit of a normalized turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    Media(MediaPart),
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text(text.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text(text) => Some(text),
            Part::Media(_) => None,
        }
    }

    pub fn is_media(&self) -> bool {
        matches!(self, Part::Media(_))
    }
}

/// A role-tagged, normalized contribution to the conversation.
///
/// After normalization `parts` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Turn {
    pub fn new(role: Role, parts: Vec<Part>) -> Self {
        Self { role, parts }
    }

    /// Single text part turn.
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self::new(role, vec![Part::text(text)])
    }

    pub fn has_media(&self) -> bool {
        self.parts.iter().any(Part::is_media)
    }

    pub fn media_count(&self) -> usize {
        self.parts.iter().filter(|part| part.is_media()).count()
    }

    /// All text parts joined by newlines.
    pub fn text_content(&self) -> String {
        self.parts
            .iter()
            .filter_map(Part::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Pre-normalized reference to a remote file, as described by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaReference {
    /// Declared type: a MIME type or a coarse kind such as "image".
    pub declared_type: String,
    /// Where to fetch the payload from.
    pub locator: String,
    /// Display name of the file.
    pub name: String,
}

impl MediaReference {
    pub fn new(
        declared_type: impl Into<String>,
        locator: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            declared_type: declared_type.into(),
            locator: locator.into(),
            name: name.into(),
        }
    }
}

/// One inbound turn before normalization.
#[derive(Debug, Clone)]
pub struct RawTurn {
    pub role: Role,
    /// Text, possibly embedding `[MEDIA|<mime>|<base64>]` markers.
    pub text: String,
    /// Attachments in the order the owner supplied them.
    pub attachments: Vec<Arc<dyn BinaryResource>>,
    /// Types of files the caller says accompany this turn without
    /// supplying them. Only affects media detection.
    pub declared_media: Vec<String>,
}

impl RawTurn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            attachments: Vec::new(),
            declared_media: Vec::new(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text)
    }

    pub fn with_attachment(mut self, attachment: Arc<dyn BinaryResource>) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn with_declared_media(mut self, declared_type: impl Into<String>) -> Self {
        self.declared_media.push(declared_type.into());
        self
    }

    /// True when there is neither text nor any attachment.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty() && self.attachments.is_empty()
    }

    /// True when the turn carries, or declares, anything media-bearing:
    /// an inline marker, an image attachment, or a declared image file.
    pub fn has_media(&self) -> bool {
        media::contains_marker(&self.text)
            || self.attachments.iter().any(|attachment| {
                media::resolve_type(attachment.declared_type(), attachment.name()).kind
                    == MediaKind::Image
            })
            || self
                .declared_media
                .iter()
                .any(|declared| media::resolve_type(Some(declared), "").kind == MediaKind::Image)
    }
}
