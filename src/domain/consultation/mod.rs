//! Consultation domain.
//!
//! Turns a pet profile, the dialogue counters and the raw conversation into
//! the payload for one model call. Every operation is a function of its
//! arguments; no state is shared between requests.
//!
//! # Flow
//!
//! - [`MessageNormalizer`] reconciles text, inline markers and attachments
//!   into canonical [`Turn`]s
//! - [`PromptComposer`] writes the instruction for the current budget
//! - [`ConversationAssembler`] prefixes the phase preamble and returns an
//!   [`Assembly`]

mod assembler;
mod dialogue;
mod media;
mod message;
mod normalizer;
mod payload;
mod phase;
mod profile;
mod prompt;
mod templates;

pub use assembler::ConversationAssembler;
pub use dialogue::{DialogueState, QuestionBudget, DEFAULT_MAX_QUESTIONS};
pub use media::{resolve_type, ImageLimits, MediaKind, ResolvedType, CANONICAL_IMAGE_MIME};
pub use message::{MediaPart, MediaReference, Part, RawTurn, Role, Turn};
pub use normalizer::{
    MessageNormalizer, NormalizerConfig, DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_ATTACHMENT_BYTES,
    DEFAULT_MAX_TEXT_CHARS,
};
pub use payload::{Assembly, ConversationPayload};
pub use phase::ConversationPhase;
pub use profile::{PetProfile, Species};
pub use prompt::{AssessmentFormat, PromptComposer};
pub use templates::{
    intake_greeting, ADVICE_HEADING, ANALYSIS_HEADING, EMERGENCY_ALERT, FALLBACK_APOLOGY,
    VET_DISCLAIMER,
};
