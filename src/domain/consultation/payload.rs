//! The ordered block sequence handed to the model gateway.

use super::message::Turn;
use super::phase::ConversationPhase;

/// Preamble blocks followed by the normalized conversation turns.
///
/// Built only by the assembler, so the preamble length always matches the
/// phase and no caller turn is missing or reordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationPayload {
    phase: ConversationPhase,
    has_media: bool,
    blocks: Vec<Turn>,
}

impl ConversationPayload {
    pub(crate) fn new(
        phase: ConversationPhase,
        has_media: bool,
        preamble: Vec<Turn>,
        turns: Vec<Turn>,
    ) -> Self {
        debug_assert_eq!(preamble.len(), phase.preamble_blocks());
        let mut blocks = preamble;
        blocks.extend(turns);
        Self {
            phase,
            has_media,
            blocks,
        }
    }

    pub fn phase(&self) -> ConversationPhase {
        self.phase
    }

    /// Whether any turn carried or declared media.
    pub fn has_media(&self) -> bool {
        self.has_media
    }

    /// Every block in send order.
    pub fn blocks(&self) -> &[Turn] {
        &self.blocks
    }

    pub fn preamble(&self) -> &[Turn] {
        &self.blocks[..self.phase.preamble_blocks()]
    }

    /// The caller's turns, after the preamble.
    pub fn turns(&self) -> &[Turn] {
        &self.blocks[self.phase.preamble_blocks()..]
    }

    /// Text of the first block, the instruction for this turn.
    pub fn instruction(&self) -> String {
        self.blocks
            .first()
            .map(Turn::text_content)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Result of assembling a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assembly {
    /// Nothing to send: no history and no new turn.
    Empty,
    Ready(ConversationPayload),
}

impl Assembly {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn into_payload(self) -> Option<ConversationPayload> {
        match self {
            Self::Empty => None,
            Self::Ready(payload) => Some(payload),
        }
    }
}
