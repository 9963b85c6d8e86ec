//! Conversation phase.
//!
//! The phase decides what preamble precedes the turns sent to the model.
//! It is derived solely from whether the caller supplied any history.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Which preamble the assembler emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationPhase {
    /// No history yet: full instruction plus scripted acknowledgement.
    Opening,
    /// History exists: condensed context reminder only.
    Continuing,
}

impl ConversationPhase {
    /// Selects the phase for a history of the given length.
    pub fn for_history_len(len: usize) -> Self {
        if len == 0 {
            Self::Opening
        } else {
            Self::Continuing
        }
    }

    /// Number of preamble blocks this phase puts before the turns.
    pub fn preamble_blocks(&self) -> usize {
        match self {
            Self::Opening => 2,
            Self::Continuing => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Opening => "opening",
            Self::Continuing => "continuing",
        }
    }
}

impl StateMachine for ConversationPhase {
    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            Self::Opening => vec![Self::Continuing],
            Self::Continuing => vec![],
        }
    }
}
