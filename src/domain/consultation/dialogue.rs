//! Dialogue progress and the clarifying-question budget.
//!
//! The budget is a soft invariant. The composer instructs the model to stay
//! within it; nothing here prevents a model from asking more. Whether a model
//! reply counted as a question is decided by the caller, which then calls
//! [`DialogueState::record_question`].

use serde::{Deserialize, Serialize};

/// Default number of clarifying questions before an assessment is due.
pub const DEFAULT_MAX_QUESTIONS: u32 = 4;

/// Where the conversation stands against its question budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum QuestionBudget {
    /// More clarifying questions may be asked.
    Open { remaining: u32 },
    /// Questioning is closed; the final assessment is due.
    Exhausted,
}

impl QuestionBudget {
    /// Returns true while another question may be asked.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }
}

/// Counters tracking how many clarifying questions have been asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueState {
    pub questions_asked: u32,
    pub max_questions: u32,
}

impl DialogueState {
    pub fn new(questions_asked: u32, max_questions: u32) -> Self {
        Self {
            questions_asked,
            max_questions,
        }
    }

    /// Questions still available, zero once the budget is spent or overrun.
    pub fn remaining(&self) -> u32 {
        self.max_questions.saturating_sub(self.questions_asked)
    }

    pub fn budget(&self) -> QuestionBudget {
        match self.remaining() {
            0 => QuestionBudget::Exhausted,
            remaining => QuestionBudget::Open { remaining },
        }
    }

    /// Returns the state after one more model question.
    ///
    /// Driven by the caller's judgment of the model reply.
    pub fn record_question(self) -> Self {
        Self {
            questions_asked: self.questions_asked.saturating_add(1),
            ..self
        }
    }
}

impl Default for DialogueState {
    fn default() -> Self {
        Self::new(0, DEFAULT_MAX_QUESTIONS)
    }
}
