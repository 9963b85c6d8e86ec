//! State machine trait for small lifecycle enums.
//!
//! Implementors list their legal transitions once and get a validated
//! `transition_to` for free.

use super::ValidationError;

/// Trait for enums whose values move through a fixed set of transitions.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for ConversationPhase {
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Opening => vec![Continuing],
///             Continuing => vec![],
///         }
///     }
/// }
///
/// let next = ConversationPhase::Opening.transition_to(ConversationPhase::Continuing)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns all valid target states from the current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Returns true if a transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Performs the transition, rejecting anything not listed as valid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_transition(self, target))
        }
    }

    /// Checks if the current state has no outgoing transitions.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
