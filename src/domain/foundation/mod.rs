//! Foundation module - Shared domain primitives.
//!
//! Contains the error vocabulary and the state machine trait used by
//! the consultation domain.

mod errors;
mod state_machine;

pub use errors::ValidationError;
pub use state_machine::StateMachine;
