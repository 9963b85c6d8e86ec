//! Command handlers.

mod consult;

pub use consult::{ConsultCommand, ConsultHandler, ConsultReply};
