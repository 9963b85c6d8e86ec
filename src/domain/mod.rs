//! Domain layer.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (validation errors, state machines)
//! - `consultation` - Pet profile, question budget, prompt composition and
//!   conversation assembly

pub mod consultation;
pub mod foundation;
