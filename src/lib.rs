//! Petcare Consult - pet health consultation core
//!
//! Drives a conversation with a generative model that asks the owner a
//! bounded number of clarifying questions about their pet and then gives a
//! structured assessment. Each request is stateless: the caller supplies the
//! pet profile, the question counters and the prior turns.
//!
//! # Layers
//!
//! - `domain` - profile, question budget, prompt composition, normalization
//!   and conversation assembly
//! - `ports` - model gateway and attachment interfaces
//! - `adapters` - Gemini gateway, media sources, JSON envelopes
//! - `application` - the consult handler
//! - `config` - environment-driven configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
