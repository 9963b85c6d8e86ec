//! Consult command handler.
//!
//! Runs one consultation turn: assemble the conversation, call the model
//! once, and turn any provider failure into the fixed apology. The handler
//! keeps no state between calls.

use std::sync::Arc;
use tracing::{debug, error, info, Instrument};
use uuid::Uuid;

use crate::domain::consultation::{
    Assembly, ConversationAssembler, DialogueState, PetProfile, RawTurn, FALLBACK_APOLOGY,
};
use crate::ports::ModelGateway;

/// One consultation turn as supplied by the caller.
#[derive(Debug, Clone)]
pub struct ConsultCommand {
    pub profile: PetProfile,
    pub state: DialogueState,
    /// Prior turns, oldest first.
    pub history: Vec<RawTurn>,
    /// The owner's new message, if any.
    pub message: Option<RawTurn>,
}

/// What the owner gets back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsultReply {
    /// Text generated by the model.
    Delivered(String),
    /// The provider failed; carries the fixed apology.
    Fallback(String),
    /// Empty conversation; the model was not called.
    NoOp,
}

impl ConsultReply {
    /// Text to show the owner. Empty for [`ConsultReply::NoOp`].
    pub fn text(&self) -> &str {
        match self {
            Self::Delivered(text) | Self::Fallback(text) => text,
            Self::NoOp => "",
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Handler for [`ConsultCommand`].
pub struct ConsultHandler<G>
where
    G: ModelGateway,
{
    assembler: ConversationAssembler,
    gateway: Arc<G>,
}

impl<G> ConsultHandler<G>
where
    G: ModelGateway + 'static,
{
    pub fn new(assembler: ConversationAssembler, gateway: Arc<G>) -> Self {
        Self { assembler, gateway }
    }

    /// Handles one turn. Never fails: provider errors are logged and
    /// replaced by [`FALLBACK_APOLOGY`].
    pub async fn handle(&self, cmd: ConsultCommand) -> ConsultReply {
        let trace_id = Uuid::new_v4();
        let span = tracing::info_span!("consult", %trace_id);
        self.run(cmd).instrument(span).await
    }

    async fn run(&self, cmd: ConsultCommand) -> ConsultReply {
        let assembly = self
            .assembler
            .assemble(&cmd.profile, &cmd.state, &cmd.history, cmd.message.as_ref())
            .await;

        let payload = match assembly {
            Assembly::Empty => {
                debug!("empty conversation, skipping model call");
                return ConsultReply::NoOp;
            }
            Assembly::Ready(payload) => payload,
        };

        let provider = self.gateway.provider_info();
        info!(
            provider = %provider.name,
            model = %provider.model,
            phase = payload.phase().label(),
            blocks = payload.len(),
            has_media = payload.has_media(),
            questions_asked = cmd.state.questions_asked,
            max_questions = cmd.state.max_questions,
            "requesting model reply"
        );

        match self.gateway.generate(&payload).await {
            Ok(text) => {
                info!(chars = text.len(), "model reply delivered");
                ConsultReply::Delivered(text)
            }
            Err(err) => {
                error!(
                    provider = %provider.name,
                    error = %err,
                    retryable = err.is_retryable(),
                    "model call failed, answering with fallback"
                );
                ConsultReply::Fallback(FALLBACK_APOLOGY.to_string())
            }
        }
    }
}
