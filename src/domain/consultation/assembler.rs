//! Conversation assembly.
//!
//! Folds the instruction text into ordinary turns: the phase decides the
//! preamble, then every caller turn is normalized and appended in order.

use tracing::debug;

use super::dialogue::DialogueState;
use super::message::{RawTurn, Role, Turn};
use super::normalizer::MessageNormalizer;
use super::payload::{Assembly, ConversationPayload};
use super::phase::ConversationPhase;
use super::profile::PetProfile;
use super::prompt::PromptComposer;
use super::templates::intake_greeting;

/// Produces the payload for one model call.
#[derive(Debug, Clone, Default)]
pub struct ConversationAssembler {
    composer: PromptComposer,
    normalizer: MessageNormalizer,
}

impl ConversationAssembler {
    pub fn new(composer: PromptComposer, normalizer: MessageNormalizer) -> Self {
        Self {
            composer,
            normalizer,
        }
    }

    /// Assembles preamble plus turns.
    ///
    /// A blank `new_turn` counts as absent. With no history and no new turn
    /// the result is [`Assembly::Empty`] and nothing should be sent.
    pub async fn assemble(
        &self,
        profile: &PetProfile,
        state: &DialogueState,
        history: &[RawTurn],
        new_turn: Option<&RawTurn>,
    ) -> Assembly {
        let new_turn = new_turn.filter(|turn| !turn.is_blank());
        if history.is_empty() && new_turn.is_none() {
            debug!("empty conversation, nothing to assemble");
            return Assembly::Empty;
        }

        let has_media = history.iter().chain(new_turn).any(RawTurn::has_media);
        let phase = ConversationPhase::for_history_len(history.len());

        let preamble = match phase {
            ConversationPhase::Opening => vec![
                Turn::text(Role::User, self.composer.compose(profile, state, has_media)),
                Turn::text(Role::Model, intake_greeting(profile)),
            ],
            ConversationPhase::Continuing => vec![Turn::text(
                Role::User,
                self.composer.compose_reminder(profile, state, has_media),
            )],
        };

        let mut turns = Vec::with_capacity(history.len() + 1);
        for raw in history.iter().chain(new_turn) {
            turns.push(self.normalizer.normalize(raw).await);
        }

        debug!(
            phase = phase.label(),
            has_media,
            turns = turns.len(),
            budget = ?state.budget(),
            "assembled conversation"
        );

        Assembly::Ready(ConversationPayload::new(phase, has_media, preamble, turns))
    }
}
