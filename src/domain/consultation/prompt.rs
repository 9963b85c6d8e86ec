//! Instruction text for the current turn.
//!
//! The composer is a pure function of profile, dialogue state and the
//! media flag. There is no I/O and no randomness, so identical inputs
//! always produce byte-identical text.

use super::dialogue::{DialogueState, QuestionBudget};
use super::profile::PetProfile;
use super::templates::{
    ADVICE_HEADING, ANALYSIS_HEADING, EMERGENCY_ALERT, GUIDELINES, MEDIA_CLAUSE, PERSONA,
    PERSONA_BRIEF, VET_DISCLAIMER,
};

/// Line limits of the two assessment sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssessmentFormat {
    pub analysis_max_lines: u8,
    pub advice_max_lines: u8,
}

impl Default for AssessmentFormat {
    fn default() -> Self {
        Self {
            analysis_max_lines: 4,
            advice_max_lines: 6,
        }
    }
}

/// Builds the instruction block that steers each model turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromptComposer {
    format: AssessmentFormat,
}

impl PromptComposer {
    pub fn new(format: AssessmentFormat) -> Self {
        Self { format }
    }

    /// Full instruction, sent when the conversation opens.
    pub fn compose(&self, profile: &PetProfile, state: &DialogueState, has_media: bool) -> String {
        let mut sections = vec![
            PERSONA.to_string(),
            GUIDELINES.to_string(),
            budget_clause(state),
        ];
        if has_media {
            sections.push(MEDIA_CLAUSE.to_string());
        }
        sections.push(pet_details(profile));
        sections.push(self.format_contract(&profile.name));
        sections.push(hard_rule(state));
        sections.join("\n\n")
    }

    /// Condensed context reminder, sent on every later turn.
    ///
    /// Carries the same budget, media, format and hard-rule clauses as
    /// [`compose`](Self::compose) with a one-line persona and pet summary.
    pub fn compose_reminder(
        &self,
        profile: &PetProfile,
        state: &DialogueState,
        has_media: bool,
    ) -> String {
        let mut sections = vec![
            format!(
                "CONTEXT REMINDER: {} You are helping the owner of {}.",
                PERSONA_BRIEF,
                profile.summary()
            ),
            budget_clause(state),
        ];
        if has_media {
            sections.push(MEDIA_CLAUSE.to_string());
        }
        sections.push(self.brief_format_contract());
        sections.push(hard_rule(state));
        sections.join("\n\n")
    }

    fn format_contract(&self, pet_name: &str) -> String {
        format!(
            "OUTPUT FORMAT FOR THE FINAL ASSESSMENT:\n\
             {analysis} at most {analysis_lines} lines assessing {pet_name}'s condition based on the owner's answers.\n\
             {advice} at most {advice_lines} lines of general care recommendations and home solutions.\n\
             End the final assessment with this exact sentence: \"{disclaimer}\"\n\
             If, and only if, you judge the situation to be urgent, begin the final assessment with the exact phrase \"{alert}\" followed by one line telling the owner to contact a veterinarian immediately.",
            analysis = ANALYSIS_HEADING,
            analysis_lines = self.format.analysis_max_lines,
            advice = ADVICE_HEADING,
            advice_lines = self.format.advice_max_lines,
            pet_name = pet_name,
            disclaimer = VET_DISCLAIMER,
            alert = EMERGENCY_ALERT,
        )
    }

    fn brief_format_contract(&self) -> String {
        format!(
            "FINAL ASSESSMENT FORMAT: {} (max {} lines), then {} (max {} lines), ending with exactly: \"{}\" Prefix with \"{}\" only if the situation is urgent.",
            ANALYSIS_HEADING,
            self.format.analysis_max_lines,
            ADVICE_HEADING,
            self.format.advice_max_lines,
            VET_DISCLAIMER,
            EMERGENCY_ALERT,
        )
    }
}

fn budget_clause(state: &DialogueState) -> String {
    match state.budget() {
        QuestionBudget::Open { remaining } => format!(
            "QUESTION BUDGET:\n\
             Questions asked so far: {asked} of {max}. Questions remaining: {remaining}.\n\
             In this reply, ask exactly one clarifying question and nothing else; after it, {after} will remain.\n\
             Do not give any analysis, assessment, advice or recommendation yet.",
            asked = state.questions_asked,
            max = state.max_questions,
            remaining = remaining,
            after = more_questions(remaining - 1),
        ),
        QuestionBudget::Exhausted => format!(
            "QUESTION BUDGET:\n\
             All {max} clarifying questions have been used and questioning is now closed.\n\
             Do not request any further information from the owner.\n\
             Produce the final structured assessment now, using the output format below.",
            max = state.max_questions,
        ),
    }
}

fn more_questions(count: u32) -> String {
    if count == 1 {
        "1 more question".to_string()
    } else {
        format!("{} more questions", count)
    }
}

fn pet_details(profile: &PetProfile) -> String {
    format!("PET DETAILS:\n{}", profile.attribute_lines().join("\n"))
}

fn hard_rule(state: &DialogueState) -> String {
    format!(
        "HARD RULE: Never exceed {} clarifying questions in total across this conversation.",
        state.max_questions
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::consultation::Species;
    use proptest::prelude::*;

    fn max() -> PetProfile {
        PetProfile::new("Max", Species::Dog, "3", "Labrador")
    }

    fn composer() -> PromptComposer {
        PromptComposer::default()
    }

    /// Phrases that invite the model to ask something.
    const INVITATIONS: [&str; 3] = ["ask exactly one", "Questions remaining", "more question"];

    mod open_budget {
        use super::*;

        #[test]
        fn first_turn_states_remaining_and_forbids_advice() {
            let text = composer().compose(&max(), &DialogueState::new(0, 4), false);
            assert!(text.contains("Questions remaining: 4."));
            assert!(text.contains("3 more questions"));
            assert!(text.contains("ask exactly one clarifying question"));
            assert!(text.contains("Do not give any analysis, assessment, advice or recommendation yet."));
        }

        #[test]
        fn last_question_uses_singular_and_zero() {
            let text = composer().compose(&max(), &DialogueState::new(3, 4), false);
            assert!(text.contains("Questions remaining: 1."));
            assert!(text.contains("0 more questions"));

            let text = composer().compose(&max(), &DialogueState::new(2, 4), false);
            assert!(text.contains("1 more question will remain"));
        }
    }

    mod exhausted_budget {
        use super::*;

        #[test]
        fn closed_questioning_requests_assessment_with_disclaimer() {
            let text = composer().compose(&max(), &DialogueState::new(4, 4), false);
            assert!(text.contains("questioning is now closed"));
            assert!(text.contains("Produce the final structured assessment now"));
            assert!(text.contains(VET_DISCLAIMER));
            for phrase in INVITATIONS {
                assert!(!text.contains(phrase), "found {:?}", phrase);
            }
        }

        #[test]
        fn overrun_counts_as_closed() {
            let text = composer().compose(&max(), &DialogueState::new(9, 4), false);
            assert!(text.contains("questioning is now closed"));
        }
    }

    mod clauses {
        use super::*;

        #[test]
        fn media_clause_only_with_media() {
            let state = DialogueState::default();
            assert!(composer().compose(&max(), &state, true).contains("ATTACHED MEDIA:"));
            assert!(!composer().compose(&max(), &state, false).contains("ATTACHED MEDIA:"));
        }

        #[test]
        fn pet_attributes_embedded_verbatim() {
            let profile = max().with_gender("Male").with_weight("30 kg");
            let text = composer().compose(&profile, &DialogueState::default(), false);
            assert!(text.contains("- Pet Name: Max"));
            assert!(text.contains("- Pet Breed: Labrador"));
            assert!(text.contains("- Pet Gender: Male"));
            assert!(text.contains("- Pet Weight: 30 kg"));
        }

        #[test]
        fn format_contract_and_hard_rule_every_turn() {
            let text = composer().compose(&max(), &DialogueState::new(1, 5), false);
            assert!(text.contains(ANALYSIS_HEADING));
            assert!(text.contains(ADVICE_HEADING));
            assert!(text.contains(EMERGENCY_ALERT));
            assert!(text.contains(
                "HARD RULE: Never exceed 5 clarifying questions in total across this conversation."
            ));
        }

        #[test]
        fn custom_line_limits_are_stated() {
            let composer = PromptComposer::new(AssessmentFormat {
                analysis_max_lines: 2,
                advice_max_lines: 3,
            });
            let text = composer.compose(&max(), &DialogueState::default(), false);
            assert!(text.contains("at most 2 lines assessing Max's condition"));
            assert!(text.contains("at most 3 lines of general care"));
        }
    }

    mod reminder {
        use super::*;

        #[test]
        fn reminder_is_shorter_but_keeps_contract() {
            let state = DialogueState::new(2, 4);
            let full = composer().compose(&max(), &state, true);
            let brief = composer().compose_reminder(&max(), &state, true);
            assert!(brief.len() < full.len());
            assert!(brief.contains("Max (Dog, age 3, breed Labrador)"));
            assert!(brief.contains("Questions remaining: 2."));
            assert!(brief.contains("ATTACHED MEDIA:"));
            assert!(brief.contains(VET_DISCLAIMER));
            assert!(brief.contains("HARD RULE"));
        }

        #[test]
        fn reminder_closed_budget_has_no_invitation() {
            let brief = composer().compose_reminder(&max(), &DialogueState::new(4, 4), false);
            for phrase in INVITATIONS {
                assert!(!brief.contains(phrase), "found {:?}", phrase);
            }
            assert!(brief.contains(VET_DISCLAIMER));
        }
    }

    proptest! {
        #[test]
        fn compose_is_pure(
            name in "[A-Za-z]{1,12}",
            asked in 0u32..10,
            max_questions in 0u32..10,
            has_media in any::<bool>(),
        ) {
            let profile = PetProfile::new(name, Species::Cat, "2", "Tabby");
            let state = DialogueState::new(asked, max_questions);
            let composer = PromptComposer::default();
            prop_assert_eq!(
                composer.compose(&profile, &state, has_media),
                composer.compose(&profile, &state, has_media)
            );
            prop_assert_eq!(
                composer.compose_reminder(&profile, &state, has_media),
                composer.compose_reminder(&profile, &state, has_media)
            );
        }

        #[test]
        fn open_budget_states_exact_remaining(asked in 0u32..20, extra in 1u32..20) {
            let state = DialogueState::new(asked, asked + extra);
            let text = PromptComposer::default().compose(&max(), &state, false);
            let expected = format!("Questions remaining: {}.", extra);
            prop_assert!(text.contains(&expected));
        }

        #[test]
        fn exhausted_budget_never_invites(max_questions in 0u32..20, over in 0u32..5) {
            let state = DialogueState::new(max_questions + over, max_questions);
            let text = PromptComposer::default().compose(&max(), &state, false);
            for phrase in INVITATIONS {
                prop_assert!(!text.contains(phrase));
            }
            prop_assert!(text.contains(VET_DISCLAIMER));
        }
    }
}
