//! Consultation behavior configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::consultation::{AssessmentFormat, DEFAULT_MAX_QUESTIONS};

/// Question budget and assessment format defaults
#[derive(Debug, Clone, Deserialize)]
pub struct ConsultationConfig {
    /// Budget used when a request does not carry `max_questions`
    #[serde(default = "default_max_questions")]
    pub max_questions: u32,

    /// Line limit of the analysis section
    #[serde(default = "default_analysis_lines")]
    pub analysis_max_lines: u8,

    /// Line limit of the advice section
    #[serde(default = "default_advice_lines")]
    pub advice_max_lines: u8,
}

impl ConsultationConfig {
    pub fn assessment_format(&self) -> AssessmentFormat {
        AssessmentFormat {
            analysis_max_lines: self.analysis_max_lines,
            advice_max_lines: self.advice_max_lines,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_questions == 0 {
            return Err(ValidationError::InvalidMaxQuestions);
        }
        if self.analysis_max_lines == 0 || self.advice_max_lines == 0 {
            return Err(ValidationError::InvalidLineLimit);
        }
        Ok(())
    }
}

impl Default for ConsultationConfig {
    fn default() -> Self {
        Self {
            max_questions: default_max_questions(),
            analysis_max_lines: default_analysis_lines(),
            advice_max_lines: default_advice_lines(),
        }
    }
}

fn default_max_questions() -> u32 {
    DEFAULT_MAX_QUESTIONS
}

fn default_analysis_lines() -> u8 {
    AssessmentFormat::default().analysis_max_lines
}

fn default_advice_lines() -> u8 {
    AssessmentFormat::default().advice_max_lines
}
