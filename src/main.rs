//! Batch entry point.
//!
//! Reads one request envelope from stdin and writes one response envelope to
//! stdout. Logs go to stderr as JSON. Configuration errors are fatal.

use std::process::ExitCode;
use std::sync::Arc;

use thiserror::Error;
use tokio::io::AsyncReadExt;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use petcare_consult::adapters::ai::{GeminiConfig, GeminiGateway};
use petcare_consult::adapters::envelope::{
    ConsultRequestEnvelope, ConsultResponseEnvelope, EnvelopeError,
};
use petcare_consult::adapters::media::HttpMediaFetcher;
use petcare_consult::application::ConsultHandler;
use petcare_consult::config::{AppConfig, ConfigError, ValidationError};
use petcare_consult::domain::consultation::{
    ConversationAssembler, MessageNormalizer, PromptComposer,
};
use petcare_consult::ports::{MediaError, ProviderError};

#[derive(Debug, Error)]
enum BatchError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("startup failed: {0}")]
    Startup(String),

    #[error("could not read request: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid request: {0}")]
    Input(#[from] EnvelopeError),
}

impl BatchError {
    fn exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_) | Self::Startup(_) => ExitCode::from(2),
            Self::Io(_) | Self::Input(_) => ExitCode::from(1),
        }
    }
}

impl From<ProviderError> for BatchError {
    fn from(err: ProviderError) -> Self {
        Self::Startup(err.to_string())
    }
}

impl From<MediaError> for BatchError {
    fn from(err: MediaError) -> Self {
        Self::Startup(err.to_string())
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(text) => {
            println!("{}", ConsultResponseEnvelope::response(text).to_json());
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "request failed");
            println!("{}", ConsultResponseEnvelope::error(err.to_string()).to_json());
            err.exit_code()
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .json()
        .init();
}

async fn run() -> Result<String, BatchError> {
    let config = AppConfig::load_validated()?;
    let api_key = config.ai.api_key().ok_or(ConfigError::ValidationFailed(
        ValidationError::MissingRequired("PETCARE__AI__GEMINI_API_KEY"),
    ))?;

    let gateway = GeminiGateway::new(
        GeminiConfig::new(api_key)
            .with_model(&config.ai.model)
            .with_base_url(&config.ai.base_url)
            .with_timeout(config.ai.timeout()),
    )?;
    let fetcher = Arc::new(
        HttpMediaFetcher::new(config.media.fetch_timeout())?
            .with_max_bytes(config.media.max_attachment_bytes as u64),
    );
    let assembler = ConversationAssembler::new(
        PromptComposer::new(config.consultation.assessment_format()),
        MessageNormalizer::new(config.media.normalizer_config()),
    );
    let handler = ConsultHandler::new(assembler, Arc::new(gateway));

    let mut input = String::new();
    tokio::io::stdin().read_to_string(&mut input).await?;

    let command = ConsultRequestEnvelope::parse(&input)?
        .into_command(fetcher, config.consultation.max_questions)?;

    info!(model = %config.ai.model, history = command.history.len(), "consultation request accepted");
    let reply = handler.handle(command).await;
    Ok(reply.text().to_string())
}
