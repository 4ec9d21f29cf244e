use reqwest::StatusCode;

use crate::config::ConfigError;
use crate::render::RenderError;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Relay rejected the request with status {status}: {body}")]
    Relay { status: StatusCode, body: String },
}

impl MailError {
    /// True when the failure happened before or while talking to the relay
    pub fn is_transport(&self) -> bool {
        matches!(self, MailError::Transport(_) | MailError::Relay { .. })
    }
}

pub type Result<T> = std::result::Result<T, MailError>;
