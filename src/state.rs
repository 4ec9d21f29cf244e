use std::sync::Arc;

use toml::Table;

use crate::config::{self, MailConfig, Settings};
use crate::error::Result;
use crate::mail::MailDispatchClient;
use crate::render::ViewRenderer;

/// Shared mailing state handed to the host application
#[derive(Clone)]
pub struct MailingState {
    pub config: Arc<MailConfig>,
    pub mailer: Arc<MailDispatchClient>,
}

impl MailingState {
    /// Resolve the section for `environment` and build the dispatch client.
    ///
    /// Nothing is built when the section is missing.
    pub fn register(tree: &Table, environment: &str, renderer: ViewRenderer) -> Result<Self> {
        let config = Arc::new(MailConfig::resolve(tree, environment)?);

        tracing::info!(
            environment = %environment,
            host = %config.host,
            port = %config.port,
            disabled = config.disabled,
            "Mailer configuration resolved"
        );

        let mailer = MailDispatchClient::new(Arc::clone(&config), renderer)?;

        Ok(Self {
            config,
            mailer: Arc::new(mailer),
        })
    }

    /// Register using `MAILER_ENVIRONMENT`, `MAILER_CONFIG` and `MAILER_TEMPLATES`
    pub fn from_env() -> Result<Self> {
        let settings = Settings::from_env();
        let tree = config::load_tree(&settings.config_path, &settings.environment)?;
        let renderer = ViewRenderer::from_glob(&settings.templates)?;

        Self::register(&tree, &settings.environment, renderer)
    }
}
