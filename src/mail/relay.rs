use reqwest::Client;

use crate::config::MailConfig;
use crate::error::{MailError, Result};
use crate::models::MailRequest;

/// HTTP transport to the relay's `/Send` endpoint
#[derive(Clone)]
pub struct RelayTransport {
    client: Client,
    endpoint: String,
}

impl RelayTransport {
    pub fn new(config: &MailConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST `request` as JSON. Any non-2xx status is reported as [`MailError::Relay`].
    pub async fn send(&self, request: &MailRequest) -> Result<()> {
        let res = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_else(|e| {
                tracing::debug!(error = %e, "Failed to read relay error body");
                String::new()
            });
            return Err(MailError::Relay { status, body });
        }

        tracing::debug!(status = %status, "Relay accepted mail request");
        Ok(())
    }
}
