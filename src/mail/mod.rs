pub mod relay;

use std::iter;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use tracing::Instrument;
use uuid::Uuid;

use crate::config::MailConfig;
use crate::error::Result;
use crate::models::request::join_emails;
use crate::models::{MailRequest, Recipient};
use crate::render::{View, ViewRenderer};

pub use relay::RelayTransport;

/// Appended to every subject as `"<subject> | <site>"`
pub const DEFAULT_SITE_IDENTIFIER: &str = "PVSystem24.ru";

/// Forwards mail requests to the relay service.
///
/// Every call shape ends up in the same path: recipients are materialized,
/// views are rendered to HTML, then the empty-recipient and disabled checks
/// run before anything goes over the network.
#[derive(Clone)]
pub struct MailDispatchClient {
    config: Arc<MailConfig>,
    relay: RelayTransport,
    renderer: ViewRenderer,
    site_identifier: Arc<str>,
}

impl MailDispatchClient {
    pub fn new(config: Arc<MailConfig>, renderer: ViewRenderer) -> Result<Self> {
        let relay = RelayTransport::new(&config)?;

        Ok(Self {
            config,
            relay,
            renderer,
            site_identifier: Arc::from(DEFAULT_SITE_IDENTIFIER),
        })
    }

    pub fn with_site_identifier(mut self, site_identifier: impl Into<Arc<str>>) -> Self {
        self.site_identifier = site_identifier.into();
        self
    }

    pub fn config(&self) -> &MailConfig {
        &self.config
    }

    /// Send a literal body to `recipients`
    pub async fn send<I>(
        &self,
        recipients: I,
        subject: &str,
        body: &str,
        offset: Option<DateTime<FixedOffset>>,
    ) -> Result<()>
    where
        I: IntoIterator<Item = Recipient>,
    {
        let recipients: Vec<Recipient> = recipients.into_iter().collect();

        self.deliver(recipients, subject, body, offset)
            .instrument(send_span())
            .await
    }

    /// Send a literal body to a single recipient
    pub async fn send_to(
        &self,
        recipient: Recipient,
        subject: &str,
        body: &str,
        offset: Option<DateTime<FixedOffset>>,
    ) -> Result<()> {
        self.send(iter::once(recipient), subject, body, offset).await
    }

    /// Render `view` and send the resulting HTML to `recipients`.
    ///
    /// A render failure aborts the send; nothing is posted.
    pub async fn send_view<I>(
        &self,
        recipients: I,
        subject: &str,
        view: View,
        offset: Option<DateTime<FixedOffset>>,
    ) -> Result<()>
    where
        I: IntoIterator<Item = Recipient>,
    {
        let recipients: Vec<Recipient> = recipients.into_iter().collect();

        async move {
            tracing::debug!(view = %view.name(), "Rendering mail body");
            let body = self.renderer.render(view).await?;
            self.deliver(recipients, subject, &body, offset).await
        }
        .instrument(send_span())
        .await
    }

    /// Render `view` and send the resulting HTML to a single recipient
    pub async fn send_view_to(
        &self,
        recipient: Recipient,
        subject: &str,
        view: View,
        offset: Option<DateTime<FixedOffset>>,
    ) -> Result<()> {
        self.send_view(iter::once(recipient), subject, view, offset)
            .await
    }

    async fn deliver(
        &self,
        recipients: Vec<Recipient>,
        subject: &str,
        body: &str,
        offset: Option<DateTime<FixedOffset>>,
    ) -> Result<()> {
        let joined = join_emails(&recipients);
        if joined.is_empty() {
            tracing::warn!(
                subject = %subject,
                body = %body,
                "Requested mail is ignored due to empty recipients"
            );
            return Ok(());
        }

        if self.config.disabled {
            tracing::info!(recipients = %joined, "[Disabled] Requesting email");
            return Ok(());
        }

        tracing::info!(
            recipients = %joined,
            endpoint = %self.relay.endpoint(),
            "Requesting email"
        );

        let request = MailRequest {
            recipients,
            subject: format!("{} | {}", subject, self.site_identifier),
            body: body.to_string(),
            offset,
        };

        self.relay.send(&request).await
    }
}

fn send_span() -> tracing::Span {
    tracing::info_span!("send_mail", request_id = %Uuid::new_v4())
}
