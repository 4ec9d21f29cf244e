use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::Recipient;

/// JSON envelope accepted by the relay's `/Send` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MailRequest {
    // The relay's field name, misspelling included.
    #[serde(rename = "Recepients")]
    pub recipients: Vec<Recipient>,
    pub subject: String,
    pub body: String,
    /// When set, the relay delays delivery until this instant
    pub offset: Option<DateTime<FixedOffset>>,
}

/// Comma-separated email addresses, in recipient order
pub fn join_emails(recipients: &[Recipient]) -> String {
    recipients
        .iter()
        .map(Recipient::email)
        .collect::<Vec<_>>()
        .join(", ")
}
