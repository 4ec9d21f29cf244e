pub mod config;
pub mod error;
pub mod mail;
pub mod models;
pub mod render;
pub mod state;

pub use config::MailConfig;
pub use error::{MailError, Result};
pub use mail::MailDispatchClient;
pub use models::{MailRequest, Recipient};
pub use render::{View, ViewParams, ViewRenderer};
pub use state::MailingState;
