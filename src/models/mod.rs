pub mod recipient;
pub mod request;

pub use recipient::Recipient;
pub use request::MailRequest;
