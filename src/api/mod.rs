use crate::environment::Environment;
use crate::mailbox::Mailbox;
use crate::message::{MessageBody, MessageSummary};

pub(crate) mod client;
pub use client::ApiClient;
pub mod error;
pub use error::ApiError;

#[cfg(test)]
use mockall::{automock, predicate::*};

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait MailboxApi: Send + Sync {
    fn environment(&self) -> &Environment;

    /// Provisions a new mailbox. When `address` is given the service tries to
    /// reserve that local part, otherwise it picks a random one.
    async fn create_mailbox<'a>(&self, address: Option<&'a str>) -> Result<Mailbox, ApiError>;

    /// Lists message summaries currently held by the mailbox.
    async fn fetch_messages(&self, mailbox: &Mailbox) -> Result<Vec<MessageSummary>, ApiError>;

    /// Fetches one full message.
    async fn fetch_message(
        &self,
        mailbox: &Mailbox,
        message_id: &str,
    ) -> Result<MessageBody, ApiError>;
}
