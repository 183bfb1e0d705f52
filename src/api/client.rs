//! Driftmail API Client
//!
//! A client for the mailbox service, allowing mailbox provisioning and
//! message retrieval over its JSON API.

use crate::api::MailboxApi;
use crate::api::error::ApiError;
use crate::consts::cli_consts::http;
use crate::environment::Environment;
use crate::mailbox::Mailbox;
use crate::message::{MessageBody, MessageSummary};
use reqwest::{Client, ClientBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

// User-Agent string with client version
const USER_AGENT: &str = concat!("driftmail/", env!("CARGO_PKG_VERSION"));

#[derive(Serialize)]
struct CreateMailboxRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    environment: Environment,
    base_url: String,
}

impl ApiClient {
    pub fn new(environment: Environment, base_url: String) -> Self {
        Self {
            client: ClientBuilder::new()
                .connect_timeout(http::connect_timeout())
                .timeout(http::request_timeout())
                .build()
                .expect("Failed to create HTTP client"),
            environment,
            base_url,
        }
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    fn encode_request<T: Serialize>(request: &T) -> Result<Vec<u8>, ApiError> {
        serde_json::to_vec(request).map_err(ApiError::Decode)
    }

    fn decode_response<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
        serde_json::from_slice(bytes).map_err(ApiError::Decode)
    }

    async fn handle_response_status(response: Response) -> Result<Response, ApiError> {
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        Ok(response)
    }

    async fn get_request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let url = self.build_url(endpoint);
        let mut request = self.client.get(&url).header("User-Agent", USER_AGENT);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        let response = Self::handle_response_status(response).await?;
        let response_bytes = response.bytes().await?;
        Self::decode_response(&response_bytes)
    }

    async fn post_request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Vec<u8>,
    ) -> Result<T, ApiError> {
        let url = self.build_url(endpoint);
        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("User-Agent", USER_AGENT)
            .body(body)
            .send()
            .await?;

        let response = Self::handle_response_status(response).await?;
        let response_bytes = response.bytes().await?;
        Self::decode_response(&response_bytes)
    }

    /// Path of the message-list endpoint for a mailbox.
    fn messages_endpoint(mailbox: &Mailbox) -> String {
        let address_path = urlencoding::encode(&mailbox.address).into_owned();
        format!("api/mailboxes/{}/messages", address_path)
    }
}

#[async_trait::async_trait]
impl MailboxApi for ApiClient {
    fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Provisions a new mailbox. When `address` is given the service tries to
    /// reserve that local part, otherwise it picks a random one.
    async fn create_mailbox<'a>(&self, address: Option<&'a str>) -> Result<Mailbox, ApiError> {
        let request = CreateMailboxRequest { address };
        let request_bytes = Self::encode_request(&request)?;

        self.post_request("api/mailboxes", request_bytes).await
    }

    /// Lists message summaries currently held by the mailbox.
    async fn fetch_messages(&self, mailbox: &Mailbox) -> Result<Vec<MessageSummary>, ApiError> {
        let endpoint = Self::messages_endpoint(mailbox);
        self.get_request(&endpoint, mailbox.token.as_deref()).await
    }

    /// Fetches one full message.
    async fn fetch_message(
        &self,
        mailbox: &Mailbox,
        message_id: &str,
    ) -> Result<MessageBody, ApiError> {
        let message_path = urlencoding::encode(message_id).into_owned();
        let endpoint = format!("{}/{}", Self::messages_endpoint(mailbox), message_path);
        self.get_request(&endpoint, mailbox.token.as_deref()).await
    }
}
