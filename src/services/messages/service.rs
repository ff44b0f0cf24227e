//! Messages service implementation.

use super::*;
use crate::errors::{PostMessageError, RelayResult};
use crate::services::auth::AuthCredential;
use crate::transport::JsonRestClient;
use crate::types::ChatMessage;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Resource of the post call
pub const POST_MESSAGE_RESOURCE: &str = "chat.postMessage";

/// Trait for messages service operations
#[async_trait]
pub trait MessagesServiceTrait: Send + Sync {
    /// Post a message to a channel, authorized by `credential`
    async fn post(
        &self,
        message: &ChatMessage,
        credential: &AuthCredential,
    ) -> RelayResult<PostMessageResponse>;
}

/// Messages service implementation
#[derive(Debug, Clone)]
pub struct MessagesService {
    client: JsonRestClient,
}

impl MessagesService {
    /// Create a new messages service
    pub fn new(client: JsonRestClient) -> Self {
        Self { client }
    }
}

/// Accept a post answer only when it reports success
pub fn ensure_posted(
    response: Option<PostMessageResponse>,
) -> Result<PostMessageResponse, PostMessageError> {
    match response {
        Some(response) if response.success => Ok(response),
        Some(response) => Err(PostMessageError::new(response.error.unwrap_or_default())),
        None => Err(PostMessageError::new("")),
    }
}

#[async_trait]
impl MessagesServiceTrait for MessagesService {
    #[instrument(skip(self, message, credential), fields(channel = %message.channel))]
    async fn post(
        &self,
        message: &ChatMessage,
        credential: &AuthCredential,
    ) -> RelayResult<PostMessageResponse> {
        let headers = credential.headers();

        let response: Option<PostMessageResponse> = self
            .client
            .post(POST_MESSAGE_RESOURCE, message, Some(headers))
            .await?;

        let response = ensure_posted(response)?;
        debug!(attachments = message.attachments.len(), "Message posted");
        Ok(response)
    }
}
