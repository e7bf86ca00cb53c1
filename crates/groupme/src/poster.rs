use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use memebot_core::config::{DeliveryConfig, GroupMeConfig};
use memebot_core::GroupId;

use crate::{
    directory::BotDirectory,
    message::{Delivery, OutboundMessage, Response},
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PostError {
    #[error("could not build http client: {0}")]
    Client(String),
    #[error("message post request failed: {0}")]
    Transport(String),
    #[error("message post rejected with status {0}")]
    Rejected(u16),
    #[error("no bot is configured for group {0}")]
    UnknownGroup(GroupId),
}

#[async_trait]
pub trait MessagePoster: Send + Sync {
    async fn post(&self, message: &OutboundMessage) -> Result<(), PostError>;
}

/// Posts to `{api_base_url}/bots/post`.
pub struct HttpMessagePoster {
    client: Client,
    endpoint: String,
}

impl HttpMessagePoster {
    pub fn new(api_base_url: &str, timeout: Duration) -> Result<Self, PostError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| PostError::Client(error.to_string()))?;

        Ok(Self { client, endpoint: format!("{}/bots/post", api_base_url.trim_end_matches('/')) })
    }

    pub fn from_config(config: &GroupMeConfig) -> Result<Self, PostError> {
        Self::new(&config.api_base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl MessagePoster for HttpMessagePoster {
    async fn post(&self, message: &OutboundMessage) -> Result<(), PostError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(message)
            .send()
            .await
            .map_err(|error| PostError::Transport(error.to_string()))?;

        if !response.status().is_success() {
            return Err(PostError::Rejected(response.status().as_u16()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total tries per message, including the first.
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    pub fn asynchronous(delivery: &DeliveryConfig) -> Self {
        Self {
            max_attempts: delivery.async_retries,
            base_delay_ms: delivery.base_delay_ms,
            max_delay_ms: delivery.max_delay_ms,
        }
    }

    pub fn ordered(delivery: &DeliveryConfig) -> Self {
        Self {
            max_attempts: delivery.sync_retries,
            base_delay_ms: delivery.base_delay_ms,
            max_delay_ms: delivery.max_delay_ms,
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(16);
        let multiplier = 1_u64 << exponent;
        let delay_ms = self.base_delay_ms.saturating_mul(multiplier).min(self.max_delay_ms);
        Duration::from_millis(delay_ms)
    }
}

pub type DeliveryTask = JoinHandle<Result<(), PostError>>;

/// Turns responder output into bot posts for the group the message came from.
#[derive(Clone)]
pub struct Outbox {
    poster: Arc<dyn MessagePoster>,
    directory: Arc<BotDirectory>,
    async_policy: RetryPolicy,
    ordered_policy: RetryPolicy,
}

impl Outbox {
    pub fn new(
        poster: Arc<dyn MessagePoster>,
        directory: Arc<BotDirectory>,
        delivery: &DeliveryConfig,
    ) -> Self {
        Self::with_policies(
            poster,
            directory,
            RetryPolicy::asynchronous(delivery),
            RetryPolicy::ordered(delivery),
        )
    }

    pub fn with_policies(
        poster: Arc<dyn MessagePoster>,
        directory: Arc<BotDirectory>,
        async_policy: RetryPolicy,
        ordered_policy: RetryPolicy,
    ) -> Self {
        Self { poster, directory, async_policy, ordered_policy }
    }

    pub fn directory(&self) -> &BotDirectory {
        &self.directory
    }

    /// Posts on a background task. The caller may drop the handle.
    pub fn post_message_async(
        &self,
        message: OutboundMessage,
        correlation_id: &str,
    ) -> DeliveryTask {
        let poster = Arc::clone(&self.poster);
        let policy = self.async_policy.clone();
        let correlation_id = correlation_id.to_owned();
        tokio::spawn(async move {
            post_with_retry(poster.as_ref(), &message, &policy, &correlation_id).await
        })
    }

    pub async fn post_message_sync(
        &self,
        message: &OutboundMessage,
        correlation_id: &str,
    ) -> Result<(), PostError> {
        post_with_retry(self.poster.as_ref(), message, &self.ordered_policy, correlation_id).await
    }

    /// Async responses get one task per reply; ordered responses get one task
    /// that posts every reply in turn, reporting the first failure.
    pub fn deliver(
        &self,
        group_id: GroupId,
        response: Response,
        correlation_id: &str,
    ) -> Result<Vec<DeliveryTask>, PostError> {
        let bot = self.directory.bot(group_id).ok_or(PostError::UnknownGroup(group_id))?;
        let messages: Vec<OutboundMessage> = response
            .replies
            .into_iter()
            .map(|reply| OutboundMessage::new(bot.bot_id(), reply))
            .collect();

        match response.delivery {
            Delivery::Async => Ok(messages
                .into_iter()
                .map(|message| self.post_message_async(message, correlation_id))
                .collect()),
            Delivery::Ordered => {
                let outbox = self.clone();
                let correlation_id = correlation_id.to_owned();
                Ok(vec![tokio::spawn(async move {
                    let mut first_error = None;
                    for message in &messages {
                        let result = outbox.post_message_sync(message, &correlation_id).await;
                        if let Err(error) = result {
                            first_error.get_or_insert(error);
                        }
                    }
                    first_error.map_or(Ok(()), Err)
                })])
            }
        }
    }
}

async fn post_with_retry(
    poster: &dyn MessagePoster,
    message: &OutboundMessage,
    policy: &RetryPolicy,
    correlation_id: &str,
) -> Result<(), PostError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match poster.post(message).await {
            Ok(()) => {
                debug!(
                    event_name = "egress.groupme.posted",
                    correlation_id,
                    attempt,
                    has_picture = message.picture_url.is_some(),
                    "posted bot message"
                );
                return Ok(());
            }
            Err(error) => {
                warn!(
                    event_name = "egress.groupme.post_failed",
                    correlation_id,
                    attempt,
                    max_attempts,
                    error = %error,
                    "bot message post failed"
                );
                if attempt >= max_attempts {
                    return Err(error);
                }

                let delay = policy.backoff(attempt - 1);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
