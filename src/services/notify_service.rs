use crate::config::RetryPolicy;
use crate::error::DeliveryError;
use crate::services::retry::with_retry;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Destination for rendered reports.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Single delivery attempt.
    async fn send(&self, payload: &str) -> Result<(), DeliveryError>;
}

#[derive(Debug, Serialize)]
struct WebhookMessage<'a> {
    content: &'a str,
}

/// Posts `{"content": ...}` to a chat webhook URL.
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self, DeliveryError> {
        let client = Client::builder().timeout(WEBHOOK_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, payload: &str) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookMessage { content: payload })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Rejected(status));
        }
        Ok(())
    }
}

/// Deliver `payload`, retrying per `policy`.
///
/// `Ok` means the message went out and the caller may advance its baseline.
pub async fn dispatch<N: Notifier + ?Sized>(
    notifier: &N,
    payload: &str,
    policy: RetryPolicy,
) -> Result<(), DeliveryError> {
    tracing::info!(chars = payload.chars().count(), "Sending payload");

    match with_retry(policy, "webhook delivery", |_| notifier.send(payload)).await {
        Some(()) => {
            tracing::info!("Payload delivered");
            Ok(())
        }
        None => {
            let attempts = policy.max_attempts.max(1);
            tracing::warn!(
                attempts,
                "Maximum delivery retries reached, differences will be recomputed next cycle"
            );
            Err(DeliveryError::Exhausted { attempts })
        }
    }
}
