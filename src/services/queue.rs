//! Publishing work item ids to the worker queue.
//!
//! Workers subscribe to one NSQ topic per stage. The registry only publishes:
//! the message body is the work item id as decimal text.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};

/// HTTP connect timeout for NSQ publishes.
const NSQ_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// HTTP total timeout for NSQ publishes.
const NSQ_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Anything that can hand a work item to the workers serving a topic.
#[async_trait]
pub trait QueueClient: Send + Sync {
    async fn enqueue(&self, topic: &str, work_item_id: i32) -> AppResult<()>;
}

/// Publishes through the nsqd HTTP API (`POST /pub?topic=...`).
#[derive(Debug, Clone)]
pub struct NsqClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl NsqClient {
    pub fn new(base_url: &str) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(NSQ_CONNECT_TIMEOUT)
            .timeout(NSQ_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build NSQ client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    fn publish_url(&self, topic: &str) -> String {
        format!("{}/pub?topic={}", self.base_url, urlencoding::encode(topic))
    }
}

#[async_trait]
impl QueueClient for NsqClient {
    async fn enqueue(&self, topic: &str, work_item_id: i32) -> AppResult<()> {
        let response = self
            .http_client
            .post(self.publish_url(topic))
            .body(work_item_id.to_string())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(topic, work_item_id, %status, "NSQ rejected publish: {}", body);
            return Err(AppError::Queue(format!(
                "NSQ returned {} for topic {}",
                status, topic
            )));
        }

        debug!(topic, work_item_id, "Work item published");
        Ok(())
    }
}
