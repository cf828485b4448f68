//! Message delivery
//!
//! A destination is an opaque string. URLs go to a chat webhook, anything
//! else is treated as a console channel name.

use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use url::Url;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Accepts a formatted report for a destination
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send(&self, destination: &str, message: &str) -> Result<()>;
}

/// Prints messages to stdout
#[derive(Debug, Clone, Default)]
pub struct ConsoleSink;

#[async_trait]
impl MessageSink for ConsoleSink {
    async fn send(&self, _destination: &str, message: &str) -> Result<()> {
        println!("{}", message);
        Ok(())
    }
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

/// Posts `{"content": message}` to a webhook URL
#[derive(Debug, Clone)]
pub struct WebhookSink {
    client: Client,
}

impl WebhookSink {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .user_agent(format!("{}/{}", crate::PKG_NAME, crate::VERSION))
            .build()
            .map_err(|e| AppError::delivery(format!("Failed to create webhook client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl MessageSink for WebhookSink {
    async fn send(&self, destination: &str, message: &str) -> Result<()> {
        let url = Url::parse(destination)?;
        let response = self
            .client
            .post(url)
            .json(&WebhookPayload { content: message })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::delivery(format!("webhook returned {}: {}", status, body.trim())));
        }
        Ok(())
    }
}

/// True when the destination should be delivered over HTTP
pub fn is_webhook_destination(destination: &str) -> bool {
    Url::parse(destination)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Sends webhook destinations over HTTP and everything else to the console
pub struct RoutingSink {
    console: ConsoleSink,
    webhook: WebhookSink,
}

impl RoutingSink {
    pub fn new() -> Result<Self> {
        Ok(Self {
            console: ConsoleSink,
            webhook: WebhookSink::new()?,
        })
    }
}

#[async_trait]
impl MessageSink for RoutingSink {
    async fn send(&self, destination: &str, message: &str) -> Result<()> {
        if is_webhook_destination(destination) {
            self.webhook.send(destination, message).await
        } else {
            self.console.send(destination, message).await
        }
    }
}
