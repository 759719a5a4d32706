// src/notify/webhook.rs
use std::{thread, time::Duration};

use reqwest::{blocking::Client, StatusCode};
use tracing::{debug, info, warn};

use super::embed::{RateLimitBody, WebhookMessage};
use crate::config::consts::{RATE_LIMIT_CAP_MS, RATE_LIMIT_FALLBACK_MS, WEBHOOK_MAX_ATTEMPTS};
use crate::core::net;
use crate::error::{Error, Result};

/// Where finished messages go.
pub trait Notifier {
    fn send(&self, message: &WebhookMessage) -> Result<()>;
}

pub struct WebhookClient {
    url: String,
    client: Client,
    dry_run: bool,
}

impl WebhookClient {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Ok(Self { url: url.into(), client: net::client()?, dry_run: false })
    }

    /// Log messages instead of posting them.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    fn send_once(&self, message: &WebhookMessage) -> Result<Option<Duration>> {
        let resp = net::post_json(&self.client, &self.url, message)?;
        let status = resp.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let body: Option<RateLimitBody> = resp.json().ok();
            let wait_ms = body
                .and_then(|b| b.retry_after)
                .map(|secs| (secs * 1000.0) as u64)
                .unwrap_or(RATE_LIMIT_FALLBACK_MS)
                .min(RATE_LIMIT_CAP_MS);
            return Ok(Some(Duration::from_millis(wait_ms)));
        }

        // 204 No Content is the normal response
        if status.is_success() {
            return Ok(None);
        }

        let body = resp.text().unwrap_or_default();
        Err(Error::Webhook { status: status.as_u16(), body })
    }
}

impl Notifier for WebhookClient {
    fn send(&self, message: &WebhookMessage) -> Result<()> {
        if self.dry_run {
            let json = serde_json::to_string_pretty(message)
                .map_err(|source| Error::Encode { what: "webhook message", source })?;
            info!("[DRY RUN] Would send webhook message:\n{json}");
            return Ok(());
        }

        for attempt in 1..=WEBHOOK_MAX_ATTEMPTS {
            match self.send_once(message)? {
                None => {
                    debug!(attempt, "Webhook message sent");
                    return Ok(());
                }
                Some(wait) if retries_left(attempt) => {
                    warn!(attempt, wait_ms = wait.as_millis() as u64, "Rate limited by webhook, waiting");
                    thread::sleep(wait);
                }
                Some(_) => warn!(attempt, "Rate limited by webhook, giving up"),
            }
        }
        Err(Error::RateLimited { attempts: WEBHOOK_MAX_ATTEMPTS })
    }
}

/// No point waiting out a 429 that will not be retried.
fn retries_left(attempt: u32) -> bool {
    attempt < WEBHOOK_MAX_ATTEMPTS
}
