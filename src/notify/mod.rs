// src/notify/mod.rs
pub mod embed;
pub mod webhook;

pub use embed::{build_message, WebhookMessage};
pub use webhook::{Notifier, WebhookClient};
