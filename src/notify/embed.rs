// src/notify/embed.rs
//! Discord webhook payload types and the run → embed layout.

use serde::{Deserialize, Serialize};

use crate::config::consts::{EMBED_AUTHOR, EMBED_FOOTER, EMBED_TITLE};
use crate::format::FormattedRun;

/// Discord webhook message payload
#[derive(Debug, Clone, Default, Serialize)]
pub struct WebhookMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Rich embeds (up to 10)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

impl WebhookMessage {
    pub fn embed(embed: Embed) -> Self {
        Self { embeds: vec![embed], ..Default::default() }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// ISO8601 timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<EmbedImage>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,

    /// Fields (up to 25)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

impl Embed {
    pub fn new() -> Self { Self::default() }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(EmbedImage { url: url.into() });
        self
    }

    pub fn author_with_url(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.author = Some(EmbedAuthor { name: name.into(), url: Some(url.into()) });
        self
    }

    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(EmbedFooter { text: text.into() });
        self
    }

    /// Inline field
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(EmbedField { name: name.into(), value: value.into(), inline: true });
        self
    }

    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedImage {
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedAuthor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Body of a 429 response
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitBody {
    /// Seconds
    #[serde(default)]
    pub retry_after: Option<f64>,
}

fn link(text: &str, url: &str) -> String {
    format!("[{text}]({url})")
}

/// Field order: runners, category, level, variables, time, in-game time.
/// Realtime is never shown, even when tracked.
pub fn build_message(run: &FormattedRun, username: &str) -> WebhookMessage {
    let mut embed = Embed::new()
        .title(EMBED_TITLE)
        .description(run.game.as_str())
        .author_with_url(EMBED_AUTHOR, run.weblink.as_str())
        .footer(EMBED_FOOTER);

    if let Some(cover) = &run.cover {
        embed = embed.thumbnail(cover.as_str());
    }
    if let Some(ts) = &run.submitted {
        embed = embed.timestamp(ts.to_rfc3339());
    }

    for player in &run.players {
        embed = embed.field("Runner", player.as_str());
    }
    embed = embed.field("Category", link(&run.category, &run.category_link));
    if let Some(level) = &run.level {
        embed = embed.field("Level", level.as_str());
    }
    for (name, label) in &run.variables {
        embed = embed.field(name.as_str(), label.as_str());
    }
    embed = embed.field("Time", link(&run.time, &run.weblink));
    if let Some(igt) = &run.ingame {
        embed = embed.field("In-game Time", link(igt, &run.weblink));
    }

    WebhookMessage::embed(embed).with_username(username)
}
