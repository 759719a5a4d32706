// src/config/consts.rs

// Net config
pub const API_BASE: &str = "https://www.speedrun.com/api/v1";
pub const RUNS_EMBED: &str = "game,category,level,players";
pub const HTTP_TIMEOUT_SECS: u64 = 15;
pub const USER_AGENT: &str = concat!("runbot/", env!("CARGO_PKG_VERSION"));

// Pacing
pub const REQUEST_PAUSE_SECS: u64 = 5; // be polite, to both the API and the webhook

// Webhook
pub const WEBHOOK_MAX_ATTEMPTS: u32 = 3;
pub const RATE_LIMIT_FALLBACK_MS: u64 = 5_000;
pub const RATE_LIMIT_CAP_MS: u64 = 60_000;

// Embed text
pub const EMBED_TITLE: &str = "Game";
pub const EMBED_AUTHOR: &str = "Run verified!";
pub const EMBED_FOOTER: &str = "Submitted ";
pub const COVER_ASSET: &str = "cover-small";
