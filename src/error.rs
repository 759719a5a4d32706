// src/error.rs
use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not read config {path}: {source}")]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("Invalid config {path}: {source}")]
    ConfigParse { path: PathBuf, source: serde_json::Error },

    #[error("Invalid config: {0}")]
    ConfigInvalid(String),

    #[error("Could not expand argument file {path}: {source}")]
    ArgFile { path: PathBuf, source: io::Error },

    #[error("HTTP request to {url} failed: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP error: {status} {url}")]
    Status { url: String, status: u16 },

    #[error("Could not parse response from {url}: {source}")]
    Decode { url: String, source: serde_json::Error },

    #[error("Webhook returned error: {status} - {body}")]
    Webhook { status: u16, body: String },

    #[error("Webhook still rate limited after {attempts} attempts")]
    RateLimited { attempts: u32 },

    #[error("Could not read run file {path}: {source}")]
    StoreRead { path: PathBuf, source: io::Error },

    #[error("Could not write run file {path}: {source}")]
    StoreWrite { path: PathBuf, source: io::Error },

    #[error("Could not serialize {what}: {source}")]
    Encode { what: &'static str, source: serde_json::Error },
}
