// src/core/net.rs

// Blocking HTTP over reqwest, one client per invocation.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::config::consts::{HTTP_TIMEOUT_SECS, USER_AGENT};
use crate::error::{Error, Result};

pub fn client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
        .map_err(|source| Error::Http { url: s!(), source })
}

/// GET `url` and decode the JSON body. Any non-2xx status is an error.
pub fn get_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T> {
    debug!(%url, "GET");
    let resp = client
        .get(url)
        .send()
        .map_err(|source| Error::Http { url: s!(url), source })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(Error::Status { url: s!(url), status: status.as_u16() });
    }

    let body = resp.text().map_err(|source| Error::Http { url: s!(url), source })?;
    serde_json::from_str(&body).map_err(|source| Error::Decode { url: s!(url), source })
}

/// POST `body` as JSON. Status handling is left to the caller.
pub fn post_json<B: Serialize>(client: &Client, url: &str, body: &B) -> Result<Response> {
    debug!(%url, "POST");
    client
        .post(url)
        .json(body)
        .send()
        .map_err(|source| Error::Http { url: s!(url), source })
}
