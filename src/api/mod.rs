// src/api/mod.rs
pub mod types;

use reqwest::blocking::Client;

use crate::core::net;
use crate::error::Result;
use types::{Envelope, Game, Run, Variable};

/// Read side of the remote API. `HttpApi` talks to speedrun.com; tests plug in fakes.
pub trait RunSource {
    /// Runs for the configured query, optionally narrowed to one game,
    /// in the order the API returned them.
    fn runs(&self, game: Option<&str>) -> Result<Vec<Run>>;

    fn series_games(&self, series: &str) -> Result<Vec<Game>>;

    fn category_variables(&self, category: &str) -> Result<Vec<Variable>>;
}

pub struct HttpApi {
    client: Client,
    base: String,
    runs_url: String,
}

impl HttpApi {
    /// `runs_url` is the full runs query (see `fetch::build_runs_url`).
    pub fn new(base: &str, runs_url: String) -> Result<Self> {
        Ok(Self {
            client: net::client()?,
            base: s!(base.trim_end_matches('/')),
            runs_url,
        })
    }
}

impl RunSource for HttpApi {
    fn runs(&self, game: Option<&str>) -> Result<Vec<Run>> {
        let url = match game {
            Some(id) => format!("{}&game={}", self.runs_url, id),
            None => self.runs_url.clone(),
        };
        let env: Envelope<Vec<Run>> = net::get_json(&self.client, &url)?;
        Ok(env.data)
    }

    fn series_games(&self, series: &str) -> Result<Vec<Game>> {
        let url = format!("{}/series/{}/games", self.base, series);
        let env: Envelope<Vec<Game>> = net::get_json(&self.client, &url)?;
        Ok(env.data)
    }

    fn category_variables(&self, category: &str) -> Result<Vec<Variable>> {
        let url = format!("{}/categories/{}/variables", self.base, category);
        let env: Envelope<Vec<Variable>> = net::get_json(&self.client, &url)?;
        Ok(env.data)
    }
}
