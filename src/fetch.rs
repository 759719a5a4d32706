// src/fetch.rs
use std::{thread, time::Duration};

use tracing::{debug, info};

use crate::api::{types::Run, RunSource};
use crate::config::consts::RUNS_EMBED;
use crate::error::Result;

/// `<base>/runs?embed=game,category,level,players&<param>&<param>…`
pub fn build_runs_url(base: &str, params: &[String]) -> String {
    let mut url = format!("{}/runs?embed={}", base.trim_end_matches('/'), RUNS_EMBED);
    for p in params.iter().map(|p| p.trim()).filter(|p| !p.is_empty()) {
        url.push('&');
        url.push_str(p);
    }
    url
}

/// Fetch candidate runs, oldest first.
///
/// With a series, the game list is fetched first and then one runs request is
/// issued per game, pausing `delay` between requests. Each response is newest
/// first, so each batch is reversed before it is appended.
pub fn collect_runs(
    source: &dyn RunSource,
    series: Option<&str>,
    delay: Duration,
) -> Result<Vec<Run>> {
    let Some(series) = series else {
        return oldest_first(source, None);
    };

    let games = source.series_games(series)?;
    info!(series, games = games.len(), "Fetching runs per game in series");

    let mut runs = Vec::new();
    for (i, game) in games.iter().enumerate() {
        if i > 0 {
            thread::sleep(delay);
        }
        let batch = oldest_first(source, Some(&game.id))?;
        debug!(game = %game.id, name = game.name(), runs = batch.len(), "Fetched runs");
        runs.extend(batch);
    }
    Ok(runs)
}

fn oldest_first(source: &dyn RunSource, game: Option<&str>) -> Result<Vec<Run>> {
    let mut runs = source.runs(game)?;
    runs.reverse();
    Ok(runs)
}
