// src/format.rs
//! Turns an API run into the display values the notifier needs.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use tracing::{debug, warn};

use crate::api::{types::{Run, Variable}, RunSource};
use crate::config::consts::COVER_ASSET;
use crate::core::duration::format_duration;
use crate::error::Result;

#[derive(Clone, Debug, PartialEq)]
pub struct FormattedRun {
    pub id: String,
    pub players: Vec<String>,
    pub game: String,
    pub cover: Option<String>,
    pub category: String,
    pub category_link: String,
    pub level: Option<String>,
    /// (variable name, value label), in the category's variable order
    pub variables: Vec<(String, String)>,
    pub time: String,
    /// Realtime was tracked for this run. Not rendered.
    pub has_realtime: bool,
    /// Only when tracked and different from the primary time.
    pub ingame: Option<String>,
    pub weblink: String,
    pub submitted: Option<DateTime<FixedOffset>>,
}

impl FormattedRun {
    /// `Alice, Bob`
    pub fn players_line(&self) -> String {
        self.players.join(", ")
    }

    /// One console line per processed run.
    pub fn summary(&self) -> String {
        format!(
            "{}: {} - {} - {}\n {}",
            self.players_line(), self.game, self.category, self.time, self.weblink
        )
    }
}

/// Category variable definitions, fetched at most once per category per invocation.
#[derive(Default)]
pub struct VariableCache {
    by_category: HashMap<String, Vec<Variable>>,
}

impl VariableCache {
    pub fn new() -> Self { Self::default() }

    pub fn get(&mut self, source: &dyn RunSource, category: &str) -> Result<&[Variable]> {
        if !self.by_category.contains_key(category) {
            let vars = source.category_variables(category)?;
            debug!(category, variables = vars.len(), "Fetched category variables");
            self.by_category.insert(s!(category), vars);
        }
        Ok(self.by_category.get(category).map(Vec::as_slice).unwrap_or(&[]))
    }

    pub fn len(&self) -> usize { self.by_category.len() }
    pub fn is_empty(&self) -> bool { self.by_category.is_empty() }
}

pub fn format_run(run: &Run, source: &dyn RunSource, cache: &mut VariableCache) -> Result<FormattedRun> {
    let game = run.game();
    let category = run.category();

    let variables = if run.values.is_empty() {
        Vec::new()
    } else {
        resolve_variables(run, cache.get(source, &category.id)?)
    };

    let primary = run.times.primary_t;

    let submitted = run.submitted.as_deref().and_then(|s| match DateTime::parse_from_rfc3339(s) {
        Ok(ts) => Some(ts),
        Err(e) => {
            warn!(run_id = %run.id, submitted = s, error = %e, "Unparseable submission time");
            None
        }
    });

    Ok(FormattedRun {
        id: run.id.clone(),
        players: run.players().iter().map(|p| s!(p.display_name())).collect(),
        game: s!(game.name()),
        cover: game.asset_uri(COVER_ASSET).map(String::from),
        category: category.name.clone(),
        category_link: category.weblink.clone(),
        level: run.level.as_ref().map(|l| l.name.clone()),
        variables,
        time: format_duration(primary),
        has_realtime: run.times.realtime_secs().is_some(),
        ingame: run.times.ingame_secs().filter(|t| *t != primary).map(format_duration),
        weblink: run.weblink.clone(),
        submitted,
    })
}

/// Match the run's (variable id → value id) pairs against the category's
/// definitions and resolve each value id to its label.
fn resolve_variables(run: &Run, defs: &[Variable]) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for var in defs {
        let Some(value_id) = run.values.get(&var.id) else { continue };
        match var.label(value_id) {
            Some(label) => out.push((var.name.clone(), s!(label))),
            None => warn!(run_id = %run.id, variable = %var.id, value = %value_id, "No label for variable value"),
        }
    }
    out
}
