// src/runner.rs
use std::{thread, time::Duration};

use tracing::{error, info};

use crate::{
    api::{types::Run, RunSource},
    config::{Config, FailurePolicy},
    error::Result,
    fetch,
    format::{self, FormattedRun, VariableCache},
    notify::{build_message, Notifier},
    progress::Progress,
    store::{self, RunStore},
};

#[derive(Clone, Debug)]
pub struct RunOptions {
    /// Pause between series requests and before every webhook post.
    pub delay: Duration,
    pub on_failure: FailurePolicy,
    pub keep: Option<usize>,
    /// Write the run file at the end (off for dry runs).
    pub persist: bool,
}

impl RunOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            delay: config.delay(),
            on_failure: config.on_failure,
            keep: config.keep,
            persist: true,
        }
    }
}

/// Summary of one pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub fetched: usize,
    pub new: usize,
    pub delivered: Vec<String>,
    pub failed: Vec<String>,
}

/// One full pass: fetch → dedup → format + post each new run → persist.
///
/// Under `FailurePolicy::Abort` the first failure is returned as-is and the run
/// file is not written, so the next pass retries everything from this one.
pub fn run(
    config: &Config,
    source: &dyn RunSource,
    notifier: &dyn Notifier,
    opts: &RunOptions,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary> {
    let raw = fetch::collect_runs(source, config.series(), opts.delay)?;
    let mut known = RunStore::load(&config.runfile)?;
    let fetched = raw.len();
    let fresh = store::dedup(raw, &known);

    info!(fetched, new = fresh.len(), known = known.len(), "Runs fetched");

    if let Some(p) = progress.as_deref_mut() {
        p.begin(fresh.len());
    }

    let mut cache = VariableCache::new();
    let mut summary = RunSummary { fetched, new: fresh.len(), ..Default::default() };

    for run in &fresh {
        match notify_one(run, config, source, notifier, &mut cache, opts.delay) {
            Ok(formatted) => {
                info!(run_id = %run.id, "Run posted");
                if let Some(p) = progress.as_deref_mut() {
                    p.item_done(&formatted);
                }
                summary.delivered.push(run.id.clone());
            }
            Err(e) => match opts.on_failure {
                FailurePolicy::Abort => return Err(e),
                FailurePolicy::Skip => {
                    error!(run_id = %run.id, error = %e, "Run skipped");
                    if let Some(p) = progress.as_deref_mut() {
                        p.item_failed(&run.id, &e.to_string());
                    }
                    summary.failed.push(run.id.clone());
                }
            },
        }
    }

    known.extend(summary.delivered.iter().cloned());
    if let Some(keep) = opts.keep {
        known.retain_recent(keep);
    }
    if opts.persist {
        known.save(&config.runfile)?;
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    Ok(summary)
}

fn notify_one(
    run: &Run,
    config: &Config,
    source: &dyn RunSource,
    notifier: &dyn Notifier,
    cache: &mut VariableCache,
    delay: Duration,
) -> Result<FormattedRun> {
    let formatted = format::format_run(run, source, cache)?;
    let message = build_message(&formatted, &config.name);
    thread::sleep(delay);
    notifier.send(&message)?;
    Ok(formatted)
}
