// src/cli.rs
use std::{env, ffi::OsString, fs, io, path::{Path, PathBuf}};

use clap::{CommandFactory, Parser};
use tracing::info;

use crate::{
    api::HttpApi,
    config::Config,
    error::{Error, Result},
    fetch,
    format::FormattedRun,
    notify::WebhookClient,
    progress::Progress,
    runner::{self, RunOptions, RunSummary},
};

const MAX_ARGFILE_DEPTH: usize = 8;

#[derive(Parser, Debug, Default)]
#[command(
    name = "runbot",
    version,
    about = "Update a Discord channel with newly verified runs from speedrun.com",
    after_help = "Arguments can be read from a file: @args.txt (one argument per line)."
)]
pub struct Cli {
    /// Path to JSON configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Webhook URL, overrides the config file
    #[arg(long, value_name = "URL")]
    pub webhook: Option<String>,

    /// Webhook name, overrides the config file
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Log messages instead of posting them; the run file is left untouched
    #[arg(long)]
    pub dry_run: bool,

    /// Debug logging (RUST_LOG wins)
    #[arg(short, long)]
    pub verbose: bool,
}

/// Prints processed runs to stdout.
#[derive(Default)]
pub struct ConsoleProgress {
    done: usize,
    failed: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        println!("{total} new run(s)");
    }
    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }
    fn item_done(&mut self, run: &FormattedRun) {
        self.done += 1;
        println!("{}\n", run.summary());
    }
    fn item_failed(&mut self, run_id: &str, error: &str) {
        self.failed += 1;
        println!("Skipped {run_id}: {error}\n");
    }
    fn finish(&mut self) {
        if self.failed == 0 {
            println!("Posted {} run(s)", self.done);
        } else {
            println!("Posted {} run(s), skipped {}", self.done, self.failed);
        }
    }
}

pub fn run() -> Result<RunSummary> {
    let args = expand_args(env::args_os())?;
    let cli = Cli::parse_from(args);

    let Some(config_path) = cli.config.clone() else {
        let _ = Cli::command().print_help();
        std::process::exit(1);
    };

    crate::log::init(cli.verbose);

    let config = load_config(&config_path, cli.webhook.clone(), cli.name.clone())?;
    execute(&config, cli.dry_run)
}

/// Load the file, apply command-line overrides, validate.
pub fn load_config(path: &Path, webhook: Option<String>, name: Option<String>) -> Result<Config> {
    let mut config = Config::load(path)?;
    config.apply_overrides(webhook, name);
    config.validate()?;
    Ok(config)
}

fn execute(config: &Config, dry_run: bool) -> Result<RunSummary> {
    let runs_url = fetch::build_runs_url(&config.api, &config.params);
    info!(url = %runs_url, "Runs query");

    let api = HttpApi::new(&config.api, runs_url)?;
    let hook = WebhookClient::new(config.webhook.clone())?.dry_run(dry_run);

    let mut opts = RunOptions::from_config(config);
    opts.persist = !dry_run;

    let mut progress = ConsoleProgress::default();
    runner::run(config, &api, &hook, &opts, Some(&mut progress))
}

/// Replace every `@path` argument with the lines of that file, one argument
/// per non-empty line. Lines may themselves be `@path`.
pub fn expand_args<I>(args: I) -> Result<Vec<OsString>>
where
    I: IntoIterator<Item = OsString>,
{
    let mut out = Vec::new();
    for arg in args {
        expand_into(arg, &mut out, 0)?;
    }
    Ok(out)
}

fn expand_into(arg: OsString, out: &mut Vec<OsString>, depth: usize) -> Result<()> {
    let file = arg.to_str().and_then(|s| s.strip_prefix('@')).map(PathBuf::from);
    let Some(path) = file else {
        out.push(arg);
        return Ok(());
    };

    if depth >= MAX_ARGFILE_DEPTH {
        return Err(Error::ArgFile { path, source: io::Error::other("argument files nested too deeply") });
    }
    let text = fs::read_to_string(&path).map_err(|source| Error::ArgFile { path: path.clone(), source })?;
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        expand_into(OsString::from(line), out, depth + 1)?;
    }
    Ok(())
}
