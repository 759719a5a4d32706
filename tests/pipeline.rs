// tests/pipeline.rs
//
// End-to-end passes with an in-memory API and webhook.
//
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use runbot::api::types::{Game, Run, Variable};
use runbot::api::RunSource;
use runbot::config::{Config, FailurePolicy};
use runbot::format::FormattedRun;
use runbot::notify::{Notifier, WebhookMessage};
use runbot::progress::Progress;
use runbot::runner::{self, RunOptions};
use runbot::{Error, Result};

fn tmp_runfile(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("runbot_pipeline_{}_{}.json", std::process::id(), name));
    let _ = fs::remove_file(&p);
    p
}

fn config(runfile: &PathBuf) -> Config {
    Config::from_json(&format!(
        r#"{{"webhook":"https://hook.example/x","name":"Bot","params":["status=verified"],"runfile":{}}}"#,
        serde_json::to_string(runfile).unwrap()
    ))
    .unwrap()
}

fn opts(config: &Config) -> RunOptions {
    let mut o = RunOptions::from_config(config);
    o.delay = Duration::ZERO;
    o
}

fn run_json(id: &str, game: &str, player: &str, values: &str) -> String {
    format!(
        r#"{{
            "id": "{id}",
            "weblink": "https://www.speedrun.com/run/{id}",
            "game": {{ "data": {{ "id": "{game}", "names": {{ "international": "TestGame" }},
                "assets": {{ "cover-small": {{ "uri": "https://img/{game}.png" }} }} }} }},
            "category": {{ "data": {{ "id": "cat1", "name": "Any%", "weblink": "https://www.speedrun.com/tg#Any" }} }},
            "level": null,
            "players": {{ "data": [ {{ "names": {{ "international": "{player}" }} }} ] }},
            "values": {values},
            "times": {{ "primary_t": 125, "realtime": null, "ingame_t": 125 }},
            "submitted": "2020-05-01T10:20:30Z"
        }}"#
    )
}

fn run(id: &str) -> Run {
    serde_json::from_str(&run_json(id, "g1", "Alice", "{}")).unwrap()
}

/// Runs are handed out newest first, the way the API does.
#[derive(Default)]
struct FakeApi {
    runs: HashMap<Option<String>, Vec<Run>>,
    games: Vec<Game>,
    variable_calls: Cell<usize>,
    run_calls: RefCell<Vec<Option<String>>>,
}

impl FakeApi {
    fn with_runs(runs: Vec<Run>) -> Self {
        let mut api = Self::default();
        api.runs.insert(None, runs);
        api
    }
}

impl RunSource for FakeApi {
    fn runs(&self, game: Option<&str>) -> Result<Vec<Run>> {
        let key = game.map(String::from);
        self.run_calls.borrow_mut().push(key.clone());
        Ok(self.runs.get(&key).cloned().unwrap_or_default())
    }

    fn series_games(&self, series: &str) -> Result<Vec<Game>> {
        assert_eq!(series, "s1");
        Ok(self.games.clone())
    }

    fn category_variables(&self, _category: &str) -> Result<Vec<Variable>> {
        self.variable_calls.set(self.variable_calls.get() + 1);
        Ok(serde_json::from_str(
            r#"[{ "id": "plat", "name": "Platform", "values": { "values": { "pc": { "label": "PC" } } } }]"#,
        )
        .unwrap())
    }
}

#[derive(Default)]
struct FakeHook {
    sent: RefCell<Vec<WebhookMessage>>,
    fail_on_call: Option<usize>,
    calls: Cell<usize>,
}

impl Notifier for FakeHook {
    fn send(&self, message: &WebhookMessage) -> Result<()> {
        let n = self.calls.get();
        self.calls.set(n + 1);
        if self.fail_on_call == Some(n) {
            return Err(Error::Webhook { status: 400, body: "bad embed".into() });
        }
        self.sent.borrow_mut().push(message.clone());
        Ok(())
    }
}

#[derive(Default)]
struct Recorder {
    total: Option<usize>,
    done: Vec<String>,
    failed: Vec<String>,
}

impl Progress for Recorder {
    fn begin(&mut self, total: usize) { self.total = Some(total); }
    fn item_done(&mut self, run: &FormattedRun) { self.done.push(run.id.clone()); }
    fn item_failed(&mut self, run_id: &str, _error: &str) { self.failed.push(run_id.into()); }
}

fn stored(path: &PathBuf) -> Vec<String> {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn first_pass_posts_and_second_pass_is_silent() {
    let runfile = tmp_runfile("scenario");
    fs::write(&runfile, "[]").unwrap();
    let cfg = config(&runfile);
    let api = FakeApi::with_runs(vec![run("abc123")]);

    let hook = FakeHook::default();
    let summary = runner::run(&cfg, &api, &hook, &opts(&cfg), None).unwrap();
    assert_eq!(summary.delivered, vec!["abc123".to_string()]);

    let sent = hook.sent.borrow();
    assert_eq!(sent.len(), 1);
    let embed = &sent[0].embeds[0];
    assert_eq!(sent[0].username.as_deref(), Some("Bot"));
    assert_eq!(embed.title.as_deref(), Some("Game"));
    assert_eq!(embed.description.as_deref(), Some("TestGame"));
    let names: Vec<&str> = embed.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Runner", "Category", "Time"]);
    assert_eq!(embed.field_value("Runner"), Some("Alice"));
    assert_eq!(embed.field_value("Category"), Some("[Any%](https://www.speedrun.com/tg#Any)"));
    assert_eq!(embed.field_value("Time"), Some("[0:02:05](https://www.speedrun.com/run/abc123)"));
    assert_eq!(embed.field_value("In-game Time"), None);
    assert_eq!(embed.field_value("Level"), None);
    assert_eq!(stored(&runfile), vec!["abc123"]);

    // Same API answer, now already known
    let hook = FakeHook::default();
    let summary = runner::run(&cfg, &api, &hook, &opts(&cfg), None).unwrap();
    assert_eq!(summary.new, 0);
    assert!(hook.sent.borrow().is_empty());
    assert_eq!(stored(&runfile), vec!["abc123"]);
}

#[test]
fn missing_runfile_is_created() {
    let runfile = tmp_runfile("missing");
    let cfg = config(&runfile);
    let api = FakeApi::with_runs(vec![run("r1")]);
    runner::run(&cfg, &api, &FakeHook::default(), &opts(&cfg), None).unwrap();
    assert_eq!(stored(&runfile), vec!["r1"]);
}

#[test]
fn posts_oldest_first_and_appends_after_known_ids() {
    let runfile = tmp_runfile("order");
    fs::write(&runfile, r#"["old", "r2"]"#).unwrap();
    let cfg = config(&runfile);
    // newest first from the API
    let api = FakeApi::with_runs(vec![run("r3"), run("r2"), run("r1")]);

    let hook = FakeHook::default();
    let mut rec = Recorder::default();
    let summary = runner::run(&cfg, &api, &hook, &opts(&cfg), Some(&mut rec)).unwrap();

    assert_eq!(summary.fetched, 3);
    assert_eq!(summary.new, 2);
    assert_eq!(rec.total, Some(2));
    assert_eq!(rec.done, vec!["r1", "r3"]);
    assert_eq!(stored(&runfile), vec!["old", "r2", "r1", "r3"]);
}

#[test]
fn series_fetches_each_game() {
    let runfile = tmp_runfile("series");
    let mut cfg = config(&runfile);
    cfg.series = Some("s1".into());

    let mut api = FakeApi::default();
    api.games = serde_json::from_str(
        r#"[{ "id": "g1", "names": { "international": "One" } }, { "id": "g2", "names": { "international": "Two" } }]"#,
    )
    .unwrap();
    api.runs.insert(Some("g1".into()), vec![run("a2"), run("a1")]);
    api.runs.insert(Some("g2".into()), vec![run("b1")]);

    let mut rec = Recorder::default();
    runner::run(&cfg, &api, &FakeHook::default(), &opts(&cfg), Some(&mut rec)).unwrap();

    assert_eq!(*api.run_calls.borrow(), vec![Some("g1".to_string()), Some("g2".to_string())]);
    assert_eq!(rec.done, vec!["a1", "a2", "b1"]);
}

#[test]
fn variables_are_looked_up_once_per_category() {
    let runfile = tmp_runfile("vars");
    let cfg = config(&runfile);
    let with_var = |id: &str| -> Run {
        serde_json::from_str(&run_json(id, "g1", "Alice", r#"{ "plat": "pc" }"#)).unwrap()
    };
    let api = FakeApi::with_runs(vec![with_var("v2"), with_var("v1")]);

    let hook = FakeHook::default();
    runner::run(&cfg, &api, &hook, &opts(&cfg), None).unwrap();

    assert_eq!(api.variable_calls.get(), 1);
    for msg in hook.sent.borrow().iter() {
        assert_eq!(msg.embeds[0].field_value("Platform"), Some("PC"));
    }
}

#[test]
fn abort_policy_keeps_runfile_untouched() {
    let runfile = tmp_runfile("abort");
    fs::write(&runfile, r#"["known"]"#).unwrap();
    let cfg = config(&runfile);
    let api = FakeApi::with_runs(vec![run("r2"), run("r1")]);

    let hook = FakeHook { fail_on_call: Some(1), ..Default::default() };
    let err = runner::run(&cfg, &api, &hook, &opts(&cfg), None).unwrap_err();

    assert!(matches!(err, Error::Webhook { status: 400, .. }));
    assert_eq!(hook.sent.borrow().len(), 1);
    assert_eq!(stored(&runfile), vec!["known"]);
}

#[test]
fn skip_policy_persists_only_delivered_runs() {
    let runfile = tmp_runfile("skip");
    let mut cfg = config(&runfile);
    cfg.on_failure = FailurePolicy::Skip;
    let api = FakeApi::with_runs(vec![run("r3"), run("r2"), run("r1")]);

    let hook = FakeHook { fail_on_call: Some(1), ..Default::default() };
    let mut rec = Recorder::default();
    let summary = runner::run(&cfg, &api, &hook, &opts(&cfg), Some(&mut rec)).unwrap();

    assert_eq!(summary.delivered, vec!["r1", "r3"]);
    assert_eq!(summary.failed, vec!["r2"]);
    assert_eq!(rec.failed, vec!["r2"]);
    assert_eq!(stored(&runfile), vec!["r1", "r3"]);
}

#[test]
fn keep_trims_oldest_ids() {
    let runfile = tmp_runfile("keep");
    fs::write(&runfile, r#"["a", "b", "c"]"#).unwrap();
    let mut cfg = config(&runfile);
    cfg.keep = Some(2);
    let api = FakeApi::with_runs(vec![run("d")]);

    runner::run(&cfg, &api, &FakeHook::default(), &opts(&cfg), None).unwrap();
    assert_eq!(stored(&runfile), vec!["c", "d"]);
}

#[test]
fn no_persist_leaves_runfile_alone() {
    let runfile = tmp_runfile("dry");
    fs::write(&runfile, "[]").unwrap();
    let cfg = config(&runfile);
    let api = FakeApi::with_runs(vec![run("r1")]);

    let mut o = opts(&cfg);
    o.persist = false;
    let summary = runner::run(&cfg, &api, &FakeHook::default(), &o, None).unwrap();
    assert_eq!(summary.delivered, vec!["r1"]);
    assert_eq!(fs::read_to_string(&runfile).unwrap(), "[]");
}

#[test]
fn tracked_realtime_is_not_posted() {
    let runfile = tmp_runfile("realtime");
    let cfg = config(&runfile);
    let json = run_json("rt1", "g1", "Alice", "{}").replace(
        r#""primary_t": 125, "realtime": null, "ingame_t": 125"#,
        r#""primary_t": 120, "realtime": "PT2M5S", "realtime_t": 125"#,
    );
    let api = FakeApi::with_runs(vec![serde_json::from_str(&json).unwrap()]);

    let hook = FakeHook::default();
    runner::run(&cfg, &api, &hook, &opts(&cfg), None).unwrap();

    let sent = hook.sent.borrow();
    let names: Vec<&str> = sent[0].embeds[0].fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Runner", "Category", "Time"]);
    assert_eq!(sent[0].embeds[0].field_value("Time"), Some("[0:02:00](https://www.speedrun.com/run/rt1)"));
}
