// src/api/types.rs
//! Typed records for the parts of the speedrun.com v1 API we consume.
//!
//! Every response comes wrapped as `{"data": …}`; embedded references on a run
//! (`game`, `category`, `level`, `players`) are wrapped the same way. Unknown
//! fields are ignored, missing required ones fail the whole response with a
//! parse error naming the field.

use std::collections::{BTreeMap, HashMap};

use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Embedded<T> {
    pub data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Run {
    pub id: String,
    pub weblink: String,
    pub game: Embedded<Game>,
    pub category: Embedded<Category>,
    #[serde(default, deserialize_with = "embedded_level")]
    pub level: Option<Level>,
    pub players: Embedded<Vec<Player>>,
    /// variable id → value id
    #[serde(default)]
    pub values: BTreeMap<String, String>,
    pub times: Times,
    #[serde(default)]
    pub submitted: Option<String>,
}

impl Run {
    pub fn game(&self) -> &Game { &self.game.data }
    pub fn category(&self) -> &Category { &self.category.data }
    pub fn players(&self) -> &[Player] { &self.players.data }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Names {
    pub international: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
    pub uri: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Game {
    pub id: String,
    pub names: Names,
    /// Keyed by asset kind (`cover-small`, `icon`, …). Unset assets come back as null.
    #[serde(default)]
    pub assets: HashMap<String, Option<Asset>>,
}

impl Game {
    pub fn name(&self) -> &str { &self.names.international }

    pub fn asset_uri(&self, kind: &str) -> Option<&str> {
        self.assets.get(kind)?.as_ref().map(|a| a.uri.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub weblink: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Level {
    pub id: String,
    pub name: String,
}

/// A registered user (`names`) or a guest (`name` only).
#[derive(Debug, Clone, Deserialize)]
pub struct Player {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub names: Option<Names>,
    #[serde(default)]
    pub name: Option<String>,
}

impl Player {
    pub fn display_name(&self) -> &str {
        self.names
            .as_ref()
            .map(|n| n.international.as_str())
            .or(self.name.as_deref())
            .unwrap_or("Unknown")
    }
}

/// Seconds plus the ISO-8601 strings the API reports alongside them.
/// Untracked secondary times come back as `null` string and `0` (or null) seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct Times {
    #[serde(default)]
    pub primary: Option<String>,
    pub primary_t: f64,
    #[serde(default)]
    pub realtime: Option<String>,
    #[serde(default)]
    pub realtime_t: Option<f64>,
    #[serde(default)]
    pub ingame: Option<String>,
    #[serde(default)]
    pub ingame_t: Option<f64>,
}

impl Times {
    pub fn realtime_secs(&self) -> Option<f64> {
        tracked(&self.realtime, self.realtime_t)
    }

    pub fn ingame_secs(&self) -> Option<f64> {
        tracked(&self.ingame, self.ingame_t)
    }
}

fn tracked(iso: &Option<String>, secs: Option<f64>) -> Option<f64> {
    secs.filter(|t| iso.is_some() || *t > 0.0)
}

#[derive(Debug, Clone, Deserialize)]
pub struct Variable {
    pub id: String,
    pub name: String,
    pub values: VariableValues,
}

impl Variable {
    pub fn label(&self, value_id: &str) -> Option<&str> {
        self.values.values.get(value_id).map(|v| v.label.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VariableValues {
    #[serde(default)]
    pub values: BTreeMap<String, VariableValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VariableValue {
    pub label: String,
}

/// `level` shows up as null, `{"data": null}`, `{"data": []}` or `{"data": {…}}`.
/// Only the last one is a level.
fn embedded_level<'de, D>(de: D) -> Result<Option<Level>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(de)?;
    let data = match raw {
        Some(Value::Object(mut map)) => map.remove("data"),
        _ => None,
    };
    match data {
        Some(v @ Value::Object(_)) => serde_json::from_value(v).map(Some).map_err(de::Error::custom),
        _ => Ok(None),
    }
}
