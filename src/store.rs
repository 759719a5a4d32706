// src/store.rs
//! The run file: a JSON array of run ids that have already been posted.
//!
//! Read once at start, rewritten once at the end. Appends never introduce
//! duplicates and keep first-seen order. Not safe against two processes
//! sharing the same file.

use std::{collections::HashSet, fs, io, path::{Path, PathBuf}};

use tracing::{debug, warn};

use crate::api::types::Run;
use crate::error::{Error, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunStore {
    ids: Vec<String>,
    seen: HashSet<String>,
}

impl RunStore {
    pub fn new() -> Self { Self::default() }

    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut store = Self::new();
        store.extend(ids);
        store
    }

    /// A missing or empty file is an empty store. Content that is not a JSON
    /// list of strings (bad UTF-8 included) is logged and treated as empty.
    /// Other I/O errors fail.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = match fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No run file yet");
                return Ok(Self::new());
            }
            Err(source) => return Err(Error::StoreRead { path: path.to_path_buf(), source }),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::new());
        }

        match serde_json::from_slice::<Vec<String>>(&bytes) {
            Ok(ids) => Ok(Self::from_ids(ids)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Run file is not a list of ids; starting empty");
                Ok(Self::new())
            }
        }
    }

    /// Write the whole list, replacing the file through a sibling temp file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let write_err = |source: io::Error| Error::StoreWrite { path: path.to_path_buf(), source };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        let json = serde_json::to_string(&self.ids)
            .map_err(|source| Error::Encode { what: "run file", source })?;
        let tmp = temp_path(path);
        fs::write(&tmp, json).map_err(write_err)?;
        fs::rename(&tmp, path).map_err(write_err)?;
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Append ids not already present.
    pub fn extend<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in ids {
            let id = id.into();
            if self.seen.insert(id.clone()) {
                self.ids.push(id);
            }
        }
    }

    /// Drop the oldest ids so that at most `keep` remain.
    pub fn retain_recent(&mut self, keep: usize) {
        if self.ids.len() <= keep {
            return;
        }
        let dropped: Vec<String> = self.ids.drain(..self.ids.len() - keep).collect();
        for id in &dropped {
            self.seen.remove(id);
        }
    }

    pub fn ids(&self) -> &[String] { &self.ids }
    pub fn len(&self) -> usize { self.ids.len() }
    pub fn is_empty(&self) -> bool { self.ids.is_empty() }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Runs whose id is not in the store, in their original order.
pub fn dedup(runs: Vec<Run>, store: &RunStore) -> Vec<Run> {
    runs.into_iter().filter(|r| !store.contains(&r.id)).collect()
}
