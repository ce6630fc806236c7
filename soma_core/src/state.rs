//! Physical state storage.
//!
//! Snapshots are appended to a JSON Lines file with file locking, never
//! rewritten. The newest snapshot for a user is their current state.

use crate::validate::{validate_state, HistoryQuery};
use crate::{Error, PhysicalState, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Store of physical state snapshots keyed by user
pub trait PhysicalStateStore {
    /// Most recent snapshot for the user, if any
    fn latest(&self, user_id: &str) -> Result<Option<PhysicalState>>;

    /// Snapshots matching the query, newest first
    fn history(&self, query: &HistoryQuery) -> Result<Vec<PhysicalState>>;

    /// Record a new snapshot
    fn save(&mut self, state: &PhysicalState) -> Result<()>;
}

/// JSONL-based state store with file locking
pub struct JsonlStateStore {
    path: PathBuf,
}

impl JsonlStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every snapshot for `user_id`, newest first
    fn read_user(&self, user_id: &str) -> Result<Vec<PhysicalState>> {
        let mut states: Vec<_> = read_states(&self.path)?
            .into_iter()
            .filter(|s| s.user_id == user_id)
            .collect();
        // Later writes win timestamp ties
        states.reverse();
        states.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(states)
    }
}

impl PhysicalStateStore for JsonlStateStore {
    fn latest(&self, user_id: &str) -> Result<Option<PhysicalState>> {
        let latest = self.read_user(user_id)?.into_iter().next();
        tracing::debug!(user_id, found = latest.is_some(), "Looked up latest state");
        Ok(latest)
    }

    fn history(&self, query: &HistoryQuery) -> Result<Vec<PhysicalState>> {
        query.validate()?;
        Ok(self
            .read_user(&query.user_id)?
            .into_iter()
            .filter(|s| query.contains(s.timestamp))
            .take(query.effective_limit())
            .collect())
    }

    fn save(&mut self, state: &PhysicalState) -> Result<()> {
        validate_state(state)?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(state)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.sync_all()?;
        file.unlock()?;

        tracing::debug!("Appended state for {} to {:?}", state.user_id, self.path);
        Ok(())
    }
}

/// Read all snapshots from a state file
///
/// A missing file is an empty store. Any malformed or invalid record fails
/// the read rather than being skipped, so a stale state is never served in
/// place of a corrupted newer one.
pub fn read_states(path: &Path) -> Result<Vec<PhysicalState>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let result = parse_lines(BufReader::new(&file), path);

    file.unlock()?;
    let states = result?;
    tracing::debug!("Read {} state records from {:?}", states.len(), path);
    Ok(states)
}

fn parse_lines(reader: impl BufRead, path: &Path) -> Result<Vec<PhysicalState>> {
    let mut states = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        let state: PhysicalState = serde_json::from_str(&line).map_err(|e| {
            Error::State(format!(
                "Malformed state record at {:?} line {}: {}",
                path,
                line_num + 1,
                e
            ))
        })?;
        validate_state(&state).map_err(|e| {
            Error::State(format!(
                "Invalid state record at {:?} line {}: {}",
                path,
                line_num + 1,
                e
            ))
        })?;
        states.push(state);
    }

    Ok(states)
}
