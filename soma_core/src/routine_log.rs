//! Log of generated routines.
//!
//! Routines are appended to a JSONL (JSON Lines) file with file locking so
//! concurrent `soma generate` runs do not interleave records.

use crate::{GeneratedRoutine, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Destination for generated routines
pub trait RoutineSink {
    fn append(&mut self, routine: &GeneratedRoutine) -> Result<()>;
}

/// JSONL-based routine sink with file locking
pub struct JsonlRoutineSink {
    path: PathBuf,
}

impl JsonlRoutineSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl RoutineSink for JsonlRoutineSink {
    fn append(&mut self, routine: &GeneratedRoutine) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(routine)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!("Appended routine {} to log", routine.routine_id);
        Ok(())
    }
}

/// Read all routines from a log file, oldest first
///
/// Unreadable lines are skipped with a warning; the log is a history view,
/// not an input to routine generation.
pub fn read_routines(path: &Path) -> Result<Vec<GeneratedRoutine>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut routines = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<GeneratedRoutine>(&line) {
            Ok(routine) => routines.push(routine),
            Err(e) => {
                tracing::warn!("Failed to parse routine at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} routines from log", routines.len());
    Ok(routines)
}
