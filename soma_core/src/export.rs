//! CSV export of the routine log.
//!
//! One row per prescribed exercise. The CSV is written to a temp file in
//! the target directory and renamed into place, so a crash never leaves a
//! half-written export behind.

use crate::{Error, GeneratedRoutine, Result};
use std::path::Path;
use tempfile::NamedTempFile;

/// A row in the CSV output
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct CsvRow {
    routine_id: String,
    generated_at: String,
    exercise_id: String,
    name: String,
    sets: u32,
    reps: u32,
    rest_seconds: u32,
    estimated_duration: u32,
}

const HEADER: [&str; 8] = [
    "routine_id",
    "generated_at",
    "exercise_id",
    "name",
    "sets",
    "reps",
    "rest_seconds",
    "estimated_duration",
];

fn rows(routine: &GeneratedRoutine) -> impl Iterator<Item = CsvRow> + '_ {
    routine.exercises.iter().map(move |e| CsvRow {
        routine_id: routine.routine_id.clone(),
        generated_at: routine.generated_at.to_rfc3339(),
        exercise_id: e.exercise_id.clone(),
        name: e.name.clone(),
        sets: e.sets,
        reps: e.reps,
        rest_seconds: e.rest_seconds,
        estimated_duration: routine.estimated_duration,
    })
}

/// Export every logged routine to CSV, replacing `csv_path`
///
/// Returns the number of routines exported. Routines with no exercises
/// produce no rows.
pub fn export_routines_csv(log_path: &Path, csv_path: &Path) -> Result<usize> {
    let routines = crate::routine_log::read_routines(log_path)?;

    let parent = match csv_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(temp.as_file());
        writer.write_record(HEADER)?;

        for routine in &routines {
            for row in rows(routine) {
                writer.serialize(row)?;
            }
        }
        writer.flush()?;
    }
    temp.as_file().sync_all()?;

    temp.persist(csv_path).map_err(|e| Error::Io(e.error))?;

    tracing::info!("Exported {} routines to {:?}", routines.len(), csv_path);
    Ok(routines.len())
}
