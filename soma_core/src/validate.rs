//! Boundary validation for requests and stored records.
//!
//! Everything that arrives from outside (CLI arguments, state files) passes
//! through here before the routine engine sees it. The engine itself assumes
//! validated input.

use crate::{
    ActivityMode, BodyPart, Equipment, Error, Location, PhysicalState, Result, SourceEvent,
    WorkoutGoal,
};
use chrono::{DateTime, Utc};

pub const MIN_DURATION_MINUTES: u32 = 5;
pub const MAX_DURATION_MINUTES: u32 = 120;
pub const DEFAULT_HISTORY_LIMIT: usize = 50;
pub const MAX_HISTORY_LIMIT: usize = 100;

/// A request to generate a routine
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoutineRequest {
    pub user_id: String,
    /// Minutes
    pub duration: u32,
    pub goals: Vec<WorkoutGoal>,
    /// Whether to look up the user's latest physical state at all
    pub use_current_state: bool,
}

impl RoutineRequest {
    /// Build a request from raw goal tokens, rejecting unknown goals
    pub fn parse<S: AsRef<str>>(
        user_id: impl Into<String>,
        duration: u32,
        goals: &[S],
        use_current_state: bool,
    ) -> Result<Self> {
        let goals = goals
            .iter()
            .map(|g| g.as_ref().parse::<WorkoutGoal>())
            .collect::<Result<Vec<_>>>()?;

        let request = Self {
            user_id: user_id.into(),
            duration,
            goals,
            use_current_state,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(Error::Validation("userId is required".into()));
        }
        if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&self.duration) {
            return Err(Error::Validation(format!(
                "duration must be between {} and {} minutes",
                MIN_DURATION_MINUTES, MAX_DURATION_MINUTES
            )));
        }
        if self.goals.is_empty() {
            return Err(Error::Validation("goals must be a non-empty list".into()));
        }
        Ok(())
    }
}

/// A user's report of their current physical state
#[derive(Clone, Debug, PartialEq)]
pub struct StateUpdate {
    pub pain_points: Vec<BodyPart>,
    pub energy_level: u8,
    pub equipment: Vec<Equipment>,
    pub location: Location,
    pub activity_mode: ActivityMode,
    pub source_event: SourceEvent,
    pub confidence: Option<f32>,
}

impl StateUpdate {
    pub fn validate(&self) -> Result<()> {
        validate_energy(self.energy_level)?;
        validate_confidence(self.confidence)
    }

    /// Validate and stamp the update as a new snapshot
    pub fn into_state(self, user_id: impl Into<String>, now: DateTime<Utc>) -> Result<PhysicalState> {
        self.validate()?;
        let state = PhysicalState {
            user_id: user_id.into(),
            timestamp: now,
            pain_points: self.pain_points,
            energy_level: self.energy_level,
            equipment: self.equipment,
            location: self.location,
            activity_mode: self.activity_mode,
            source_event: self.source_event,
            confidence: self.confidence,
        };
        validate_state(&state)?;
        Ok(state)
    }
}

/// Check a decoded state record before it is used
pub fn validate_state(state: &PhysicalState) -> Result<()> {
    if state.user_id.trim().is_empty() {
        return Err(Error::Validation("userId is required".into()));
    }
    validate_energy(state.energy_level)?;
    validate_confidence(state.confidence)
}

fn validate_energy(level: u8) -> Result<()> {
    if !(1..=5).contains(&level) {
        return Err(Error::Validation(
            "energyLevel must be 1, 2, 3, 4, or 5".into(),
        ));
    }
    Ok(())
}

fn validate_confidence(confidence: Option<f32>) -> Result<()> {
    match confidence {
        Some(c) if !(0.0..=1.0).contains(&c) => Err(Error::Validation(
            "confidence must be a number between 0 and 1".into(),
        )),
        _ => Ok(()),
    }
}

/// Query over a user's past state snapshots
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    pub user_id: String,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl HistoryQuery {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(limit) = self.limit {
            if !(1..=MAX_HISTORY_LIMIT).contains(&limit) {
                return Err(Error::Validation(format!(
                    "limit must be between 1 and {}",
                    MAX_HISTORY_LIMIT
                )));
            }
        }
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(Error::Validation(
                    "fromTimestamp must be less than toTimestamp".into(),
                ));
            }
        }
        Ok(())
    }

    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_HISTORY_LIMIT)
    }

    /// Whether a snapshot taken at `at` falls inside the window
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| at >= from) && self.to.map_or(true, |to| at <= to)
    }
}
