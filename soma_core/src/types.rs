//! Core domain types for the Soma routine generator.
//!
//! This module defines the fundamental types used throughout the system:
//! - Body parts, equipment and the other user-reported vocabularies
//! - Physical state snapshots
//! - Exercises and their catalog annotations
//! - Derived constraints and generated routines

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Implements `as_str`, `Display` and `FromStr` for a token enum.
///
/// The token strings must match the serde `snake_case` names.
macro_rules! token_enum {
    ($ty:ident, $label:literal, { $($variant:ident => $token:literal),+ $(,)? }) => {
        impl $ty {
            /// All variants in declaration order
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// The wire token for this variant
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $token),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($token => Ok($ty::$variant),)+
                    other => Err(Error::Validation(format!(
                        "Invalid {}: {}. Must be one of: {}",
                        $label,
                        other,
                        [$($token),+].join(", ")
                    ))),
                }
            }
        }
    };
}

// ============================================================================
// User-reported vocabularies
// ============================================================================

/// A body region the user can report pain in
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    LowerBack,
    UpperBack,
    Knees,
    Shoulders,
    Neck,
    Hips,
    Ankles,
    Wrists,
    Elbows,
}

token_enum!(BodyPart, "body part", {
    LowerBack => "lower_back",
    UpperBack => "upper_back",
    Knees => "knees",
    Shoulders => "shoulders",
    Neck => "neck",
    Hips => "hips",
    Ankles => "ankles",
    Wrists => "wrists",
    Elbows => "elbows",
});

/// Equipment a user can report as available
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    None,
    Dumbbells,
    ResistanceBands,
    YogaMat,
    PullUpBar,
    Kettlebell,
    Barbell,
    Bench,
    FoamRoller,
}

token_enum!(Equipment, "equipment", {
    None => "none",
    Dumbbells => "dumbbells",
    ResistanceBands => "resistance_bands",
    YogaMat => "yoga_mat",
    PullUpBar => "pull_up_bar",
    Kettlebell => "kettlebell",
    Barbell => "barbell",
    Bench => "bench",
    FoamRoller => "foam_roller",
});

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Home,
    Gym,
    Office,
    Outdoor,
}

token_enum!(Location, "location", {
    Home => "home",
    Gym => "gym",
    Office => "office",
    Outdoor => "outdoor",
});

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityMode {
    Sedentary,
    Active,
}

token_enum!(ActivityMode, "activity mode", {
    Sedentary => "sedentary",
    Active => "active",
});

/// How a state snapshot was reported
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceEvent {
    Voice,
    Manual,
    Inferred,
}

token_enum!(SourceEvent, "source event", {
    Voice => "voice",
    Manual => "manual",
    Inferred => "inferred",
});

// ============================================================================
// Goals and exercise classification
// ============================================================================

/// Category an exercise belongs to
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseCategory {
    Strength,
    Mobility,
    Cardio,
    Flexibility,
    Balance,
}

token_enum!(ExerciseCategory, "category", {
    Strength => "strength",
    Mobility => "mobility",
    Cardio => "cardio",
    Flexibility => "flexibility",
    Balance => "balance",
});

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

token_enum!(Difficulty, "difficulty", {
    Beginner => "beginner",
    Intermediate => "intermediate",
    Advanced => "advanced",
});

/// A training goal requested for a routine
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutGoal {
    Strength,
    Mobility,
    Cardio,
    Flexibility,
    Balance,
    Endurance,
}

token_enum!(WorkoutGoal, "goal", {
    Strength => "strength",
    Mobility => "mobility",
    Cardio => "cardio",
    Flexibility => "flexibility",
    Balance => "balance",
    Endurance => "endurance",
});

impl WorkoutGoal {
    /// Exercise categories that satisfy this goal
    pub fn categories(&self) -> &'static [ExerciseCategory] {
        use ExerciseCategory as C;
        match self {
            WorkoutGoal::Strength => &[C::Strength],
            WorkoutGoal::Mobility => &[C::Mobility, C::Flexibility],
            WorkoutGoal::Cardio => &[C::Cardio],
            WorkoutGoal::Flexibility => &[C::Flexibility, C::Mobility],
            WorkoutGoal::Balance => &[C::Balance, C::Mobility],
            WorkoutGoal::Endurance => &[C::Cardio, C::Strength],
        }
    }

    /// Whether an exercise of `category` serves this goal
    pub fn accepts(&self, category: ExerciseCategory) -> bool {
        self.categories().contains(&category)
    }
}

/// Union of the categories accepted by any of `goals`
pub fn accepted_categories(goals: &[WorkoutGoal]) -> BTreeSet<ExerciseCategory> {
    goals
        .iter()
        .flat_map(|g| g.categories().iter().copied())
        .collect()
}

// ============================================================================
// Physical state
// ============================================================================

/// A user's self-reported snapshot of pain, energy, equipment and location
///
/// Snapshots are immutable: every update produces a new record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PhysicalState {
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub pain_points: Vec<BodyPart>,
    pub energy_level: u8,
    pub equipment: Vec<Equipment>,
    pub location: Location,
    pub activity_mode: ActivityMode,
    pub source_event: SourceEvent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

// ============================================================================
// Exercises
// ============================================================================

/// A conditional adjustment attached to a catalog exercise
///
/// `condition` is either `"low_energy"` or a token that is matched against
/// reported pain points by containment.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExerciseModification {
    pub condition: String,
    pub modification: String,
}

/// A catalog entry
///
/// `base_reps` holds seconds for timed holds; the data does not distinguish.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Exercise {
    pub exercise_id: String,
    pub name: String,
    pub category: ExerciseCategory,
    pub target_muscles: Vec<String>,
    pub movement_patterns: Vec<String>,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub equipment_required: Vec<String>,
    #[serde(default)]
    pub contraindicated_body_parts: Vec<String>,
    pub base_sets: u32,
    pub base_reps: u32,
    pub rest_seconds: u32,
    #[serde(default)]
    pub safety_notes: Vec<String>,
    #[serde(default)]
    pub modifications: Vec<ExerciseModification>,
}

// ============================================================================
// Constraints and routines
// ============================================================================

/// Hard limits derived from a physical state for one routine request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoutineConstraints {
    pub excluded_body_parts: BTreeSet<String>,
    pub available_equipment: BTreeSet<String>,
    pub max_duration: u32,
    pub energy_level: u8,
    pub goals: Vec<WorkoutGoal>,
}

/// One prescribed exercise within a routine
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoutineExercise {
    pub exercise_id: String,
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    pub rest_seconds: u32,
    pub modifications: Vec<String>,
    pub safety_notes: Vec<String>,
}

/// The routine handed back to the caller
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GeneratedRoutine {
    pub routine_id: String,
    pub exercises: Vec<RoutineExercise>,
    /// Minutes, including warmup and cooldown
    pub estimated_duration: u32,
    pub target_muscles: Vec<String>,
    pub avoided_movements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avoided_reason: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl GeneratedRoutine {
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}
