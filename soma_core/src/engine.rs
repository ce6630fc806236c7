//! Routine assembly.
//!
//! Ties the pieces together:
//! - Fetch the catalog and apply the hard-exclusion filter
//! - Pick a balanced, duration-bounded subset
//! - Scale volume by energy and attach applicable modifications
//! - Summarize duration, muscles and avoided movements

use crate::catalog::ExerciseCatalog;
use crate::constraints::build_constraints;
use crate::filter::{filter_exercises, LOW_ENERGY_THRESHOLD};
use crate::knowledge::{avoided_reason, excluded_movements};
use crate::selector::select_balanced;
use crate::state::PhysicalStateStore;
use crate::validate::RoutineRequest;
use crate::volume::adjust_for_energy;
use crate::{Exercise, GeneratedRoutine, PhysicalState, Result, RoutineConstraints, RoutineExercise};
use chrono::Utc;
use std::collections::HashSet;
use std::time::Instant;
use uuid::Uuid;

/// Seconds assumed per rep, also applied to timed holds
pub const SECONDS_PER_REP: u32 = 3;

/// Minutes added for warmup and cooldown
pub const WARMUP_COOLDOWN_MINUTES: u32 = 2;

/// Modification condition that applies when energy is low
pub const LOW_ENERGY_CONDITION: &str = "low_energy";

/// Generate a personalized workout routine
///
/// Reads the catalog once; a failed read is returned as-is and no partial
/// routine is produced. An empty selection is not an error.
pub fn generate_routine(
    state: Option<&PhysicalState>,
    constraints: &RoutineConstraints,
    catalog: &dyn ExerciseCatalog,
) -> Result<GeneratedRoutine> {
    let all_exercises = catalog.exercises()?;
    let eligible = filter_exercises(&all_exercises, constraints);
    let selected = select_balanced(&eligible, constraints);

    tracing::debug!(
        catalog = all_exercises.len(),
        eligible = eligible.len(),
        selected = selected.len(),
        "Selected exercises"
    );

    let exercises: Vec<RoutineExercise> = selected
        .iter()
        .map(|exercise| build_routine_exercise(exercise, constraints, state))
        .collect();

    let pain_points = state.map(|s| s.pain_points.as_slice()).unwrap_or_default();

    Ok(GeneratedRoutine {
        routine_id: new_routine_id(),
        estimated_duration: estimate_duration(&exercises),
        target_muscles: target_muscles(&selected),
        avoided_movements: excluded_movements(pain_points),
        avoided_reason: avoided_reason(pain_points),
        exercises,
        generated_at: Utc::now(),
    })
}

/// Validate a request, optionally load the user's state, and generate
pub fn generate_for_request(
    request: &RoutineRequest,
    states: &dyn PhysicalStateStore,
    catalog: &dyn ExerciseCatalog,
) -> Result<GeneratedRoutine> {
    let started = Instant::now();
    request.validate()?;

    tracing::info!(
        user_id = %request.user_id,
        duration = request.duration,
        goals = ?request.goals,
        "Generating routine"
    );

    let state = if request.use_current_state {
        let state = states.latest(&request.user_id)?;
        tracing::info!(
            user_id = %request.user_id,
            has_state = state.is_some(),
            pain_points = ?state.as_ref().map(|s| &s.pain_points),
            "Fetched physical state"
        );
        state
    } else {
        None
    };

    let constraints = build_constraints(state.as_ref(), request.duration, &request.goals);
    let routine = generate_routine(state.as_ref(), &constraints, catalog)?;

    tracing::info!(
        user_id = %request.user_id,
        routine_id = %routine.routine_id,
        exercise_count = routine.exercises.len(),
        estimated_duration = routine.estimated_duration,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Routine generated"
    );

    Ok(routine)
}

fn new_routine_id() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("routine-{}", &id[..8])
}

fn build_routine_exercise(
    exercise: &Exercise,
    constraints: &RoutineConstraints,
    state: Option<&PhysicalState>,
) -> RoutineExercise {
    let volume = adjust_for_energy(
        exercise.base_sets,
        exercise.base_reps,
        i32::from(constraints.energy_level),
    );

    RoutineExercise {
        exercise_id: exercise.exercise_id.clone(),
        name: exercise.name.clone(),
        sets: volume.sets,
        reps: volume.reps,
        rest_seconds: exercise.rest_seconds,
        modifications: applicable_modifications(exercise, state),
        safety_notes: exercise.safety_notes.clone(),
    }
}

/// Modifications that apply to the reported state
///
/// A pain condition matches when its text contains a reported pain point
/// token, e.g. `knees_left` matches `knees`.
fn applicable_modifications(exercise: &Exercise, state: Option<&PhysicalState>) -> Vec<String> {
    let Some(state) = state else {
        return Vec::new();
    };

    let mut modifications = Vec::new();
    for m in &exercise.modifications {
        if m.condition == LOW_ENERGY_CONDITION && state.energy_level <= LOW_ENERGY_THRESHOLD {
            modifications.push(m.modification.clone());
        }

        if state
            .pain_points
            .iter()
            .any(|p| m.condition.contains(p.as_str()))
        {
            modifications.push(m.modification.clone());
        }
    }
    modifications
}

/// Minutes for the whole routine, rounded, plus warmup and cooldown
fn estimate_duration(exercises: &[RoutineExercise]) -> u32 {
    let total_seconds: u64 = exercises
        .iter()
        .map(|e| {
            u64::from(e.sets) * (u64::from(e.reps) * u64::from(SECONDS_PER_REP) + u64::from(e.rest_seconds))
        })
        .sum();

    let minutes = (total_seconds + 30) / 60;
    u32::try_from(minutes)
        .unwrap_or(u32::MAX)
        .saturating_add(WARMUP_COOLDOWN_MINUTES)
}

/// Target muscles across the selection, first-seen order
fn target_muscles(exercises: &[Exercise]) -> Vec<String> {
    let mut seen = HashSet::new();
    exercises
        .iter()
        .flat_map(|e| e.target_muscles.iter())
        .filter(|m| seen.insert(m.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{build_default_catalog, Catalog};
    use crate::testing::annotated;
    use crate::validate::HistoryQuery;
    use crate::{
        ActivityMode, BodyPart, Equipment, Error, ExerciseCategory, ExerciseModification,
        Location, SourceEvent, WorkoutGoal,
    };

    fn state(pain_points: Vec<BodyPart>, energy: u8, equipment: Vec<Equipment>) -> PhysicalState {
        PhysicalState {
            user_id: "user-123".into(),
            timestamp: Utc::now(),
            pain_points,
            energy_level: energy,
            equipment,
            location: Location::Home,
            activity_mode: ActivityMode::Active,
            source_event: SourceEvent::Manual,
            confidence: None,
        }
    }

    struct FailingCatalog;

    impl ExerciseCatalog for FailingCatalog {
        fn exercises(&self) -> Result<Vec<Exercise>> {
            Err(Error::Catalog("store unavailable".into()))
        }
    }

    #[derive(Default)]
    struct FakeStates {
        latest: Option<PhysicalState>,
    }

    impl PhysicalStateStore for FakeStates {
        fn latest(&self, _user_id: &str) -> Result<Option<PhysicalState>> {
            Ok(self.latest.clone())
        }

        fn history(&self, _query: &HistoryQuery) -> Result<Vec<PhysicalState>> {
            Ok(self.latest.iter().cloned().collect())
        }

        fn save(&mut self, state: &PhysicalState) -> Result<()> {
            self.latest = Some(state.clone());
            Ok(())
        }
    }

    fn knee_scenario_catalog() -> Catalog {
        let mut squat = annotated("ex-001", ExerciseCategory::Strength, &["squat"], &["quadriceps", "glutes"]);
        squat.equipment_required = vec!["dumbbells".into()];
        squat.contraindicated_body_parts = vec!["knees".into()];

        let cat_cow = annotated("ex-007", ExerciseCategory::Mobility, &["stretch"], &["spine", "core"]);

        Catalog {
            exercises: vec![squat, cat_cow],
        }
    }

    #[test]
    fn test_knee_pain_scenario() {
        crate::logging::init_test();

        let state = state(vec![BodyPart::Knees], 2, vec![Equipment::Dumbbells]);
        let goals = [WorkoutGoal::Strength, WorkoutGoal::Mobility];
        let constraints = build_constraints(Some(&state), 15, &goals);

        let routine = generate_routine(Some(&state), &constraints, &knee_scenario_catalog()).unwrap();

        let ids: Vec<_> = routine.exercises.iter().map(|e| e.exercise_id.as_str()).collect();
        assert_eq!(ids, vec!["ex-007"]);
        assert!(routine.exercises.len() <= 3);
        assert!(routine.avoided_movements.contains(&"lunge".to_string()));
        assert_eq!(
            routine.avoided_reason.as_deref(),
            Some("User reported pain in: knees")
        );
        assert!(routine.routine_id.starts_with("routine-"));
        assert_eq!(routine.routine_id.len(), "routine-".len() + 8);
    }

    #[test]
    fn test_no_state_uses_defaults() {
        let constraints = build_constraints(None, 30, &[WorkoutGoal::Strength]);
        let routine = generate_routine(None, &constraints, &build_default_catalog()).unwrap();

        // bodyweight only: no dumbbell exercises
        assert!(routine.exercises.iter().all(|e| !["ex-001", "ex-003", "ex-004", "ex-005"]
            .contains(&e.exercise_id.as_str())));
        assert!(routine.avoided_movements.is_empty());
        assert!(routine.avoided_reason.is_none());
        assert!(routine.exercises.iter().all(|e| e.modifications.is_empty()));
    }

    #[test]
    fn test_volume_scaled_by_constraint_energy() {
        let state = state(vec![], 1, vec![Equipment::Dumbbells]);
        let constraints = build_constraints(Some(&state), 10, &[WorkoutGoal::Strength]);
        let routine = generate_routine(Some(&state), &constraints, &build_default_catalog()).unwrap();

        let squat = routine.exercises.iter().find(|e| e.exercise_id == "ex-001").unwrap();
        assert_eq!((squat.sets, squat.reps), (2, 9));
    }

    #[test]
    fn test_modifications_low_energy_and_pain() {
        let state = state(vec![BodyPart::Wrists], 2, vec![]);
        let constraints = build_constraints(None, 30, &[WorkoutGoal::Strength]);
        let catalog = build_default_catalog();
        let pushup = catalog.get("ex-002").unwrap();

        let mods = applicable_modifications(pushup, Some(&state));
        assert_eq!(mods, vec!["Perform on knees", "Use push-up handles or fists"]);

        let rested = PhysicalState { energy_level: 4, ..state.clone() };
        assert_eq!(
            applicable_modifications(pushup, Some(&rested)),
            vec!["Use push-up handles or fists"]
        );
        assert!(applicable_modifications(pushup, None).is_empty());

        // constraint energy does not matter, only the reported state does
        assert_eq!(constraints.energy_level, 3);
    }

    #[test]
    fn test_modification_condition_matched_by_containment() {
        let mut ex = annotated("lunge", ExerciseCategory::Strength, &["lunge"], &["quadriceps"]);
        ex.modifications = vec![ExerciseModification {
            condition: "knees_and_hips".into(),
            modification: "Shorten the stride".into(),
        }];

        let hips = state(vec![BodyPart::Hips], 3, vec![]);
        assert_eq!(applicable_modifications(&ex, Some(&hips)), vec!["Shorten the stride"]);

        let neck = state(vec![BodyPart::Neck], 3, vec![]);
        assert!(applicable_modifications(&ex, Some(&neck)).is_empty());
    }

    #[test]
    fn test_estimated_duration() {
        let exercises = vec![
            RoutineExercise {
                exercise_id: "a".into(),
                name: "A".into(),
                sets: 3,
                reps: 12,
                rest_seconds: 60,
                modifications: vec![],
                safety_notes: vec![],
            },
            RoutineExercise {
                exercise_id: "b".into(),
                name: "B".into(),
                sets: 2,
                reps: 10,
                rest_seconds: 30,
                modifications: vec![],
                safety_notes: vec![],
            },
        ];
        // 3*(36+60) + 2*(30+30) = 288 + 120 = 408s = 6.8 min -> 7, + 2
        assert_eq!(estimate_duration(&exercises), 9);
        assert_eq!(estimate_duration(&[]), WARMUP_COOLDOWN_MINUTES);
    }

    #[test]
    fn test_duration_rounds_half_up() {
        let exercise = RoutineExercise {
            exercise_id: "a".into(),
            name: "A".into(),
            sets: 1,
            reps: 0,
            rest_seconds: 90,
            modifications: vec![],
            safety_notes: vec![],
        };
        // 90s = 1.5 min -> 2
        assert_eq!(estimate_duration(&[exercise]), 4);
    }

    #[test]
    fn test_target_muscles_deduplicated() {
        let exercises = vec![
            annotated("a", ExerciseCategory::Strength, &["squat"], &["quadriceps", "glutes"]),
            annotated("b", ExerciseCategory::Strength, &["hinge"], &["glutes", "hamstrings"]),
        ];
        assert_eq!(target_muscles(&exercises), vec!["quadriceps", "glutes", "hamstrings"]);
    }

    #[test]
    fn test_empty_selection_is_not_an_error() {
        let state = state(BodyPart::ALL.to_vec(), 1, vec![]);
        let constraints = build_constraints(Some(&state), 30, &[WorkoutGoal::Cardio]);
        let routine = generate_routine(Some(&state), &constraints, &build_default_catalog()).unwrap();

        assert!(routine.is_empty());
        assert_eq!(routine.estimated_duration, WARMUP_COOLDOWN_MINUTES);
        assert!(routine.avoided_reason.is_some());
    }

    #[test]
    fn test_catalog_failure_propagates() {
        let constraints = build_constraints(None, 30, &[WorkoutGoal::Strength]);
        let err = generate_routine(None, &constraints, &FailingCatalog).unwrap_err();
        assert!(matches!(err, Error::Catalog(_)));
    }

    #[test]
    fn test_deterministic_given_same_inputs() {
        let state = state(vec![BodyPart::Shoulders], 4, vec![Equipment::Dumbbells, Equipment::YogaMat]);
        let goals = [WorkoutGoal::Strength, WorkoutGoal::Mobility, WorkoutGoal::Balance];
        let constraints = build_constraints(Some(&state), 45, &goals);
        let catalog = build_default_catalog();

        let first = generate_routine(Some(&state), &constraints, &catalog).unwrap();
        let second = generate_routine(Some(&state), &constraints, &catalog).unwrap();

        assert_eq!(first.exercises, second.exercises);
        assert_eq!(first.estimated_duration, second.estimated_duration);
        assert_eq!(first.target_muscles, second.target_muscles);
        assert_eq!(first.avoided_movements, second.avoided_movements);
        assert_ne!(first.routine_id, second.routine_id);
    }

    #[test]
    fn test_request_uses_state_only_when_asked() {
        let mut states = FakeStates::default();
        states
            .save(&state(vec![BodyPart::Knees], 3, vec![Equipment::Dumbbells]))
            .unwrap();
        let catalog = build_default_catalog();

        let with_state = RoutineRequest::parse("user-123", 30, &["strength"], true).unwrap();
        let routine = generate_for_request(&with_state, &states, &catalog).unwrap();
        assert!(!routine.avoided_movements.is_empty());
        assert!(routine.exercises.iter().all(|e| e.exercise_id != "ex-001"));

        let without = RoutineRequest::parse("user-123", 30, &["strength"], false).unwrap();
        let routine = generate_for_request(&without, &states, &catalog).unwrap();
        assert!(routine.avoided_movements.is_empty());
        assert!(routine.avoided_reason.is_none());
    }

    #[test]
    fn test_request_validation_runs_first() {
        let request = RoutineRequest {
            user_id: "user-123".into(),
            duration: 500,
            goals: vec![WorkoutGoal::Cardio],
            use_current_state: false,
        };
        let err = generate_for_request(&request, &FakeStates::default(), &FailingCatalog).unwrap_err();
        assert!(err.is_validation());
    }
}
