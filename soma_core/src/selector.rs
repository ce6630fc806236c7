//! Balanced exercise selection.
//!
//! Picks a bounded subset of the eligible exercises, ranked by goal
//! relevance, while favouring new movement patterns and muscles once a
//! minimum routine size is reached.

use crate::{Exercise, RoutineConstraints, WorkoutGoal};
use std::cmp::Reverse;
use std::collections::HashSet;

/// Rough minutes spent per exercise when sizing a routine
pub const MINUTES_PER_EXERCISE: u32 = 5;

/// Absolute cap on routine length
pub const MAX_EXERCISES: usize = 8;

/// Exercises accepted unconditionally before variety is required
pub const MIN_UNCONDITIONAL: usize = 3;

/// Number of exercises a routine of `max_duration` minutes aims for
pub fn target_count(max_duration: u32) -> usize {
    usize::try_from(max_duration / MINUTES_PER_EXERCISE)
        .unwrap_or(MAX_EXERCISES)
        .min(MAX_EXERCISES)
}

/// Relevance of an exercise: 2 points per goal its category serves
pub fn goal_score(exercise: &Exercise, goals: &[WorkoutGoal]) -> u32 {
    goals
        .iter()
        .filter(|goal| goal.accepts(exercise.category))
        .map(|_| 2)
        .sum()
}

/// Select exercises for a balanced routine
///
/// Single pass over the exercises sorted by descending score (ties keep
/// input order). The first few are always taken; after that an exercise
/// must add a movement pattern or target muscle not yet covered.
pub fn select_balanced(exercises: &[Exercise], constraints: &RoutineConstraints) -> Vec<Exercise> {
    let target = target_count(constraints.max_duration);

    let mut ranked: Vec<(u32, &Exercise)> = exercises
        .iter()
        .map(|e| (goal_score(e, &constraints.goals), e))
        .collect();
    ranked.sort_by_key(|(score, _)| Reverse(*score));

    let mut selected: Vec<Exercise> = Vec::with_capacity(target);
    let mut used_patterns: HashSet<&str> = HashSet::new();
    let mut used_muscles: HashSet<&str> = HashSet::new();

    for (_, exercise) in ranked {
        if selected.len() >= target {
            break;
        }

        let has_new_pattern = exercise
            .movement_patterns
            .iter()
            .any(|p| !used_patterns.contains(p.as_str()));
        let has_new_muscle = exercise
            .target_muscles
            .iter()
            .any(|m| !used_muscles.contains(m.as_str()));

        if selected.len() < MIN_UNCONDITIONAL || has_new_pattern || has_new_muscle {
            used_patterns.extend(exercise.movement_patterns.iter().map(String::as_str));
            used_muscles.extend(exercise.target_muscles.iter().map(String::as_str));
            selected.push(exercise.clone());
        } else {
            tracing::debug!("Skipping {}: adds no variety", exercise.exercise_id);
        }
    }

    selected
}
