//! Hard-exclusion filter over the exercise catalog.

use crate::{accepted_categories, Difficulty, Equipment, Exercise, RoutineConstraints};

/// Energy level at or below which advanced exercises are dropped
pub const LOW_ENERGY_THRESHOLD: u8 = 2;

/// Filter exercises based on constraints
///
/// Returns the eligible exercises in catalog order. An exercise is dropped
/// when it is contraindicated for an excluded tag, needs equipment that is
/// not available, serves none of the goals, or is advanced while energy is
/// low.
pub fn filter_exercises(exercises: &[Exercise], constraints: &RoutineConstraints) -> Vec<Exercise> {
    let categories = accepted_categories(&constraints.goals);

    exercises
        .iter()
        .filter(|exercise| {
            let contraindicated = exercise
                .contraindicated_body_parts
                .iter()
                .any(|part| constraints.excluded_body_parts.contains(part));
            if contraindicated {
                tracing::trace!("{} excluded: contraindicated", exercise.exercise_id);
                return false;
            }

            if !has_required_equipment(exercise, constraints) {
                tracing::trace!("{} excluded: missing equipment", exercise.exercise_id);
                return false;
            }

            if !categories.contains(&exercise.category) {
                return false;
            }

            if constraints.energy_level <= LOW_ENERGY_THRESHOLD
                && exercise.difficulty == Difficulty::Advanced
            {
                tracing::trace!("{} excluded: too hard for energy", exercise.exercise_id);
                return false;
            }

            true
        })
        .cloned()
        .collect()
}

fn has_required_equipment(exercise: &Exercise, constraints: &RoutineConstraints) -> bool {
    exercise.equipment_required.iter().all(|item| {
        item == Equipment::None.as_str() || constraints.available_equipment.contains(item)
    })
}
