//! Shared fixtures for unit tests.

use crate::{Difficulty, Exercise, ExerciseCategory};

/// A bodyweight beginner exercise with no annotations
pub fn exercise(id: &str, category: ExerciseCategory) -> Exercise {
    Exercise {
        exercise_id: id.into(),
        name: id.to_uppercase(),
        category,
        target_muscles: vec![],
        movement_patterns: vec![],
        difficulty: Difficulty::Beginner,
        equipment_required: vec![],
        contraindicated_body_parts: vec![],
        base_sets: 3,
        base_reps: 10,
        rest_seconds: 30,
        safety_notes: vec![],
        modifications: vec![],
    }
}

/// Like [`exercise`] but with movement patterns and target muscles
pub fn annotated(id: &str, category: ExerciseCategory, patterns: &[&str], muscles: &[&str]) -> Exercise {
    Exercise {
        movement_patterns: patterns.iter().map(|s| s.to_string()).collect(),
        target_muscles: muscles.iter().map(|s| s.to_string()).collect(),
        ..exercise(id, category)
    }
}
