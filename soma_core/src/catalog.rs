//! Exercise catalog access.
//!
//! The routine engine reads the catalog through [`ExerciseCatalog`], so the
//! built-in catalog, a JSON file, or a test fake can be injected.

use crate::types::*;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Read access to the full exercise catalog
pub trait ExerciseCatalog {
    /// Fetch every exercise. Failures are fatal for the current request.
    fn exercises(&self) -> Result<Vec<Exercise>>;
}

/// An in-memory catalog
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub exercises: Vec<Exercise>,
}

impl ExerciseCatalog for Catalog {
    fn exercises(&self) -> Result<Vec<Exercise>> {
        Ok(self.exercises.clone())
    }
}

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn modification(condition: &str, text: &str) -> ExerciseModification {
    ExerciseModification {
        condition: condition.into(),
        modification: text.into(),
    }
}

/// Builds the built-in exercise catalog
///
/// Prefer [`get_default_catalog`] outside tests.
pub fn build_default_catalog() -> Catalog {
    use Difficulty::*;
    use ExerciseCategory::*;

    let exercises = vec![
        // ====================================================================
        // Strength
        // ====================================================================
        Exercise {
            exercise_id: "ex-001".into(),
            name: "Goblet Squat".into(),
            category: Strength,
            target_muscles: strings(&["quadriceps", "glutes", "core"]),
            movement_patterns: strings(&["squat"]),
            difficulty: Beginner,
            equipment_required: strings(&["dumbbells"]),
            contraindicated_body_parts: strings(&["knees", "hips"]),
            base_sets: 3,
            base_reps: 12,
            rest_seconds: 60,
            safety_notes: strings(&["Keep core engaged", "Knees track over toes"]),
            modifications: vec![
                modification("low_energy", "Use lighter weight or bodyweight only"),
                modification("knees", "Reduce depth of squat"),
            ],
        },
        Exercise {
            exercise_id: "ex-002".into(),
            name: "Push-up".into(),
            category: Strength,
            target_muscles: strings(&["chest", "triceps", "shoulders", "core"]),
            movement_patterns: strings(&["push"]),
            difficulty: Beginner,
            equipment_required: vec![],
            contraindicated_body_parts: strings(&["wrists", "shoulders"]),
            base_sets: 3,
            base_reps: 10,
            rest_seconds: 45,
            safety_notes: strings(&["Maintain straight body line", "Elbows at 45 degrees"]),
            modifications: vec![
                modification("low_energy", "Perform on knees"),
                modification("wrists", "Use push-up handles or fists"),
            ],
        },
        Exercise {
            exercise_id: "ex-003".into(),
            name: "Dumbbell Row".into(),
            category: Strength,
            target_muscles: strings(&["lats", "rhomboids", "biceps"]),
            movement_patterns: strings(&["pull"]),
            difficulty: Beginner,
            equipment_required: strings(&["dumbbells"]),
            contraindicated_body_parts: strings(&["lower_back", "shoulders"]),
            base_sets: 3,
            base_reps: 10,
            rest_seconds: 60,
            safety_notes: strings(&["Keep back flat", "Pull elbow to hip"]),
            modifications: vec![modification("lower_back", "Support chest on incline bench")],
        },
        Exercise {
            exercise_id: "ex-004".into(),
            name: "Dumbbell Shoulder Press".into(),
            category: Strength,
            target_muscles: strings(&["shoulders", "triceps"]),
            movement_patterns: strings(&["push"]),
            difficulty: Intermediate,
            equipment_required: strings(&["dumbbells"]),
            contraindicated_body_parts: strings(&["shoulders", "neck"]),
            base_sets: 3,
            base_reps: 10,
            rest_seconds: 60,
            safety_notes: strings(&["Keep core tight", "Dont arch back"]),
            modifications: vec![modification("shoulders", "Use lighter weight with neutral grip")],
        },
        Exercise {
            exercise_id: "ex-005".into(),
            name: "Romanian Deadlift".into(),
            category: Strength,
            target_muscles: strings(&["hamstrings", "glutes", "lower_back"]),
            movement_patterns: strings(&["hinge"]),
            difficulty: Intermediate,
            equipment_required: strings(&["dumbbells"]),
            contraindicated_body_parts: strings(&["lower_back", "hamstrings"]),
            base_sets: 3,
            base_reps: 10,
            rest_seconds: 90,
            safety_notes: strings(&["Keep back neutral", "Slight knee bend"]),
            modifications: vec![modification("lower_back", "Reduce range of motion")],
        },
        Exercise {
            exercise_id: "ex-006".into(),
            name: "Plank".into(),
            category: Strength,
            target_muscles: strings(&["core", "shoulders"]),
            movement_patterns: strings(&["plank"]),
            difficulty: Beginner,
            equipment_required: vec![],
            contraindicated_body_parts: strings(&["wrists", "shoulders", "lower_back"]),
            base_sets: 3,
            // seconds
            base_reps: 30,
            rest_seconds: 30,
            safety_notes: strings(&["Keep body in straight line", "Dont let hips sag"]),
            modifications: vec![
                modification("wrists", "Perform on forearms"),
                modification("lower_back", "Elevate hands on bench"),
            ],
        },
        // ====================================================================
        // Mobility
        // ====================================================================
        Exercise {
            exercise_id: "ex-007".into(),
            name: "Cat-Cow Stretch".into(),
            category: Mobility,
            target_muscles: strings(&["spine", "core"]),
            movement_patterns: strings(&["stretch"]),
            difficulty: Beginner,
            equipment_required: strings(&["yoga_mat"]),
            contraindicated_body_parts: vec![],
            base_sets: 2,
            base_reps: 10,
            rest_seconds: 30,
            safety_notes: strings(&["Move slowly and controlled", "Breathe with movement"]),
            modifications: vec![],
        },
        Exercise {
            exercise_id: "ex-008".into(),
            name: "Hip Flexor Stretch".into(),
            category: Mobility,
            target_muscles: strings(&["hip_flexors", "quadriceps"]),
            movement_patterns: strings(&["stretch"]),
            difficulty: Beginner,
            equipment_required: strings(&["yoga_mat"]),
            contraindicated_body_parts: strings(&["knees"]),
            base_sets: 2,
            // seconds per side
            base_reps: 30,
            rest_seconds: 15,
            safety_notes: strings(&["Keep torso upright", "Squeeze glute of back leg"]),
            modifications: vec![modification("knees", "Place cushion under knee")],
        },
        Exercise {
            exercise_id: "ex-009".into(),
            name: "Thoracic Rotation".into(),
            category: Mobility,
            target_muscles: strings(&["thoracic_spine", "obliques"]),
            movement_patterns: strings(&["rotation"]),
            difficulty: Beginner,
            equipment_required: strings(&["yoga_mat"]),
            contraindicated_body_parts: strings(&["lower_back"]),
            base_sets: 2,
            base_reps: 10,
            rest_seconds: 30,
            safety_notes: strings(&["Keep hips stable", "Rotate from mid-back"]),
            modifications: vec![],
        },
        Exercise {
            exercise_id: "ex-010".into(),
            name: "World's Greatest Stretch".into(),
            category: Mobility,
            target_muscles: strings(&["hip_flexors", "hamstrings", "thoracic_spine"]),
            movement_patterns: strings(&["stretch", "rotation"]),
            difficulty: Intermediate,
            equipment_required: vec![],
            contraindicated_body_parts: strings(&["knees", "hips"]),
            base_sets: 2,
            base_reps: 5,
            rest_seconds: 30,
            safety_notes: strings(&["Move through each position slowly"]),
            modifications: vec![modification("knees", "Reduce lunge depth")],
        },
        // ====================================================================
        // Balance
        // ====================================================================
        Exercise {
            exercise_id: "ex-011".into(),
            name: "Single Leg Balance".into(),
            category: Balance,
            target_muscles: strings(&["ankles", "core", "glutes"]),
            movement_patterns: strings(&["balance"]),
            difficulty: Beginner,
            equipment_required: vec![],
            contraindicated_body_parts: strings(&["ankles"]),
            base_sets: 2,
            // seconds per side
            base_reps: 30,
            rest_seconds: 15,
            safety_notes: strings(&["Stand near wall for support if needed"]),
            modifications: vec![modification("ankles", "Hold onto wall or chair")],
        },
        Exercise {
            exercise_id: "ex-012".into(),
            name: "Bird Dog".into(),
            category: Balance,
            target_muscles: strings(&["core", "glutes", "shoulders"]),
            movement_patterns: strings(&["balance", "plank"]),
            difficulty: Beginner,
            equipment_required: strings(&["yoga_mat"]),
            contraindicated_body_parts: strings(&["wrists", "lower_back"]),
            base_sets: 2,
            base_reps: 10,
            rest_seconds: 30,
            safety_notes: strings(&["Keep back flat", "Move slowly"]),
            modifications: vec![modification("wrists", "Perform on fists or use yoga blocks")],
        },
        // ====================================================================
        // Cardio
        // ====================================================================
        Exercise {
            exercise_id: "ex-013".into(),
            name: "Jumping Jacks".into(),
            category: Cardio,
            target_muscles: strings(&["full_body"]),
            movement_patterns: strings(&["jump"]),
            difficulty: Beginner,
            equipment_required: vec![],
            contraindicated_body_parts: strings(&["knees", "ankles", "shoulders"]),
            base_sets: 3,
            base_reps: 30,
            rest_seconds: 30,
            safety_notes: strings(&["Land softly", "Keep core engaged"]),
            modifications: vec![modification("knees", "Step out instead of jumping")],
        },
        Exercise {
            exercise_id: "ex-014".into(),
            name: "Mountain Climbers".into(),
            category: Cardio,
            target_muscles: strings(&["core", "shoulders", "hip_flexors"]),
            movement_patterns: strings(&["plank", "cardio"]),
            difficulty: Intermediate,
            equipment_required: vec![],
            contraindicated_body_parts: strings(&["wrists", "shoulders", "hips"]),
            base_sets: 3,
            base_reps: 20,
            rest_seconds: 30,
            safety_notes: strings(&["Keep hips level", "Maintain plank position"]),
            modifications: vec![modification("wrists", "Perform on elevated surface")],
        },
        Exercise {
            exercise_id: "ex-015".into(),
            name: "High Knees".into(),
            category: Cardio,
            target_muscles: strings(&["hip_flexors", "core", "calves"]),
            movement_patterns: strings(&["cardio"]),
            difficulty: Beginner,
            equipment_required: vec![],
            contraindicated_body_parts: strings(&["knees", "hips"]),
            base_sets: 3,
            base_reps: 30,
            rest_seconds: 30,
            safety_notes: strings(&["Land on balls of feet", "Keep core tight"]),
            modifications: vec![modification("knees", "March in place instead")],
        },
    ];

    Catalog { exercises }
}

impl Catalog {
    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen_ids = HashSet::new();

        for exercise in &self.exercises {
            let id = &exercise.exercise_id;
            if id.is_empty() {
                errors.push("Exercise has empty ID".to_string());
            } else if !seen_ids.insert(id.as_str()) {
                errors.push(format!("Duplicate exercise ID '{}'", id));
            }
            if exercise.name.is_empty() {
                errors.push(format!("Exercise '{}' has empty name", id));
            }
            if exercise.base_sets == 0 {
                errors.push(format!("Exercise '{}' has zero base sets", id));
            }
            for m in &exercise.modifications {
                if m.condition.is_empty() {
                    errors.push(format!("Exercise '{}' has a modification with empty condition", id));
                }
            }
        }

        // Every goal should be servable by at least one exercise
        for goal in WorkoutGoal::ALL {
            let served = self.exercises.iter().any(|e| goal.accepts(e.category));
            if !served {
                errors.push(format!("Catalog has no exercises for goal '{}'", goal));
            }
        }

        errors
    }

    /// Look up an exercise by ID
    pub fn get(&self, exercise_id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.exercise_id == exercise_id)
    }
}

/// Catalog stored as a JSON array of exercises
///
/// The file is read on every fetch so edits are picked up without a restart.
/// Unknown fields or malformed entries fail the whole read.
#[derive(Clone, Debug)]
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file into an in-memory [`Catalog`]
    pub fn load(&self) -> Result<Catalog> {
        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            Error::Catalog(format!("Unable to read catalog {:?}: {}", self.path, e))
        })?;
        let exercises: Vec<Exercise> = serde_json::from_str(&contents).map_err(|e| {
            Error::Catalog(format!("Malformed catalog {:?}: {}", self.path, e))
        })?;
        tracing::debug!("Loaded {} exercises from {:?}", exercises.len(), self.path);
        Ok(Catalog { exercises })
    }
}

impl ExerciseCatalog for JsonCatalog {
    fn exercises(&self) -> Result<Vec<Exercise>> {
        Ok(self.load()?.exercises)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads() {
        let catalog = build_default_catalog();
        assert_eq!(catalog.exercises.len(), 15);
    }

    #[test]
    fn test_cached_catalog_matches_built() {
        assert_eq!(get_default_catalog().exercises, build_default_catalog().exercises);
    }

    #[test]
    fn test_default_catalog_validates() {
        let catalog = build_default_catalog();
        let errors = catalog.validate();
        assert!(
            errors.is_empty(),
            "Default catalog has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_validate_reports_duplicates_and_gaps() {
        let mut catalog = Catalog {
            exercises: vec![
                crate::testing::exercise("dup", ExerciseCategory::Strength),
                crate::testing::exercise("dup", ExerciseCategory::Strength),
            ],
        };
        catalog.exercises[1].base_sets = 0;

        let errors = catalog.validate();
        assert!(errors.iter().any(|e| e.contains("Duplicate exercise ID 'dup'")));
        assert!(errors.iter().any(|e| e.contains("zero base sets")));
        assert!(errors.iter().any(|e| e.contains("goal 'cardio'")));
        assert!(!errors.iter().any(|e| e.contains("goal 'endurance'")));
    }

    #[test]
    fn test_get_by_id() {
        let catalog = build_default_catalog();
        assert_eq!(catalog.get("ex-006").map(|e| e.name.as_str()), Some("Plank"));
        assert!(catalog.get("ex-999").is_none());
    }

    #[test]
    fn test_json_catalog_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("catalog.json");
        let built = build_default_catalog();
        std::fs::write(&path, serde_json::to_string(&built.exercises).unwrap()).unwrap();

        let loaded = JsonCatalog::new(&path).exercises().unwrap();
        assert_eq!(loaded, built.exercises);
    }

    #[test]
    fn test_json_catalog_missing_file_is_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let catalog = JsonCatalog::new(temp_dir.path().join("missing.json"));
        assert!(matches!(catalog.exercises(), Err(Error::Catalog(_))));
    }

    #[test]
    fn test_json_catalog_fails_closed() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"[{"exercise_id": "x", "name": "X", "category": "yoga",
                "target_muscles": [], "movement_patterns": [], "difficulty": "beginner",
                "base_sets": 1, "base_reps": 1, "rest_seconds": 1}]"#,
        )
        .unwrap();

        let err = JsonCatalog::new(&path).exercises().unwrap_err();
        assert!(err.to_string().contains("Malformed catalog"));
    }
}
