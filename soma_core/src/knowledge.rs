//! Pain-to-movement knowledge base.
//!
//! Two separate vocabularies keyed by body part:
//! - movement exclusions, reported back to the user as "avoided movements"
//! - contraindication tags, matched against each exercise's
//!   `contraindicated_body_parts` when filtering the catalog
//!
//! Only the second one drives filtering.

use crate::BodyPart;
use std::collections::BTreeSet;

/// Movement patterns to avoid for a painful body part
pub fn movement_exclusions(part: BodyPart) -> &'static [&'static str] {
    match part {
        BodyPart::LowerBack => &["deadlift", "good_morning", "bent_over_row", "heavy_squat"],
        BodyPart::UpperBack => &["pull_up", "lat_pulldown", "rowing"],
        BodyPart::Knees => &["deep_squat", "lunge", "jump", "running", "box_jump"],
        BodyPart::Shoulders => &["overhead_press", "lateral_raise", "push_up", "bench_press"],
        BodyPart::Neck => &["shoulder_shrug", "neck_extension", "overhead_press"],
        BodyPart::Hips => &["squat", "lunge", "hip_hinge", "deadlift"],
        BodyPart::Ankles => &["calf_raise", "jump", "running", "squat"],
        BodyPart::Wrists => &["push_up", "plank", "front_squat", "clean"],
        BodyPart::Elbows => &["tricep_extension", "bicep_curl", "push_up", "pull_up"],
    }
}

/// Anatomical tags an exercise must not be contraindicated for
pub fn contraindication_tags(part: BodyPart) -> &'static [&'static str] {
    match part {
        BodyPart::LowerBack => &["lower_back", "spine", "lumbar"],
        BodyPart::UpperBack => &["upper_back", "thoracic", "lats"],
        BodyPart::Knees => &["knees", "quadriceps", "patella"],
        BodyPart::Shoulders => &["shoulders", "deltoids", "rotator_cuff"],
        BodyPart::Neck => &["neck", "cervical", "trapezius"],
        BodyPart::Hips => &["hips", "hip_flexors", "glutes"],
        BodyPart::Ankles => &["ankles", "calves", "achilles"],
        BodyPart::Wrists => &["wrists", "forearms"],
        BodyPart::Elbows => &["elbows", "biceps", "triceps"],
    }
}

/// Movements to avoid for the reported pain points
///
/// Deduplicated, in first-seen order.
pub fn excluded_movements(pain_points: &[BodyPart]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    pain_points
        .iter()
        .flat_map(|p| movement_exclusions(*p).iter())
        .filter(|m| seen.insert(**m))
        .map(|m| m.to_string())
        .collect()
}

/// Union of the contraindication tags for the reported pain points
pub fn contraindicated_tags(pain_points: &[BodyPart]) -> BTreeSet<String> {
    pain_points
        .iter()
        .flat_map(|p| contraindication_tags(*p).iter())
        .map(|t| t.to_string())
        .collect()
}

/// Human-readable explanation of why movements were avoided
///
/// Parts are listed in reported order with underscores shown as spaces.
pub fn avoided_reason(pain_points: &[BodyPart]) -> Option<String> {
    if pain_points.is_empty() {
        return None;
    }

    let formatted = pain_points
        .iter()
        .map(|p| p.as_str().replace('_', " "))
        .collect::<Vec<_>>()
        .join(", ");

    Some(format!("User reported pain in: {}", formatted))
}
