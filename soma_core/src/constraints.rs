//! Constraint builder.
//!
//! Turns an optional physical state snapshot plus the requested duration and
//! goals into the hard limits the filter and selector work against.

use crate::knowledge::contraindicated_tags;
use crate::{Equipment, PhysicalState, RoutineConstraints, WorkoutGoal};
use std::collections::BTreeSet;

/// Energy level assumed when no state (or no energy reading) is available
pub const DEFAULT_ENERGY_LEVEL: u8 = 3;

/// Build constraints from physical state
///
/// Without a state nothing is excluded, only bodyweight work is assumed
/// possible and energy is neutral.
pub fn build_constraints(
    state: Option<&PhysicalState>,
    duration: u32,
    goals: &[WorkoutGoal],
) -> RoutineConstraints {
    let Some(state) = state else {
        return RoutineConstraints {
            excluded_body_parts: BTreeSet::new(),
            available_equipment: bodyweight_only(),
            max_duration: duration,
            energy_level: DEFAULT_ENERGY_LEVEL,
            goals: goals.to_vec(),
        };
    };

    let available_equipment = if state.equipment.is_empty() {
        bodyweight_only()
    } else {
        state
            .equipment
            .iter()
            .map(|e| e.as_str().to_string())
            .collect()
    };

    let energy_level = if state.energy_level == 0 {
        DEFAULT_ENERGY_LEVEL
    } else {
        state.energy_level
    };

    RoutineConstraints {
        excluded_body_parts: contraindicated_tags(&state.pain_points),
        available_equipment,
        max_duration: duration,
        energy_level,
        goals: goals.to_vec(),
    }
}

fn bodyweight_only() -> BTreeSet<String> {
    BTreeSet::from([Equipment::None.as_str().to_string()])
}
