#![forbid(unsafe_code)]

//! Core domain model and routine generation for Soma.
//!
//! This crate provides:
//! - Domain types (physical state, exercises, constraints, routines)
//! - Pain-to-movement knowledge base
//! - Constraint building, filtering, balanced selection, volume scaling
//! - Routine assembly over an injected exercise catalog
//! - Persistence for state snapshots and the routine log

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod knowledge;
pub mod constraints;
pub mod filter;
pub mod selector;
pub mod volume;
pub mod validate;
pub mod state;
pub mod routine_log;
pub mod export;
pub mod engine;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog, Catalog, ExerciseCatalog, JsonCatalog};
pub use config::Config;
pub use constraints::build_constraints;
pub use filter::filter_exercises;
pub use selector::select_balanced;
pub use volume::{adjust_for_energy, Volume};
pub use validate::{HistoryQuery, RoutineRequest, StateUpdate};
pub use state::{JsonlStateStore, PhysicalStateStore};
pub use routine_log::{JsonlRoutineSink, RoutineSink};
pub use engine::{generate_for_request, generate_routine};
