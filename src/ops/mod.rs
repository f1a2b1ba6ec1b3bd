//! High-level operations.
//!
//! This module contains the library side of Berth commands.

pub mod plan;

pub use plan::{GenerationPlan, PackagePlan, TargetPlan};
