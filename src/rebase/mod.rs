//! Rebase engine for stacked branches
//!
//! Same split as the rest of the crate:
//! 1. Plan - compute ordered `RebaseStep`s from the forest (reads only)
//! 2. Trim - optionally narrow each step's replay range
//! 3. Execute - drive the version-control port step by step (effectful)

mod execute;
mod plan;
mod trim;

pub use execute::{
    execute_rebase, ConflictChoice, ConflictResolver, ExecuteOptions, ExecutionReport,
    ExecutorState, ProgressCallback,
};
pub use plan::{plan_rebase, PlanOptions, RebasePlan, RebaseStep};
pub use trim::shared_history_start;
