//! Rebase execution - effectful operations
//!
//! Steps run strictly in plan order because each rebased branch is the base
//! of the next step. A conflict suspends the run until the [`ConflictResolver`]
//! decides to continue or abort; a failed push ends it. Completed steps are
//! never rolled back.

use super::plan::{RebasePlan, RebaseStep};
use crate::error::{Error, Result};
use crate::repo::{RebaseOutcome, VersionControl};
use tracing::{debug, info, warn};

/// Executor state, reported through [`ProgressCallback::on_state`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorState {
    /// Validating the plan and recording the starting branch
    Planning,
    /// Rebasing and pushing step `i`
    Executing(usize),
    /// Step `i` stopped on a conflict
    ConflictPaused(usize),
    /// Continuing step `i` after manual resolution
    Resuming(usize),
    /// Step `i` failed or was abandoned; later steps are skipped
    Aborted(usize),
    /// All steps completed
    Done,
}

/// What to do about a paused rebase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictChoice {
    /// Conflicts were resolved; continue the rebase
    Continue,
    /// Abort this rebase and the rest of the plan
    Abort,
}

/// Decides how to proceed when a step stops on a conflict
pub trait ConflictResolver {
    /// Called once per pause, after the user has had a chance to fix things up
    fn resolve(&self, step: &RebaseStep) -> ConflictChoice;
}

/// Receives progress while a plan executes
pub trait ProgressCallback {
    /// The executor entered a new state
    fn on_state(&self, state: ExecutorState);

    /// Human-readable progress message
    fn on_message(&self, message: &str);
}

/// Execution settings
#[derive(Debug, Clone)]
pub struct ExecuteOptions {
    /// Remote that rebased branches are force-pushed to
    pub remote: String,
    /// Run the rebase primitive interactively
    pub interactive: bool,
}

/// Result of executing a plan
#[derive(Debug, Clone, Default)]
pub struct ExecutionReport {
    /// Branches rebased and pushed, in order
    pub completed: Vec<String>,
    /// Branch whose step failed (if any)
    pub failed_branch: Option<String>,
    /// Error message from the failed step (if any)
    pub error_message: Option<String>,
    /// Follow-ups to perform by hand on the hosting service
    pub manual_tasks: Vec<String>,
}

impl ExecutionReport {
    /// Check if every planned step completed
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed_branch.is_none()
    }
}

/// Execute the rebase plan (EFFECTFUL)
///
/// Stops at the first failure. The branch checked out before the run is
/// checked out again afterwards on a best-effort basis.
pub fn execute_rebase(
    plan: &RebasePlan,
    repo: &dyn VersionControl,
    resolver: &dyn ConflictResolver,
    progress: &dyn ProgressCallback,
    options: &ExecuteOptions,
) -> Result<ExecutionReport> {
    progress.on_state(ExecutorState::Planning);
    let starting_branch = repo.current_branch()?;
    let mut report = ExecutionReport::default();

    for (i, step) in plan.steps.iter().enumerate() {
        progress.on_state(ExecutorState::Executing(i));
        progress.on_message(&format!("🔁 Rebasing {} onto {}", step.child, step.base));

        if let Err(e) = run_step(i, step, repo, resolver, progress, options) {
            warn!(branch = %step.child, error = %e, "rebase step failed");
            progress.on_state(ExecutorState::Aborted(i));
            report.failed_branch = Some(step.child.clone());
            report.error_message = Some(e.to_string());
            break;
        }

        progress.on_message(&format!("✅ Pushed {}", step.child));
        report.completed.push(step.child.clone());
        if step.retargeted {
            if let Some(number) = step.pr_number {
                report.manual_tasks.push(format!(
                    "change the base of PR #{number} to `{}`",
                    step.base
                ));
            }
        }
    }

    if report.is_success() {
        progress.on_state(ExecutorState::Done);
        info!(steps = report.completed.len(), root = %plan.root, "rebase plan complete");
    }

    if let Some(branch) = starting_branch {
        if let Err(e) = repo.checkout(&branch) {
            warn!(branch = %branch, error = %e, "could not restore starting branch");
        }
    }

    Ok(report)
}

fn run_step(
    index: usize,
    step: &RebaseStep,
    repo: &dyn VersionControl,
    resolver: &dyn ConflictResolver,
    progress: &dyn ProgressCallback,
    options: &ExecuteOptions,
) -> Result<()> {
    let mut outcome = repo.rebase_onto(
        &step.base,
        &step.start_commit,
        &step.child,
        options.interactive,
    )?;

    while outcome == RebaseOutcome::Conflicted {
        progress.on_state(ExecutorState::ConflictPaused(index));
        progress.on_message(&format!(
            "⚠️  Conflict while rebasing {} onto {}",
            step.child, step.base
        ));

        match resolver.resolve(step) {
            ConflictChoice::Continue => {
                progress.on_state(ExecutorState::Resuming(index));
                outcome = repo.continue_rebase()?;
            }
            ConflictChoice::Abort => {
                repo.abort_rebase()?;
                return Err(Error::RebaseAborted {
                    branch: step.child.clone(),
                });
            }
        }
    }

    debug!(branch = %step.child, remote = %options.remote, "pushing rebased branch");
    repo.force_push(&options.remote, &step.child)
}
