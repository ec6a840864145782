//! In-memory version-control fake

#![allow(dead_code)]

use git_chain::error::{Error, Result};
use git_chain::repo::{RebaseOutcome, VersionControl};
use git_chain::types::CommitInfo;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Fake repository with scripted rebase outcomes
///
/// - Branch heads start at `<branch>-sha`; a completed rebase moves them to
///   `<branch>-rebased`
/// - `script_rebase` queues outcomes per branch: the first answers
///   `rebase_onto`, the rest answer `continue_rebase`
/// - Every mutating call is appended to a log
pub struct FakeRepo {
    branches: Mutex<HashMap<String, String>>,
    merge_bases: Mutex<HashMap<(String, String), String>>,
    history: Mutex<HashMap<(String, String), Vec<CommitInfo>>>,
    scripts: Mutex<HashMap<String, VecDeque<RebaseOutcome>>>,
    rebasing: Mutex<Option<String>>,
    current: Mutex<Option<String>>,
    remotes: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<String>>,
    error_on_push: Mutex<Option<String>>,
}

impl FakeRepo {
    /// Repository with the given local branches at `<branch>-sha`
    pub fn with_branches(names: &[&str]) -> Self {
        Self {
            branches: Mutex::new(
                names
                    .iter()
                    .map(|n| ((*n).to_string(), format!("{n}-sha")))
                    .collect(),
            ),
            merge_bases: Mutex::new(HashMap::new()),
            history: Mutex::new(HashMap::new()),
            scripts: Mutex::new(HashMap::new()),
            rebasing: Mutex::new(None),
            current: Mutex::new(names.first().map(|n| (*n).to_string())),
            remotes: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            error_on_push: Mutex::new(None),
        }
    }

    // === Setup ===

    pub fn set_commit(&self, branch: &str, commit: &str) {
        self.branches
            .lock()
            .unwrap()
            .insert(branch.to_string(), commit.to_string());
    }

    pub fn set_merge_base(&self, a: &str, b: &str, commit: &str) {
        self.merge_bases
            .lock()
            .unwrap()
            .insert((a.to_string(), b.to_string()), commit.to_string());
    }

    /// Commits listed oldest first as `(id, message)`
    pub fn set_history(&self, from: &str, to: &str, commits: &[(&str, &str)]) {
        let newest_first = commits
            .iter()
            .rev()
            .map(|(id, message)| CommitInfo {
                id: (*id).to_string(),
                message: (*message).to_string(),
            })
            .collect();
        self.history
            .lock()
            .unwrap()
            .insert((from.to_string(), to.to_string()), newest_first);
    }

    pub fn script_rebase(&self, branch: &str, outcomes: &[RebaseOutcome]) {
        self.scripts
            .lock()
            .unwrap()
            .insert(branch.to_string(), outcomes.iter().copied().collect());
    }

    pub fn set_current(&self, branch: Option<&str>) {
        *self.current.lock().unwrap() = branch.map(str::to_string);
    }

    pub fn set_remote(&self, name: &str, url: &str) {
        self.remotes
            .lock()
            .unwrap()
            .insert(name.to_string(), url.to_string());
    }

    // === Error injection methods ===

    /// Make `force_push` fail for one branch
    pub fn fail_push(&self, branch: &str) {
        *self.error_on_push.lock().unwrap() = Some(branch.to_string());
    }

    // === Call inspection ===

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls that change branches or the remote (everything but checkout)
    pub fn mutating_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| !c.starts_with("checkout"))
            .collect()
    }

    pub fn current(&self) -> Option<String> {
        self.current.lock().unwrap().clone()
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_outcome(&self, branch: &str) -> RebaseOutcome {
        self.scripts
            .lock()
            .unwrap()
            .get_mut(branch)
            .and_then(VecDeque::pop_front)
            .unwrap_or(RebaseOutcome::Completed)
    }

    fn settle(&self, branch: &str, outcome: RebaseOutcome) -> RebaseOutcome {
        if outcome == RebaseOutcome::Completed {
            *self.rebasing.lock().unwrap() = None;
            self.set_commit(branch, &format!("{branch}-rebased"));
        } else {
            *self.rebasing.lock().unwrap() = Some(branch.to_string());
        }
        outcome
    }
}

impl VersionControl for FakeRepo {
    fn commit_of(&self, branch: &str) -> Result<String> {
        self.branches
            .lock()
            .unwrap()
            .get(branch)
            .cloned()
            .ok_or_else(|| Error::Git(format!("unknown branch {branch}")))
    }

    fn branch_exists(&self, branch: &str) -> Result<bool> {
        Ok(self.branches.lock().unwrap().contains_key(branch))
    }

    fn merge_base(&self, a: &str, b: &str) -> Result<String> {
        self.merge_bases
            .lock()
            .unwrap()
            .get(&(a.to_string(), b.to_string()))
            .cloned()
            .ok_or_else(|| Error::Git(format!("no merge base for {a} and {b}")))
    }

    fn commits_between(&self, from: &str, to: &str) -> Result<Vec<CommitInfo>> {
        Ok(self
            .history
            .lock()
            .unwrap()
            .get(&(from.to_string(), to.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn rebase_onto(
        &self,
        onto: &str,
        start: &str,
        branch: &str,
        _interactive: bool,
    ) -> Result<RebaseOutcome> {
        self.log(format!("rebase {branch} onto {onto} from {start}"));
        *self.current.lock().unwrap() = Some(branch.to_string());
        let outcome = self.next_outcome(branch);
        Ok(self.settle(branch, outcome))
    }

    fn continue_rebase(&self) -> Result<RebaseOutcome> {
        self.log("continue".to_string());
        let branch = self
            .rebasing
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::Git("no rebase in progress".to_string()))?;
        let outcome = self.next_outcome(&branch);
        Ok(self.settle(&branch, outcome))
    }

    fn abort_rebase(&self) -> Result<()> {
        self.log("abort".to_string());
        *self.rebasing.lock().unwrap() = None;
        Ok(())
    }

    fn force_push(&self, remote: &str, branch: &str) -> Result<()> {
        self.log(format!("push {remote} {branch}"));
        if self.error_on_push.lock().unwrap().as_deref() == Some(branch) {
            return Err(Error::PushFailed {
                branch: branch.to_string(),
                message: "remote rejected".to_string(),
            });
        }
        Ok(())
    }

    fn remote_url(&self, remote: &str) -> Result<String> {
        self.remotes
            .lock()
            .unwrap()
            .get(remote)
            .cloned()
            .ok_or_else(|| Error::RemoteNotFound(remote.to_string()))
    }

    fn current_branch(&self) -> Result<Option<String>> {
        Ok(self.current())
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.log(format!("checkout {branch}"));
        *self.current.lock().unwrap() = Some(branch.to_string());
        Ok(())
    }
}
