//! `VersionControl` for a git working copy
//!
//! Reads go through `git2`. Rebasing, pushing and checkout shell out to the
//! `git` binary so hooks, editors and credential helpers behave as usual.

use super::{RebaseOutcome, VersionControl};
use crate::error::{Error, Result};
use crate::types::CommitInfo;
use git2::{BranchType, ErrorCode, Oid, Repository, RepositoryState, Sort};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

/// A local git working copy
pub struct GitRepo {
    repo: Repository,
    workdir: PathBuf,
}

impl std::fmt::Debug for GitRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepo")
            .field("workdir", &self.workdir)
            .finish_non_exhaustive()
    }
}

impl GitRepo {
    /// Open the repository containing `path`
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path).map_err(|e| {
            Error::Git(format!(
                "{} is not inside a git repository: {}",
                path.display(),
                e.message()
            ))
        })?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| Error::Git("bare repositories have no working copy".to_string()))?
            .to_path_buf();
        debug!(workdir = %workdir.display(), "opened git repository");
        Ok(Self { repo, workdir })
    }

    /// Commit a revision (branch name or commit id) points to
    fn resolve(&self, rev: &str) -> Result<Oid> {
        let commit = self.repo.revparse_single(rev)?.peel_to_commit()?;
        Ok(commit.id())
    }

    fn command(&self, args: &[&str]) -> Command {
        debug!("Running `git {}`", args.join(" "));
        let mut cmd = Command::new("git");
        cmd.args(args).current_dir(&self.workdir);
        cmd
    }

    fn output(&self, args: &[&str]) -> Result<Output> {
        Ok(self.command(args).output()?)
    }

    /// Run git capturing stdout; non-zero exit is an error
    fn run(&self, args: &[&str]) -> Result<String> {
        let out = self.output(args)?;
        if !out.status.success() {
            return Err(Error::Git(format!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
    }

    /// Run git attached to the terminal so editors and prompts work
    fn run_attached(&self, args: &[&str]) -> Result<bool> {
        let status = self.command(args).status()?;
        Ok(status.success())
    }

    fn rebase_in_progress(&self) -> bool {
        matches!(
            self.repo.state(),
            RepositoryState::Rebase
                | RepositoryState::RebaseInteractive
                | RepositoryState::RebaseMerge
                | RepositoryState::ApplyMailboxOrRebase
        )
    }

    fn outcome_after(&self, succeeded: bool, what: &str) -> Result<RebaseOutcome> {
        if succeeded {
            Ok(RebaseOutcome::Completed)
        } else if self.rebase_in_progress() {
            Ok(RebaseOutcome::Conflicted)
        } else {
            Err(Error::Git(format!("{what} failed")))
        }
    }
}

impl VersionControl for GitRepo {
    fn commit_of(&self, branch: &str) -> Result<String> {
        Ok(self.resolve(branch)?.to_string())
    }

    fn branch_exists(&self, branch: &str) -> Result<bool> {
        match self.repo.find_branch(branch, BranchType::Local) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn merge_base(&self, a: &str, b: &str) -> Result<String> {
        let base = self.repo.merge_base(self.resolve(a)?, self.resolve(b)?)?;
        Ok(base.to_string())
    }

    fn commits_between(&self, from: &str, to: &str) -> Result<Vec<CommitInfo>> {
        let mut walk = self.repo.revwalk()?;
        walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        walk.push(self.resolve(to)?)?;
        walk.hide(self.resolve(from)?)?;

        walk.map(|oid| -> Result<CommitInfo> {
            let commit = self.repo.find_commit(oid?)?;
            Ok(CommitInfo {
                id: commit.id().to_string(),
                message: commit.message().unwrap_or_default().trim().to_string(),
            })
        })
        .collect()
    }

    fn rebase_onto(
        &self,
        onto: &str,
        start: &str,
        branch: &str,
        interactive: bool,
    ) -> Result<RebaseOutcome> {
        let mut args = vec!["rebase"];
        if interactive {
            args.push("--interactive");
        }
        args.extend(["--onto", onto, start, branch]);
        let ok = self.run_attached(&args)?;
        self.outcome_after(ok, &format!("rebase of {branch} onto {onto}"))
    }

    fn continue_rebase(&self) -> Result<RebaseOutcome> {
        // The user may already have finished the rebase by hand.
        if !self.rebase_in_progress() {
            return Ok(RebaseOutcome::Completed);
        }
        let ok = self.run_attached(&["-c", "core.editor=true", "rebase", "--continue"])?;
        self.outcome_after(ok, "rebase --continue")
    }

    fn abort_rebase(&self) -> Result<()> {
        if self.rebase_in_progress() {
            self.run(&["rebase", "--abort"])?;
        }
        Ok(())
    }

    fn force_push(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["push", "--force", remote, &format!("{branch}:{branch}")])
            .map(|_| ())
            .map_err(|e| Error::PushFailed {
                branch: branch.to_string(),
                message: e.to_string(),
            })
    }

    fn remote_url(&self, remote: &str) -> Result<String> {
        self.run(&["remote", "get-url", remote])
            .map_err(|_| Error::RemoteNotFound(remote.to_string()))
    }

    fn current_branch(&self) -> Result<Option<String>> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        if !head.is_branch() {
            return Ok(None);
        }
        Ok(head.shorthand().map(str::to_string))
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", "--quiet", branch]).map(|_| ())
    }
}
