//! Print command - render the PR forest

use crate::cli::context::CommandContext;
use crate::cli::fetch_with_spinner;
use crate::cli::style::Stylize;
use anstream::println;
use git_chain::error::Result;
use git_chain::graph::{build_forest, prune_closed};
use git_chain::render::{compute_sync_states, render_forest};
use tracing::debug;

/// Options for the print command
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintOptions {
    /// Also fetch closed PRs
    pub include_closed: bool,
    /// Keep closed leaves in the tree
    pub no_prune: bool,
}

/// Run the print command
pub async fn run_print(ctx: &CommandContext, options: PrintOptions) -> Result<()> {
    let include_closed = options.include_closed || ctx.config.include_closed;
    let snapshot = fetch_with_spinner(ctx, include_closed).await?;

    let mut forest = build_forest(&snapshot.pulls)?;
    if !options.no_prune {
        let pruned = prune_closed(&mut forest);
        debug!(count = pruned.len(), "pruned closed branches");
    }

    if forest.is_empty() {
        println!("{}", "No open pull requests".muted());
        return Ok(());
    }

    let sync = compute_sync_states(&forest, &ctx.repo)?;
    for line in render_forest(&forest, &snapshot.reviews, &sync)? {
        println!("{line}");
    }

    Ok(())
}
