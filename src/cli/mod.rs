//! Command-line surface

mod context;
mod print;
pub mod style;
mod update;

use crate::cli::style::{Stylize, check, spinner_style};
use anstream::println;
use clap::{ArgAction, Parser, Subcommand};
use context::CommandContext;
use dialoguer::Select;
use git_chain::error::Result;
use git_chain::platform::{RemoteSnapshot, fetch_snapshot};
use git_chain::rebase::{
    ConflictChoice, ConflictResolver, ExecutorState, ProgressCallback, RebaseStep,
};
use indicatif::ProgressBar;
use print::{PrintOptions, run_print};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use tracing::level_filters::LevelFilter;
use update::{UpdateOptions, run_update};

/// Visualize and maintain chains of stacked pull requests
#[derive(Debug, Parser)]
#[command(name = "git-chain", version, about)]
pub struct Cli {
    /// Path inside the repository (defaults to the current directory)
    #[arg(long, global = true)]
    pub path: Option<PathBuf>,

    /// Remote whose URL identifies the hosted repository
    #[arg(long, global = true)]
    pub remote: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print your open pull requests as a tree
    Print {
        /// Also fetch closed pull requests
        #[arg(long)]
        include_closed: bool,

        /// Keep closed leaf branches in the tree
        #[arg(long)]
        no_prune: bool,
    },

    /// Rebase every branch stacked on ROOT onto its updated base
    UpdateDependencies {
        /// Branch whose descendants should be rebased
        #[arg(long)]
        root: String,

        /// Print the plan without rebasing or pushing
        #[arg(long)]
        dry_run: bool,

        /// Print the dry-run plan as JSON
        #[arg(long, requires = "dry_run")]
        json: bool,

        /// ROOT is going away: move its children onto ROOT's own base
        #[arg(long)]
        delete: bool,

        /// Skip commits whose messages already match the base
        #[arg(long)]
        trim_shared_history: bool,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

impl Cli {
    /// Install the stderr log subscriber
    pub fn init_tracing(&self) {
        let level = match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        };
        let filter = tracing_subscriber::EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy();
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Run the parsed command
pub async fn run(cli: Cli) -> Result<()> {
    let path = cli.path.clone().unwrap_or_else(|| PathBuf::from("."));
    let ctx = CommandContext::new(&path, cli.remote.as_deref())?;

    match cli.command {
        Commands::Print {
            include_closed,
            no_prune,
        } => {
            run_print(
                &ctx,
                PrintOptions {
                    include_closed,
                    no_prune,
                },
            )
            .await
        }
        Commands::UpdateDependencies {
            root,
            dry_run,
            json,
            delete,
            trim_shared_history,
            yes,
        } => {
            run_update(
                &ctx,
                UpdateOptions {
                    root,
                    dry_run,
                    json,
                    delete,
                    trim_shared_history,
                    yes,
                },
            )
            .await
        }
    }
}

/// Fetch the remote snapshot behind a spinner
async fn fetch_with_spinner(ctx: &CommandContext, include_closed: bool) -> Result<RemoteSnapshot> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(format!(
        "Fetching pull requests for {}...",
        ctx.platform.config().full_name().emphasis()
    ));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let result = fetch_snapshot(
        ctx.platform.as_ref(),
        include_closed,
        ctx.config.concurrency,
    )
    .await;

    match &result {
        Ok(snapshot) => spinner.finish_with_message(format!(
            "{} Fetched {} pull request(s)",
            check(),
            snapshot.pulls.len().accent()
        )),
        Err(_) => spinner.finish_and_clear(),
    }
    result
}

/// Progress printer for rebase execution
pub struct CliProgress;

impl ProgressCallback for CliProgress {
    fn on_state(&self, state: ExecutorState) {
        debug!(?state, "executor state");
    }

    fn on_message(&self, message: &str) {
        println!("{message}");
    }
}

/// Asks the user what to do about a conflicted rebase
pub struct PromptResolver;

impl ConflictResolver for PromptResolver {
    fn resolve(&self, step: &RebaseStep) -> ConflictChoice {
        println!(
            "{}",
            format!(
                "Resolve the conflicts in another terminal and stage the result ({} onto {}).",
                step.child, step.base
            )
            .muted()
        );

        let choice = Select::new()
            .with_prompt("Conflicts resolved?")
            .items(&["Continue rebase", "Abort remaining steps"])
            .default(0)
            .interact();

        match choice {
            Ok(0) => ConflictChoice::Continue,
            _ => ConflictChoice::Abort,
        }
    }
}
