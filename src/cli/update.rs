//! Update-dependencies command - rebase every descendant of a branch

use crate::cli::context::CommandContext;
use crate::cli::style::{CHECK, Stylize, arrow, check, cross};
use crate::cli::{CliProgress, PromptResolver, fetch_with_spinner};
use anstream::println;
use dialoguer::Confirm;
use git_chain::error::{Error, Result};
use git_chain::graph::{build_forest, prune_closed};
use git_chain::rebase::{
    ExecuteOptions, ExecutionReport, PlanOptions, RebasePlan, execute_rebase, plan_rebase,
};

/// Options for the update-dependencies command
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// Branch whose descendants are rebased
    pub root: String,
    /// Print the plan without touching any branch
    pub dry_run: bool,
    /// Print the plan as JSON (dry run only)
    pub json: bool,
    /// Re-attach the root's children to its parent
    pub delete: bool,
    /// Skip commits already shared with the base
    pub trim_shared_history: bool,
    /// Don't ask for confirmation
    pub yes: bool,
}

/// Run the update-dependencies command
pub async fn run_update(ctx: &CommandContext, options: UpdateOptions) -> Result<()> {
    // The root's own PR may already be closed; delete mode needs it to find
    // the grandparent.
    let include_closed = options.delete || ctx.config.include_closed;
    let snapshot = fetch_with_spinner(ctx, include_closed).await?;

    let mut forest = build_forest(&snapshot.pulls)?;
    prune_closed(&mut forest);

    let plan_options = PlanOptions {
        delete: options.delete,
        trim_shared_history: options.trim_shared_history || ctx.config.trim_shared_history,
    };
    let plan = plan_rebase(&forest, &options.root, plan_options, &ctx.repo)?;

    if options.dry_run {
        if options.json {
            let json = serde_json::to_string_pretty(&plan)
                .map_err(|e| Error::Internal(format!("failed to serialize plan: {e}")))?;
            println!("{json}");
        } else {
            print_plan(&plan);
        }
        return Ok(());
    }

    if plan.is_empty() {
        println!(
            "{}",
            format!("Nothing depends on {}", options.root).muted()
        );
        return Ok(());
    }

    if !options.yes {
        print_plan(&plan);
        if !Confirm::new()
            .with_prompt("Proceed with rebase?")
            .default(true)
            .interact()
            .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))?
        {
            println!("{}", "Aborted".muted());
            return Ok(());
        }
        println!();
    }

    let execute_options = ExecuteOptions {
        remote: ctx.config.remote.clone(),
        interactive: ctx.config.interactive_rebase,
    };
    let report = execute_rebase(
        &plan,
        &ctx.repo,
        &PromptResolver,
        &CliProgress,
        &execute_options,
    )?;

    print_report(&report);
    match report.failed_branch {
        None => Ok(()),
        Some(branch) => Err(Error::Git(format!(
            "update stopped at '{branch}': {}",
            report.error_message.unwrap_or_default()
        ))),
    }
}

fn print_plan(plan: &RebasePlan) {
    println!(
        "{} {}",
        "Rebase plan for".emphasis(),
        plan.root.accent()
    );
    println!();

    if plan.is_empty() {
        println!("  {}", "Nothing to rebase".muted());
        println!();
        return;
    }

    for step in &plan.steps {
        println!("  {} {}", arrow(), step);
    }

    let tasks = plan.manual_tasks();
    if !tasks.is_empty() {
        println!();
        println!("  {}:", "Afterwards, by hand".emphasis());
        for task in tasks {
            println!("    {} {task}", arrow());
        }
    }
    println!();
}

fn print_report(report: &ExecutionReport) {
    println!();
    if report.is_success() {
        println!(
            "{} {} branch(es) rebased and pushed",
            format!("{CHECK} Update complete:").success(),
            report.completed.len().accent()
        );
    } else {
        for branch in &report.completed {
            println!("  {} {branch}", check());
        }
        if let Some(branch) = &report.failed_branch {
            println!("  {} {branch}", cross());
        }
        if let Some(message) = &report.error_message {
            println!("{}", message.warn());
        }
    }

    if !report.manual_tasks.is_empty() {
        println!();
        println!("{}", "Remaining manual steps:".emphasis());
        for task in &report.manual_tasks {
            println!("  {} {task}", arrow());
        }
    }
}
