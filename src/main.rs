//! git-chain binary entry point

mod cli;

use crate::cli::style::Stylize;
use anstream::eprintln;
use clap::Parser;
use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    cli.init_tracing();

    if let Err(e) = cli::run(cli).await {
        eprintln!("{} {e}", "error:".error());
        std::process::exit(1);
    }
}
