//! Berth CLI - package and target descriptors for build-file generation

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use berth::core::DescriptorError;
use berth::util::diagnostic::{self, ManifestParseError};
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.global.no_color;

    if let Err(e) = run(cli) {
        report(e, color);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.global.verbose {
        EnvFilter::new("berth=debug")
    } else {
        EnvFilter::new("berth=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let opts = cli.global;
    match cli.command {
        Commands::Tree(args) => commands::tree::execute(args, &opts),
        Commands::Plan(args) => commands::plan::execute(args, &opts),
        Commands::Links(args) => commands::links::execute(args, &opts),
        Commands::Check => commands::check::execute(&opts),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Print an error the way its type wants to be shown.
fn report(err: anyhow::Error, color: bool) {
    if let Some(e) = err.downcast_ref::<DescriptorError>() {
        let mut diag = e.to_diagnostic();
        let outer = err.to_string();
        if outer != e.to_string() {
            diag = diag.with_context(outer);
        }
        diagnostic::emit(&diag, color);
        return;
    }

    match err.downcast::<ManifestParseError>() {
        Ok(parse) => {
            let _ = miette::set_hook(Box::new(move |_| {
                Box::new(miette::MietteHandlerOpts::new().color(color).build())
            }));
            eprintln!("{:?}", miette::Report::new(parse));
        }
        Err(err) => eprintln!("error: {:#}", err),
    }
}
