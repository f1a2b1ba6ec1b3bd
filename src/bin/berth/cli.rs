//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use berth::core::Platform;

/// Berth - package and target descriptors for build-file generation
#[derive(Parser)]
#[command(name = "berth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options every command accepts.
#[derive(Args, Clone)]
pub struct GlobalOpts {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Platform to resolve for instead of the host (windows, macos, linux, other)
    #[arg(long, global = true, env = "BERTH_PLATFORM")]
    pub platform: Option<Platform>,

    /// Path to Berth.toml (defaults to searching upward from the current directory)
    #[arg(long, global = true)]
    pub manifest_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Display the package dependency tree
    Tree(TreeArgs),

    /// Emit the generation plan as JSON
    Plan(PlanArgs),

    /// Show the link requirements of a target
    Links(LinksArgs),

    /// Load the manifest tree and verify the package graph
    Check,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct TreeArgs {
    /// Package to show tree for (defaults to root)
    pub package: Option<String>,

    /// Maximum depth to display
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Expand packages that were already shown
    #[arg(long)]
    pub duplicates: bool,
}

#[derive(Args)]
pub struct PlanArgs {
    /// Write the plan to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct LinksArgs {
    /// Target name or `<package>/<target>` (defaults to the root's main library)
    pub target: Option<String>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
