//! `berth plan` command
//!
//! Emits the generation plan: every package in the graph, dependencies
//! first, with its targets and their link requirements.

use anyhow::{Context, Result};

use crate::cli::{GlobalOpts, PlanArgs};
use crate::commands::load_workspace;
use berth::ops::GenerationPlan;

pub fn execute(args: PlanArgs, opts: &GlobalOpts) -> Result<()> {
    let (_ctx, ws) = load_workspace(opts)?;
    let graph = ws.graph()?;

    let plan = GenerationPlan::new(&graph, ws.platform());
    let json = plan.to_json()?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, format!("{}\n", json))
                .with_context(|| format!("failed to write plan: {}", path.display()))?;
            tracing::info!(
                "wrote plan for {} package(s) to {}",
                plan.packages.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
