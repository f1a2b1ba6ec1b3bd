//! `berth check` command
//!
//! Loads the whole manifest tree, which wires every target edge, and
//! resolves the package graph. Anything structurally wrong fails here.

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::commands::load_workspace;
use berth::util::diagnostic::{emit, Diagnostic};

pub fn execute(opts: &GlobalOpts) -> Result<()> {
    let (ctx, ws) = load_workspace(opts)?;
    let graph = ws.graph()?;

    for &pkg in graph.packages() {
        let package = graph.package(pkg);
        if package.is_hollow() {
            let mut diag = Diagnostic::warning(format!(
                "package `{}` declares no targets",
                package.name()
            ));
            if let Some(path) = ws.manifest_path(pkg) {
                diag = diag.with_location(path);
            }
            emit(&diag, ctx.color());
        }
    }

    let targets: usize = graph.packages().iter().map(|&p| graph.targets(p).len()).sum();
    println!(
        "checked `{}`: {} package(s), {} target(s) for {}",
        graph.package(graph.root()).name(),
        graph.len(),
        targets,
        ws.platform()
    );

    Ok(())
}
