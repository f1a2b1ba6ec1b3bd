//! `berth links` command

use anyhow::Result;

use crate::cli::{GlobalOpts, LinksArgs};
use crate::commands::load_workspace;
use berth::core::TargetId;
use berth::resolver::PackageGraph;
use berth::util::diagnostic::suggestions;

pub fn execute(args: LinksArgs, opts: &GlobalOpts) -> Result<()> {
    let (_ctx, ws) = load_workspace(opts)?;
    let graph = ws.graph()?;
    let platform = ws.platform();

    let target = match &args.target {
        Some(name) => find_target(&graph, name).ok_or_else(|| {
            anyhow::anyhow!(
                "target `{}` not found\n{}",
                name,
                suggestions::TARGET_NOT_FOUND
            )
        })?,
        None => ws.packages().main_lib(graph.root())?,
    };

    println!(
        "Link requirements for '{}' on {}:",
        graph.target(target).name(),
        platform
    );
    println!();

    // The target's own requirements, then those of everything it links
    let mut sources = vec![target];
    sources.extend(ws.packages().transitive_target_deps(target));

    let mut index = 1;
    for source in sources {
        for req in graph.links_for(source, platform) {
            println!("  {}. {} {}", index, req.kind, req.files.join(", "));
            println!("     From: {}", qualified_name(&graph, source));
            println!();
            index += 1;
        }
    }

    if index == 1 {
        println!("  (no link requirements)");
    }

    Ok(())
}

/// Resolve `name` or `package/name` to a target in the graph.
///
/// A bare name is looked up in the root package first.
fn find_target(graph: &PackageGraph<'_>, spec: &str) -> Option<TargetId> {
    if let Some((package, name)) = spec.split_once('/') {
        let pkg = graph.find(package)?;
        return graph
            .targets(pkg)
            .into_iter()
            .find(|&t| graph.target(t).name() == name);
    }

    let root = graph.root();
    let mut packages = vec![root];
    packages.extend(graph.packages().iter().copied().filter(|&p| p != root));

    packages.into_iter().find_map(|pkg| {
        graph
            .targets(pkg)
            .into_iter()
            .find(|&t| graph.target(t).name() == spec)
    })
}

fn qualified_name(graph: &PackageGraph<'_>, target: TargetId) -> String {
    let name = graph.target(target).name();
    match graph.owner(target) {
        Some(pkg) => format!("{}/{}", graph.package(pkg).name(), name),
        None => name.to_string(),
    }
}
