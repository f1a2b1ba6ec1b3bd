//! `berth tree` command

use std::collections::HashSet;

use anyhow::Result;

use crate::cli::{GlobalOpts, TreeArgs};
use crate::commands::load_workspace;
use berth::core::PackageId;
use berth::resolver::PackageGraph;
use berth::util::diagnostic::suggestions;

pub fn execute(args: TreeArgs, opts: &GlobalOpts) -> Result<()> {
    let (_ctx, ws) = load_workspace(opts)?;
    let graph = ws.graph()?;

    let start = match &args.package {
        Some(name) => graph.find(name).ok_or_else(|| {
            anyhow::anyhow!(
                "package `{}` is not in the dependency graph\n{}",
                name,
                suggestions::TARGET_NOT_FOUND
            )
        })?,
        None => graph.root(),
    };

    let mut printer = TreePrinter {
        graph: &graph,
        max_depth: args.depth.unwrap_or(usize::MAX),
        expand_duplicates: args.duplicates,
        seen: HashSet::new(),
    };
    printer.print(start, "", "", 0);

    Ok(())
}

struct TreePrinter<'g, 'a> {
    graph: &'g PackageGraph<'a>,
    max_depth: usize,
    expand_duplicates: bool,
    seen: HashSet<PackageId>,
}

impl TreePrinter<'_, '_> {
    fn print(&mut self, pkg: PackageId, branch: &str, indent: &str, depth: usize) {
        let package = self.graph.package(pkg);
        let is_duplicate = !self.seen.insert(pkg);
        let collapsed = is_duplicate && !self.expand_duplicates;

        let mut line = format!("{}{}", branch, package.name());
        if package.main_lib().is_none() {
            line.push_str(" (no lib)");
        }
        if collapsed {
            line.push_str(" (*)");
        }
        println!("{}", line);

        if collapsed || depth >= self.max_depth {
            return;
        }

        let deps = self.graph.deps(pkg);
        for (i, dep) in deps.iter().enumerate() {
            let last = i + 1 == deps.len();
            let (branch, next) = if last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };
            self.print(
                *dep,
                &format!("{}{}", indent, branch),
                &format!("{}{}", indent, next),
                depth + 1,
            );
        }
    }
}
