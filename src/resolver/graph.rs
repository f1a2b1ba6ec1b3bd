//! PackageGraph - the flattened, deduplicated closure of a root package.
//!
//! Once built, a PackageGraph is read-only: it holds a shared borrow of the
//! PackageSet it was built from.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::core::errors::{DescriptorError, DescriptorResult};
use crate::core::{Package, PackageId, PackageSet, Platform, PlatformLibRequirement, Target, TargetId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// A resolved package graph.
#[derive(Debug)]
pub struct PackageGraph<'a> {
    set: &'a PackageSet,
    root: PackageId,

    /// Dependencies before dependents.
    order: Vec<PackageId>,

    /// Edge a -> b means "a depends on b".
    graph: DiGraph<PackageId, ()>,
    nodes: HashMap<PackageId, NodeIndex>,
}

struct Walker<'a> {
    set: &'a PackageSet,
    marks: HashMap<PackageId, Mark>,
    path: Vec<PackageId>,
    order: Vec<PackageId>,
}

impl Walker<'_> {
    fn visit(&mut self, pkg: PackageId) -> DescriptorResult<()> {
        match self.marks.get(&pkg) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::InProgress) => return Err(self.cycle(pkg)),
            None => {}
        }

        self.marks.insert(pkg, Mark::InProgress);
        self.path.push(pkg);

        let set = self.set;
        let package = set.package(pkg);
        if package.is_hollow() {
            tracing::debug!("package `{}` declares no targets", package.name());
        }

        for &dep in package.sub_packages() {
            self.visit(dep)?;
        }

        self.path.pop();
        self.marks.insert(pkg, Mark::Done);
        self.order.push(pkg);
        Ok(())
    }

    fn cycle(&self, entry: PackageId) -> DescriptorError {
        let start = self.path.iter().position(|&p| p == entry).unwrap_or(0);
        let mut cycle: Vec<String> = self.path[start..]
            .iter()
            .map(|&p| self.set.package(p).name().to_string())
            .collect();
        cycle.push(self.set.package(entry).name().to_string());

        DescriptorError::CyclicPackage {
            package: self.set.package(entry).name().to_string(),
            cycle,
        }
    }
}

impl<'a> PackageGraph<'a> {
    /// Walk the declarations reachable from `root`.
    ///
    /// Fails on package cycles and on two distinct packages sharing a name.
    /// Packages without a main library are accepted here; `main_lib` reports
    /// them when a consumer needs one.
    pub fn build(set: &'a PackageSet, root: PackageId) -> DescriptorResult<Self> {
        let mut walker = Walker {
            set,
            marks: HashMap::new(),
            path: Vec::new(),
            order: Vec::new(),
        };
        walker.visit(root)?;
        let order = walker.order;

        let mut names = HashSet::new();
        for &pkg in &order {
            let name = set.package(pkg).name();
            if !names.insert(name) {
                return Err(DescriptorError::DuplicatePackage {
                    name: name.to_string(),
                });
            }
        }

        let mut graph = DiGraph::new();
        let mut nodes = HashMap::new();
        for &pkg in &order {
            nodes.insert(pkg, graph.add_node(pkg));
        }
        for &pkg in &order {
            for dep in set.package(pkg).sub_packages() {
                graph.add_edge(nodes[&pkg], nodes[dep], ());
            }
        }

        tracing::debug!(
            "resolved {} package(s) from `{}`",
            order.len(),
            set.package(root).name()
        );

        Ok(PackageGraph {
            set,
            root,
            order,
            graph,
            nodes,
        })
    }

    pub fn root(&self) -> PackageId {
        self.root
    }

    /// The declarations this graph was built from.
    pub fn package_set(&self) -> &'a PackageSet {
        self.set
    }

    /// Packages in flattened order: every dependency before its dependents,
    /// the root last.
    pub fn packages(&self) -> &[PackageId] {
        &self.order
    }

    /// Names in flattened order.
    pub fn names(&self) -> Vec<&'a str> {
        self.order.iter().map(|&p| self.set.package(p).name()).collect()
    }

    pub fn package(&self, id: PackageId) -> &'a Package {
        self.set.package(id)
    }

    pub fn target(&self, id: TargetId) -> &'a Target {
        self.set.target(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, pkg: PackageId) -> bool {
        self.nodes.contains_key(&pkg)
    }

    /// Find a package in the graph by name.
    pub fn find(&self, name: &str) -> Option<PackageId> {
        self.order
            .iter()
            .copied()
            .find(|&p| self.set.package(p).name() == name)
    }

    /// Direct dependencies in declaration order.
    pub fn deps(&self, pkg: PackageId) -> Vec<PackageId> {
        if self.contains(pkg) {
            self.set.package(pkg).sub_packages().to_vec()
        } else {
            Vec::new()
        }
    }

    /// Packages in the graph that depend directly on `pkg`.
    pub fn dependents(&self, pkg: PackageId) -> Vec<PackageId> {
        match self.nodes.get(&pkg) {
            Some(&node) => {
                let mut out: Vec<_> = self
                    .graph
                    .neighbors_directed(node, Direction::Incoming)
                    .map(|n| self.graph[n])
                    .collect();
                out.sort_by_key(|p| self.position(*p));
                out
            }
            None => Vec::new(),
        }
    }

    fn position(&self, pkg: PackageId) -> usize {
        self.order.iter().position(|&p| p == pkg).unwrap_or(usize::MAX)
    }

    /// All packages `pkg` depends on directly or indirectly, in flattened order.
    pub fn transitive_deps(&self, pkg: PackageId) -> Vec<PackageId> {
        let mut visited = HashSet::new();
        let mut stack = self.deps(pkg);

        while let Some(current) = stack.pop() {
            if visited.insert(current) {
                stack.extend(self.deps(current));
            }
        }

        self.order
            .iter()
            .copied()
            .filter(|p| visited.contains(p))
            .collect()
    }

    /// The package's main library, or `MissingMainLib` naming the package.
    pub fn main_lib(&self, pkg: PackageId) -> DescriptorResult<&'a Target> {
        self.set.main_lib(pkg).map(|id| self.set.target(id))
    }

    /// Main library first, then tests.
    pub fn targets(&self, pkg: PackageId) -> Vec<TargetId> {
        self.set.package(pkg).targets().collect()
    }

    /// Link requirements of `target` materialized for `platform`.
    pub fn links_for(&self, target: TargetId, platform: Platform) -> Vec<&'a PlatformLibRequirement> {
        self.set.target(target).links_for(platform).collect()
    }

    /// The package owning `target`, if any package in the graph declares it.
    pub fn owner(&self, target: TargetId) -> Option<PackageId> {
        self.order
            .iter()
            .copied()
            .find(|&p| self.set.package(p).targets().any(|t| t == target))
    }
}
