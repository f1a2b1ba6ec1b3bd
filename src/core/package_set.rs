//! PackageSet - the arena every package and target of a run lives in.
//!
//! Packages and targets are referenced by handle. A dependency shared by many
//! packages is constructed once and its handle passed around, so two
//! dependents naming the same package always name the identical one.

use petgraph::algo::has_path_connecting;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::core::errors::{DescriptorError, DescriptorResult};
use crate::core::package::{Package, PackageId};
use crate::core::platform::PlatformLibRequirement;
use crate::core::target::{Target, TargetId, TargetKind};

/// All packages and targets declared during one generation run.
///
/// # Panics
///
/// Methods taking a [`PackageId`] or [`TargetId`] panic when the handle was
/// issued by a different set and is out of range here.
#[derive(Debug, Default)]
pub struct PackageSet {
    packages: Vec<Package>,
    targets: Vec<Target>,

    /// Target dependency edges (target -> dependency). Node index == target index.
    target_graph: DiGraph<TargetId, ()>,
}

fn validate_name(what: &'static str, name: &str) -> DescriptorResult<()> {
    if name.trim().is_empty() {
        return Err(DescriptorError::InvalidName {
            what,
            name: name.to_string(),
        });
    }
    Ok(())
}

impl PackageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a new, empty package.
    pub fn new_package(&mut self, name: impl Into<String>) -> DescriptorResult<PackageId> {
        let name = name.into();
        validate_name("package", &name)?;

        let id = PackageId(self.packages.len());
        tracing::debug!("declared package `{}`", name);
        self.packages.push(Package::new(name));
        Ok(id)
    }

    fn new_target(
        &mut self,
        name: String,
        kind: TargetKind,
        root_path: String,
        links: Vec<PlatformLibRequirement>,
    ) -> DescriptorResult<TargetId> {
        validate_name("target", &name)?;

        let id = TargetId(self.targets.len());
        let node = self.target_graph.add_node(id);
        debug_assert_eq!(node.index(), id.0);

        self.targets.push(Target::new(name, kind, root_path, links));
        Ok(id)
    }

    /// Create a library target with no platform links.
    pub fn setup_lib_target(
        &mut self,
        name: impl Into<String>,
        root_path: impl Into<String>,
    ) -> DescriptorResult<TargetId> {
        self.setup_lib_target_with_links(name, root_path, Vec::new())
    }

    /// Create a library target whose links are the already-resolved
    /// `platform_libs`.
    pub fn setup_lib_target_with_links(
        &mut self,
        name: impl Into<String>,
        root_path: impl Into<String>,
        platform_libs: Vec<PlatformLibRequirement>,
    ) -> DescriptorResult<TargetId> {
        self.new_target(name.into(), TargetKind::Library, root_path.into(), platform_libs)
    }

    /// Create a unit test executable target.
    pub fn setup_test_target(
        &mut self,
        name: impl Into<String>,
        root_path: impl Into<String>,
    ) -> DescriptorResult<TargetId> {
        self.new_target(
            name.into(),
            TargetKind::TestExecutable,
            root_path.into(),
            Vec::new(),
        )
    }

    fn check_kind(&self, target: TargetId, expected: TargetKind) -> DescriptorResult<()> {
        let found = self.targets[target.0].kind;
        if found != expected {
            return Err(DescriptorError::WrongTargetKind {
                target: self.targets[target.0].name.clone(),
                expected,
                found,
            });
        }
        Ok(())
    }

    fn check_unique_name<'a>(
        &self,
        package: PackageId,
        target: TargetId,
        others: impl IntoIterator<Item = &'a TargetId>,
    ) -> DescriptorResult<()> {
        let name = &self.targets[target.0].name;
        let clash = others
            .into_iter()
            .any(|&other| other != target && &self.targets[other.0].name == name);

        if clash {
            return Err(DescriptorError::DuplicateTarget {
                package: self.packages[package.0].name.clone(),
                target: name.clone(),
            });
        }
        Ok(())
    }

    /// Set the package's main library. A previous main library is replaced.
    pub fn add_main_lib(&mut self, package: PackageId, target: TargetId) -> DescriptorResult<()> {
        self.check_kind(target, TargetKind::Library)?;
        self.check_unique_name(package, target, &self.packages[package.0].test_targets)?;

        let pkg = &mut self.packages[package.0];
        if let Some(previous) = pkg.main_lib.replace(target) {
            if previous != target {
                tracing::debug!(
                    "main library of `{}` replaced by `{}`",
                    pkg.name,
                    self.targets[target.0].name
                );
            }
        }
        Ok(())
    }

    /// Append a unit test target to the package.
    pub fn add_unittest(&mut self, package: PackageId, target: TargetId) -> DescriptorResult<()> {
        self.check_kind(target, TargetKind::TestExecutable)?;

        let pkg = &self.packages[package.0];
        if pkg.test_targets.contains(&target) {
            return Ok(());
        }
        self.check_unique_name(package, target, pkg.main_lib.iter().chain(&pkg.test_targets))?;

        self.packages[package.0].test_targets.push(target);
        Ok(())
    }

    /// Declare that `package` depends on `dependency`. Repeats are ignored.
    pub fn add_package(&mut self, package: PackageId, dependency: PackageId) {
        let pkg = &mut self.packages[package.0];
        if !pkg.sub_packages.contains(&dependency) {
            pkg.sub_packages.push(dependency);
        }
    }

    fn would_cycle(&self, target: TargetId, dependency: TargetId) -> bool {
        has_path_connecting(
            &self.target_graph,
            NodeIndex::new(dependency.0),
            NodeIndex::new(target.0),
            None,
        )
    }

    fn cycle_error(&self, target: TargetId, dependency: TargetId) -> DescriptorError {
        DescriptorError::CyclicDependency {
            target: self.targets[target.0].name.clone(),
            dependency: self.targets[dependency.0].name.clone(),
        }
    }

    /// Make `target` depend on `dependency`.
    ///
    /// Fails without modifying anything if `dependency` is `target` or
    /// already reaches it.
    pub fn add_dependency(&mut self, target: TargetId, dependency: TargetId) -> DescriptorResult<()> {
        if self.targets[target.0].depends_on.contains(&dependency) {
            return Ok(());
        }
        if self.would_cycle(target, dependency) {
            return Err(self.cycle_error(target, dependency));
        }

        self.target_graph
            .add_edge(NodeIndex::new(target.0), NodeIndex::new(dependency.0), ());
        self.targets[target.0].depends_on.push(dependency);
        Ok(())
    }

    /// The package's main library.
    pub fn main_lib(&self, package: PackageId) -> DescriptorResult<TargetId> {
        let pkg = &self.packages[package.0];
        pkg.main_lib.ok_or_else(|| DescriptorError::MissingMainLib {
            package: pkg.name.clone(),
        })
    }

    /// Register `test` with `package` and make it depend on the main library
    /// of every sub-package, then on the package's own main library.
    ///
    /// Every sub-package must have a main library. Nothing is modified when
    /// any of them lacks one or an edge would create a cycle.
    pub fn wire_unittest(&mut self, package: PackageId, test: TargetId) -> DescriptorResult<()> {
        self.check_kind(test, TargetKind::TestExecutable)?;

        let mut deps = self.packages[package.0]
            .sub_packages
            .iter()
            .map(|&dep| self.main_lib(dep))
            .collect::<DescriptorResult<Vec<_>>>()?;
        deps.extend(self.packages[package.0].main_lib);

        if let Some(&cyclic) = deps.iter().find(|&&dep| self.would_cycle(test, dep)) {
            return Err(self.cycle_error(test, cyclic));
        }

        self.add_unittest(package, test)?;
        for dep in deps {
            self.add_dependency(test, dep)?;
        }
        Ok(())
    }

    pub fn package(&self, id: PackageId) -> &Package {
        &self.packages[id.0]
    }

    pub fn target(&self, id: TargetId) -> &Target {
        &self.targets[id.0]
    }

    /// Look up a package by name. Returns the first declared match.
    pub fn find_package(&self, name: &str) -> Option<PackageId> {
        self.packages
            .iter()
            .position(|p| p.name == name)
            .map(PackageId)
    }

    /// Every target reachable from `target` through `depends_on`, excluding
    /// `target` itself, in depth-first discovery order.
    pub fn transitive_target_deps(&self, target: TargetId) -> Vec<TargetId> {
        let mut seen = vec![target];
        let mut stack: Vec<TargetId> = self.targets[target.0].depends_on.iter().rev().copied().collect();
        let mut out = Vec::new();

        while let Some(current) = stack.pop() {
            if seen.contains(&current) {
                continue;
            }
            seen.push(current);
            out.push(current);
            stack.extend(self.targets[current.0].depends_on.iter().rev().copied());
        }

        out
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}
