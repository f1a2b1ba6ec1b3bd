//! Generation plan.
//!
//! A GenerationPlan is the serializable form of a resolved package graph:
//! what a build-file generator consumes. Packages appear in flattened graph
//! order, dependencies first.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::{Platform, PlatformLibRequirement, TargetId, TargetKind};
use crate::resolver::PackageGraph;

/// A complete generation plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationPlan {
    /// Platform link requirements were materialized for
    pub platform: Platform,

    /// Name of the root package
    pub root: String,

    /// Packages, dependencies before dependents
    pub packages: Vec<PackagePlan>,
}

/// One package in the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackagePlan {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_lib: Option<TargetPlan>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tests: Vec<TargetPlan>,

    /// Names of the packages this one depends on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

/// One target in the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetPlan {
    pub name: String,
    pub kind: TargetKind,
    pub root: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<PlatformLibRequirement>,

    /// `<package>/<target>` references
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

impl GenerationPlan {
    /// Build a plan from a resolved graph.
    pub fn new(graph: &PackageGraph<'_>, platform: Platform) -> Self {
        let packages = graph
            .packages()
            .iter()
            .map(|&pkg| {
                let package = graph.package(pkg);
                PackagePlan {
                    name: package.name().to_string(),
                    main_lib: package
                        .main_lib()
                        .map(|t| target_plan(graph, t, platform)),
                    tests: package
                        .test_targets()
                        .iter()
                        .map(|&t| target_plan(graph, t, platform))
                        .collect(),
                    dependencies: graph
                        .deps(pkg)
                        .into_iter()
                        .map(|d| graph.package(d).name().to_string())
                        .collect(),
                }
            })
            .collect();

        GenerationPlan {
            platform,
            root: graph.package(graph.root()).name().to_string(),
            packages,
        }
    }

    /// Find a package by name.
    pub fn package(&self, name: &str) -> Option<&PackagePlan> {
        self.packages.iter().find(|p| p.name == name)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn target_ref(graph: &PackageGraph<'_>, target: TargetId) -> String {
    let name = graph.target(target).name();
    match graph.owner(target) {
        Some(owner) => format!("{}/{}", graph.package(owner).name(), name),
        None => name.to_string(),
    }
}

fn target_plan(graph: &PackageGraph<'_>, target: TargetId, platform: Platform) -> TargetPlan {
    let t = graph.target(target);
    TargetPlan {
        name: t.name().to_string(),
        kind: t.kind(),
        root: t.root_path().to_string(),
        links: t.links_for(platform).cloned().collect(),
        depends_on: t
            .depends_on()
            .iter()
            .map(|&dep| target_ref(graph, dep))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PackageSet, PlatformLibSet};

    fn chash() -> (PackageSet, crate::core::PackageId) {
        let mut set = PackageSet::new();

        let unit = set.new_package("cunittest").unwrap();
        let unit_lib = set.setup_lib_target("cunittest", "cunittest").unwrap();
        set.add_main_lib(unit, unit_lib).unwrap();

        let base = set.new_package("cbase").unwrap();
        let base_lib = set
            .setup_lib_target_with_links("cbase", "cbase", PlatformLibSet::resolve(Platform::Windows))
            .unwrap();
        set.add_main_lib(base, base_lib).unwrap();

        let hash = set.new_package("chash").unwrap();
        set.add_package(hash, unit);
        set.add_package(hash, base);
        let lib = set.setup_lib_target("chash", "github.com/jurgen-kluft/chash").unwrap();
        set.add_dependency(lib, base_lib).unwrap();
        set.add_main_lib(hash, lib).unwrap();
        let test = set.setup_test_target("chash_test", "github.com/jurgen-kluft/chash").unwrap();
        set.wire_unittest(hash, test).unwrap();

        (set, hash)
    }

    #[test]
    fn test_plan_follows_graph_order() {
        let (set, root) = chash();
        let graph = PackageGraph::build(&set, root).unwrap();
        let plan = GenerationPlan::new(&graph, Platform::Windows);

        let names: Vec<_> = plan.packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["cunittest", "cbase", "chash"]);
        assert_eq!(plan.root, "chash");

        let chash = plan.package("chash").unwrap();
        assert_eq!(chash.dependencies, vec!["cunittest", "cbase"]);
        assert_eq!(chash.main_lib.as_ref().unwrap().depends_on, vec!["cbase/cbase"]);
        assert_eq!(
            chash.tests[0].depends_on,
            vec!["cunittest/cunittest", "cbase/cbase", "chash/chash"]
        );
        assert_eq!(chash.tests[0].kind, TargetKind::TestExecutable);

        let cbase = plan.package("cbase").unwrap();
        assert_eq!(cbase.main_lib.as_ref().unwrap().links[0].files.len(), 5);
    }

    #[test]
    fn test_plan_drops_links_for_other_platforms() {
        let (set, root) = chash();
        let graph = PackageGraph::build(&set, root).unwrap();
        let plan = GenerationPlan::new(&graph, Platform::Linux);

        let cbase = plan.package("cbase").unwrap();
        assert!(cbase.main_lib.as_ref().unwrap().links.is_empty());
    }

    #[test]
    fn test_plan_json_shape() {
        let (set, root) = chash();
        let graph = PackageGraph::build(&set, root).unwrap();
        let plan = GenerationPlan::new(&graph, Platform::Windows);

        let json = plan.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["platform"], "windows");
        assert_eq!(value["packages"][1]["main_lib"]["links"][0]["kind"], "systemlibrary");
        assert_eq!(value["packages"][2]["tests"][0]["kind"], "test");

        let back: GenerationPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan);
    }
}
