//! Workspace - the manifest tree rooted at one Berth.toml.
//!
//! Loading happens in two phases. First every manifest reachable through
//! path dependencies is read once and its package, targets and sub-package
//! edges are declared. Then, once the package graph is known to be acyclic,
//! target dependency edges are wired: libraries onto their dependencies'
//! libraries, tests onto everything.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::manifest::{Manifest, ManifestError};
use crate::core::platform::{Platform, PlatformLibSet};
use crate::core::{PackageId, PackageSet, TargetId};
use crate::resolver::PackageGraph;

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "Berth.toml";

/// Find the manifest in `dir`, without searching parents.
pub fn find_manifest(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(MANIFEST_NAME);
    path.is_file().then_some(path)
}

/// How manifests are turned into declarations.
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Platform link requirements are resolved for
    pub platform: Platform,

    /// Apply the platform library table to libraries that do not say
    pub platform_libs: bool,
}

impl LoadOptions {
    pub fn new(platform: Platform) -> Self {
        LoadOptions {
            platform,
            platform_libs: false,
        }
    }

    pub fn with_platform_libs(mut self, platform_libs: bool) -> Self {
        self.platform_libs = platform_libs;
        self
    }
}

/// Per-package bookkeeping between the two loading phases.
#[derive(Debug)]
struct Loaded {
    manifest_path: PathBuf,
    lib: Option<TargetId>,
    tests: Vec<TargetId>,
    regular_deps: Vec<PackageId>,
}

struct Loader {
    options: LoadOptions,
    set: PackageSet,
    by_dir: HashMap<PathBuf, PackageId>,
    loaded: HashMap<PackageId, Loaded>,
}

impl Loader {
    /// Load the package whose `Berth.toml` lives in `dir`.
    fn load_dir(&mut self, dir: &Path) -> Result<PackageId> {
        let dir = dir
            .canonicalize()
            .with_context(|| format!("failed to resolve package directory: {}", dir.display()))?;
        if let Some(&id) = self.by_dir.get(&dir) {
            return Ok(id);
        }

        let manifest_path = dir.join(MANIFEST_NAME);
        self.load_manifest(dir, manifest_path)
    }

    /// Load the manifest at `manifest_path` as the package for `dir`.
    ///
    /// `dir` must be canonical; it keys the package for later dependents.
    fn load_manifest(&mut self, dir: PathBuf, manifest_path: PathBuf) -> Result<PackageId> {
        tracing::debug!("loading {}", manifest_path.display());
        let manifest = Manifest::load(&manifest_path)?;

        let pkg = self
            .set
            .new_package(manifest.name())
            .with_context(|| format!("in manifest {}", manifest_path.display()))?;
        self.by_dir.insert(dir.clone(), pkg);

        let lib = self
            .declare_lib(pkg, &manifest)
            .with_context(|| format!("in manifest {}", manifest_path.display()))?;

        let mut tests = Vec::new();
        for (index, test) in manifest.tests.iter().enumerate() {
            let root = test.root.as_deref().unwrap_or(manifest.default_root());
            let id = self
                .set
                .setup_test_target(manifest.test_name(index), root)
                .with_context(|| format!("in manifest {}", manifest_path.display()))?;
            tests.push(id);
        }

        let mut regular_deps = Vec::new();
        for (key, spec) in manifest.all_dependencies() {
            let dep_dir = dir.join(&spec.path);
            let known = dep_dir
                .canonicalize()
                .ok()
                .and_then(|d| self.by_dir.get(&d).copied());

            let dep = match known {
                Some(id) => id,
                None if find_manifest(&dep_dir).is_none() => {
                    return Err(ManifestError::DependencyNotFound {
                        package: manifest.name().to_string(),
                        dependency: key.to_string(),
                        path: dep_dir.join(MANIFEST_NAME),
                    }
                    .into());
                }
                None => self.load_dir(&dep_dir)?,
            };
            let found = self.set.package(dep).name();
            if found != key {
                return Err(ManifestError::NameMismatch {
                    package: manifest.name().to_string(),
                    key: key.to_string(),
                    found: found.to_string(),
                }
                .into());
            }

            self.set.add_package(pkg, dep);
            if manifest.dependencies.iter().any(|(name, _)| name == key) {
                regular_deps.push(dep);
            }
        }

        self.loaded.insert(
            pkg,
            Loaded {
                manifest_path,
                lib,
                tests,
                regular_deps,
            },
        );
        Ok(pkg)
    }

    fn declare_lib(&mut self, pkg: PackageId, manifest: &Manifest) -> Result<Option<TargetId>> {
        let (Some(lib), Some(name)) = (manifest.lib.as_ref(), manifest.lib_name()) else {
            return Ok(None);
        };

        let platform = self.options.platform;
        let mut links = if lib.platform_libs.unwrap_or(self.options.platform_libs) {
            PlatformLibSet::resolve(platform)
        } else {
            Vec::new()
        };
        links.extend(lib.links.iter().filter(|req| req.applies_to(platform)).cloned());

        let root = lib.root.as_deref().unwrap_or(manifest.default_root());
        let id = self.set.setup_lib_target_with_links(name, root, links)?;
        self.set.add_main_lib(pkg, id)?;
        Ok(Some(id))
    }

    /// Second phase: target edges. Runs after the package graph checked out.
    fn wire(&mut self) -> Result<()> {
        let mut ids: Vec<_> = self.loaded.keys().copied().collect();
        ids.sort();

        for pkg in ids {
            let loaded = &self.loaded[&pkg];
            let path = loaded.manifest_path.clone();

            if let Some(lib) = loaded.lib {
                for &dep in &loaded.regular_deps {
                    let dep_lib = self
                        .set
                        .main_lib(dep)
                        .with_context(|| format!("in manifest {}", path.display()))?;
                    self.set
                        .add_dependency(lib, dep_lib)
                        .with_context(|| format!("in manifest {}", path.display()))?;
                }
            }

            for &test in &loaded.tests {
                self.set
                    .wire_unittest(pkg, test)
                    .with_context(|| format!("in manifest {}", path.display()))?;
            }
        }
        Ok(())
    }
}

/// A loaded manifest tree.
#[derive(Debug)]
pub struct Workspace {
    root_dir: PathBuf,
    platform: Platform,
    packages: PackageSet,
    root: PackageId,
    manifests: HashMap<PackageId, PathBuf>,
}

impl Workspace {
    /// Load the manifest at `manifest_path` and everything it depends on.
    ///
    /// The root is read from `manifest_path` whatever its file name; path
    /// dependencies are read from `<dir>/Berth.toml`.
    pub fn load(manifest_path: &Path, options: LoadOptions) -> Result<Self> {
        let canonical = manifest_path
            .canonicalize()
            .with_context(|| format!("failed to read manifest: {}", manifest_path.display()))?;
        let root_dir = canonical
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let mut loader = Loader {
            options,
            set: PackageSet::new(),
            by_dir: HashMap::new(),
            loaded: HashMap::new(),
        };
        let root = loader.load_manifest(root_dir.clone(), canonical)?;

        PackageGraph::build(&loader.set, root)?;
        loader.wire()?;

        let manifests = loader
            .loaded
            .into_iter()
            .map(|(id, loaded)| (id, loaded.manifest_path))
            .collect();

        tracing::debug!("loaded {} manifest(s)", loader.set.len());

        Ok(Workspace {
            root_dir,
            platform: options.platform,
            packages: loader.set,
            root,
            manifests,
        })
    }

    /// Directory of the root manifest.
    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    pub fn root_package_id(&self) -> PackageId {
        self.root
    }

    /// Platform the declarations were resolved for.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn packages(&self) -> &PackageSet {
        &self.packages
    }

    /// Manifest path a package was declared in.
    pub fn manifest_path(&self, pkg: PackageId) -> Option<&Path> {
        self.manifests.get(&pkg).map(PathBuf::as_path)
    }

    /// Resolve the package graph from the root.
    pub fn graph(&self) -> Result<PackageGraph<'_>> {
        Ok(PackageGraph::build(&self.packages, self.root)?)
    }
}
