//! Berth.toml manifest parsing and schema.
//!
//! A manifest declares one package: its main library, its unit tests and the
//! packages it depends on. Dependencies are local paths to other manifests.

use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use miette::{NamedSource, SourceSpan};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::core::platform::PlatformLibRequirement;
use crate::util::diagnostic::ManifestParseError;

/// Manifest error that is not a syntax error.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not find `Berth.toml` in `{}` or any parent directory", .dir.display())]
    NotFound { dir: PathBuf },

    #[error("dependency `{key}` of `{package}` points at a manifest for `{found}`")]
    NameMismatch {
        package: String,
        key: String,
        found: String,
    },

    #[error("dependency `{dependency}` of `{package}` has no manifest at `{}`", .path.display())]
    DependencyNotFound {
        package: String,
        dependency: String,
        path: PathBuf,
    },

    #[error("a link requirement in `{package}` lists no files")]
    EmptyLinks { package: String },
}

/// The `[package]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageSection {
    pub name: String,

    /// Default source root for every target of the package
    #[serde(default)]
    pub root: Option<String>,
}

/// The `[lib]` section: the package's main library.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct LibSection {
    /// Target name (defaults to the package name)
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub root: Option<String>,

    /// Pre-populate links from the platform library table.
    /// Unset means "use the configured default".
    #[serde(default)]
    pub platform_libs: Option<bool>,

    /// Additional platform-scoped link requirements
    #[serde(default)]
    pub links: Vec<PlatformLibRequirement>,
}

/// A `[[test]]` entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestSection {
    /// Target name (defaults to `<package>_test`)
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub root: Option<String>,
}

/// Where a dependency's manifest lives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencySpec {
    pub path: PathBuf,
}

/// Dependencies in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyTable(pub Vec<(String, DependencySpec)>);

impl DependencyTable {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DependencySpec)> {
        self.0.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

struct DependencyTableVisitor(PhantomData<DependencyTable>);

impl<'de> Visitor<'de> for DependencyTableVisitor {
    type Value = DependencyTable;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a table of dependencies")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut deps = Vec::new();
        while let Some((name, spec)) = map.next_entry::<String, DependencySpec>()? {
            deps.push((name, spec));
        }
        Ok(DependencyTable(deps))
    }
}

impl<'de> Deserialize<'de> for DependencyTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DependencyTableVisitor(PhantomData))
    }
}

/// A parsed Berth.toml.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub package: PackageSection,

    #[serde(default)]
    pub lib: Option<LibSection>,

    #[serde(default, rename = "test")]
    pub tests: Vec<TestSection>,

    /// Linked into the main library and the tests
    #[serde(default)]
    pub dependencies: DependencyTable,

    /// Linked into the tests only
    #[serde(default, rename = "dev-dependencies")]
    pub dev_dependencies: DependencyTable,
}

impl Manifest {
    /// Load a manifest from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        let manifest = Self::parse(&contents, path)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Parse manifest text. `path` is only used for error reporting.
    pub fn parse(contents: &str, path: &Path) -> Result<Self, ManifestParseError> {
        toml::from_str(contents).map_err(|e| ManifestParseError {
            path: path.to_path_buf(),
            help: Some(e.message().to_string()),
            span: e.span().map(|r| SourceSpan::from(r.start..r.end)),
            src: NamedSource::new(path.display().to_string(), contents.to_string()),
        })
    }

    /// Check constraints the schema cannot express.
    pub fn validate(&self) -> Result<(), ManifestError> {
        let links = self.lib.iter().flat_map(|lib| lib.links.iter());
        for req in links {
            if req.files.is_empty() {
                return Err(ManifestError::EmptyLinks {
                    package: self.package.name.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.package.name
    }

    /// Source root shared by targets that do not set their own.
    pub fn default_root(&self) -> &str {
        self.package.root.as_deref().unwrap_or(&self.package.name)
    }

    /// Name of the main library target, if the manifest declares one.
    pub fn lib_name(&self) -> Option<&str> {
        self.lib
            .as_ref()
            .map(|lib| lib.name.as_deref().unwrap_or(&self.package.name))
    }

    /// Name of the test target at `index`.
    pub fn test_name(&self, index: usize) -> String {
        match self.tests.get(index).and_then(|t| t.name.clone()) {
            Some(name) => name,
            None => format!("{}_test", self.package.name),
        }
    }

    /// Regular dependencies first, then dev-dependencies.
    pub fn all_dependencies(&self) -> impl Iterator<Item = (&str, &DependencySpec)> {
        self.dependencies.iter().chain(self.dev_dependencies.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::{PlatformScope, RequirementKind};

    const CHASH: &str = r#"
[package]
name = "chash"
root = "github.com/jurgen-kluft/chash"

[lib]
platform-libs = true
links = [{ platform = "linux", kind = "system", files = ["pthread"] }]

[[test]]

[dependencies]
cbase = { path = "../cbase" }

[dev-dependencies]
cunittest = { path = "../cunittest" }
"#;

    #[test]
    fn test_parse_full_manifest() {
        let manifest = Manifest::parse(CHASH, Path::new("Berth.toml")).unwrap();
        manifest.validate().unwrap();

        assert_eq!(manifest.name(), "chash");
        assert_eq!(manifest.default_root(), "github.com/jurgen-kluft/chash");
        assert_eq!(manifest.lib_name(), Some("chash"));
        assert_eq!(manifest.test_name(0), "chash_test");

        let lib = manifest.lib.as_ref().unwrap();
        assert_eq!(lib.platform_libs, Some(true));
        assert_eq!(lib.links[0].platform, PlatformScope::Linux);
        assert_eq!(lib.links[0].kind, RequirementKind::SystemLibrary);

        let deps: Vec<_> = manifest.all_dependencies().map(|(n, _)| n).collect();
        assert_eq!(deps, vec!["cbase", "cunittest"]);
    }

    #[test]
    fn test_dependencies_keep_declaration_order() {
        let manifest = Manifest::parse(
            r#"
[package]
name = "app"

[dependencies]
zlib = { path = "../zlib" }
alpha = { path = "../alpha" }
mid = { path = "../mid" }
"#,
            Path::new("Berth.toml"),
        )
        .unwrap();

        let names: Vec<_> = manifest.dependencies.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["zlib", "alpha", "mid"]);
        assert_eq!(manifest.lib_name(), None);
    }

    #[test]
    fn test_unknown_key_reports_span() {
        let err = Manifest::parse(
            "[package]\nname = \"app\"\nversion = \"1.0\"\n",
            Path::new("Berth.toml"),
        )
        .unwrap_err();

        assert!(err.span.is_some());
        assert!(err.help.as_deref().unwrap_or_default().contains("version"));
    }

    #[test]
    fn test_empty_links_rejected() {
        let manifest = Manifest::parse(
            r#"
[package]
name = "gfx"

[lib]
links = [{ platform = "all", kind = "framework", files = [] }]
"#,
            Path::new("Berth.toml"),
        )
        .unwrap();

        assert!(matches!(
            manifest.validate(),
            Err(ManifestError::EmptyLinks { .. })
        ));
    }
}
