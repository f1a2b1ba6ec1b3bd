//! Target definitions - what a package declares for the generator.
//!
//! A Target is a single buildable unit: the package's library or one of its
//! test executables.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::platform::{Platform, PlatformLibRequirement};

/// Handle to a target stored in a [`PackageSet`](crate::core::PackageSet).
///
/// A handle is only meaningful for the set that issued it. Passing it to
/// another set is a caller bug and panics when out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub(crate) usize);

/// The kind of target being declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Library (the package's main lib)
    #[serde(alias = "lib")]
    Library,

    /// Unit test executable
    #[serde(rename = "test", alias = "unittest")]
    TestExecutable,
}

impl TargetKind {
    pub fn is_library(&self) -> bool {
        matches!(self, TargetKind::Library)
    }

    pub fn is_test(&self) -> bool {
        matches!(self, TargetKind::TestExecutable)
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Library => f.write_str("library"),
            TargetKind::TestExecutable => f.write_str("test executable"),
        }
    }
}

/// A declared target.
///
/// `depends_on` holds handles, not owned targets: a library is usually
/// depended on by several tests and libraries.
#[derive(Debug, Clone)]
pub struct Target {
    pub(crate) name: String,
    pub(crate) kind: TargetKind,
    pub(crate) root_path: String,
    pub(crate) links: Vec<PlatformLibRequirement>,
    pub(crate) depends_on: Vec<TargetId>,
}

impl Target {
    pub(crate) fn new(
        name: impl Into<String>,
        kind: TargetKind,
        root_path: impl Into<String>,
        links: Vec<PlatformLibRequirement>,
    ) -> Self {
        Target {
            name: name.into(),
            kind,
            root_path: root_path.into(),
            links,
            depends_on: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    /// Source root identifier, opaque to the resolver.
    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    /// Link requirements in declaration order.
    pub fn links(&self) -> &[PlatformLibRequirement] {
        &self.links
    }

    /// Link requirements that apply on `platform`.
    pub fn links_for(&self, platform: Platform) -> impl Iterator<Item = &PlatformLibRequirement> {
        self.links.iter().filter(move |req| req.applies_to(platform))
    }

    /// Direct dependencies in insertion order.
    pub fn depends_on(&self) -> &[TargetId] {
        &self.depends_on
    }

    pub fn is_library(&self) -> bool {
        self.kind.is_library()
    }

    pub fn is_test(&self) -> bool {
        self.kind.is_test()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::PlatformScope;

    #[test]
    fn test_target_kind_serde_names() {
        let kind: TargetKind = serde_json::from_str("\"lib\"").unwrap();
        assert_eq!(kind, TargetKind::Library);

        let kind: TargetKind = serde_json::from_str("\"test\"").unwrap();
        assert_eq!(kind, TargetKind::TestExecutable);
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"test\"");
    }

    #[test]
    fn test_links_for_filters_by_platform() {
        let target = Target::new(
            "gfx",
            TargetKind::Library,
            "gfx",
            vec![
                PlatformLibRequirement::system(PlatformScope::Linux, ["X11"]),
                PlatformLibRequirement::framework(PlatformScope::MacOS, ["Metal"]),
                PlatformLibRequirement::system(PlatformScope::All, ["m"]),
            ],
        );

        let linux: Vec<_> = target.links_for(Platform::Linux).collect();
        assert_eq!(linux.len(), 2);
        assert_eq!(linux[0].files, vec!["X11"]);
        assert_eq!(linux[1].files, vec!["m"]);
        assert_eq!(target.to_string(), "gfx (library)");
    }
}
