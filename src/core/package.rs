//! Package - a named unit owning a main library and its tests.

use std::fmt;

use crate::core::target::TargetId;

/// Handle to a package stored in a [`PackageSet`](crate::core::PackageSet).
///
/// Only valid for the set that issued it, like [`TargetId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId(pub(crate) usize);

/// A declared package.
///
/// Sub-packages are dependency declarations only. The package set owns every
/// package; this one just names the ones it needs.
#[derive(Debug, Clone)]
pub struct Package {
    pub(crate) name: String,
    pub(crate) main_lib: Option<TargetId>,
    pub(crate) test_targets: Vec<TargetId>,
    pub(crate) sub_packages: Vec<PackageId>,
}

impl Package {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Package {
            name: name.into(),
            main_lib: None,
            test_targets: Vec::new(),
            sub_packages: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The main library, if one has been declared.
    pub fn main_lib(&self) -> Option<TargetId> {
        self.main_lib
    }

    /// Test targets in declaration order.
    pub fn test_targets(&self) -> &[TargetId] {
        &self.test_targets
    }

    /// Packages this one depends on, in declaration order.
    pub fn sub_packages(&self) -> &[PackageId] {
        &self.sub_packages
    }

    /// All targets: the main library first, then tests.
    pub fn targets(&self) -> impl Iterator<Item = TargetId> + '_ {
        self.main_lib.into_iter().chain(self.test_targets.iter().copied())
    }

    /// A package with neither a main library nor tests.
    pub fn is_hollow(&self) -> bool {
        self.main_lib.is_none() && self.test_targets.is_empty()
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
