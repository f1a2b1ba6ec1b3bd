//! Core data structures for Berth.
//!
//! This module contains the descriptor model:
//! - Platforms and platform link requirements
//! - Targets and packages
//! - The package set arena they are declared in
//! - Manifests, the on-disk form of a package declaration

pub mod errors;
pub mod manifest;
pub mod package;
pub mod package_set;
pub mod platform;
pub mod target;
pub mod workspace;

pub use errors::{DescriptorError, DescriptorResult};
pub use manifest::{Manifest, ManifestError};
pub use package::{Package, PackageId};
pub use package_set::PackageSet;
pub use platform::{Platform, PlatformLibRequirement, PlatformLibSet, PlatformScope, RequirementKind};
pub use target::{Target, TargetId, TargetKind};
pub use workspace::{find_manifest, LoadOptions, Workspace, MANIFEST_NAME};
