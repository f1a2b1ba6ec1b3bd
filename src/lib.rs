//! Berth - package and target descriptors for build-file generation
//!
//! This crate provides the core library functionality for Berth: declaring
//! packages and their library and test targets, wiring the dependency edges
//! between them, resolving the package graph and emitting a generation plan.

pub mod core;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test utilities for Berth unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// provides builders for manifest trees on disk.
#[cfg(test)]
pub mod test_support;

pub use core::{
    errors::DescriptorError, manifest::Manifest, package::Package, package::PackageId,
    package_set::PackageSet, platform::Platform, platform::PlatformLibSet, target::Target,
    target::TargetId, target::TargetKind, workspace::Workspace,
};

pub use ops::GenerationPlan;
pub use resolver::PackageGraph;
pub use util::context::GlobalContext;
