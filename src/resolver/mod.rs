//! Package graph resolution.
//!
//! Resolution is pure: all manifest I/O and platform detection happen before
//! a graph is built from a [`PackageSet`](crate::core::PackageSet).

pub mod graph;

pub use graph::PackageGraph;
