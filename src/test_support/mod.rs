//! Test utilities for Berth unit tests.
//!
//! Fixtures write manifest trees into temporary directories so loading can
//! be tested against the real filesystem.

pub mod fixtures;

pub use fixtures::*;
