//! Descriptor and graph error types.

use thiserror::Error;

use crate::core::target::TargetKind;
use crate::util::diagnostic::Diagnostic;

/// Structural error in package or target declarations.
///
/// Every variant names the package or target it is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("invalid {what} name `{name}`")]
    InvalidName { what: &'static str, name: String },

    #[error("adding `{dependency}` as a dependency of `{target}` would create a cycle")]
    CyclicDependency { target: String, dependency: String },

    #[error("cycle detected in package graph at `{package}`")]
    CyclicPackage { package: String, cycle: Vec<String> },

    #[error("package `{package}` has no main library")]
    MissingMainLib { package: String },

    #[error("target `{target}` is a {found}, expected a {expected}")]
    WrongTargetKind {
        target: String,
        expected: TargetKind,
        found: TargetKind,
    },

    #[error("package `{package}` already has a target named `{target}`")]
    DuplicateTarget { package: String, target: String },

    #[error("more than one package named `{name}` in the graph")]
    DuplicatePackage { name: String },
}

pub type DescriptorResult<T> = Result<T, DescriptorError>;

impl DescriptorError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            DescriptorError::InvalidName { what, name } => {
                Diagnostic::error(format!("invalid {} name `{}`", what, name))
                    .with_suggestion(format!("Give the {} a non-empty name", what))
            }

            DescriptorError::CyclicDependency { target, dependency } => Diagnostic::error(format!(
                "target `{}` cannot depend on `{}`",
                target, dependency
            ))
            .with_context(format!("`{}` already depends on `{}`", dependency, target))
            .with_suggestion("Move the shared code into a separate library target".to_string()),

            DescriptorError::CyclicPackage { package, cycle } => {
                let mut diag = Diagnostic::error("cycle detected in package graph");

                diag = diag.with_context(format!("cycle: {}", cycle.join(" -> ")));
                diag = diag.with_context(format!("entered at `{}`", package));

                diag.with_suggestion(
                    "Break the cycle by removing or restructuring dependencies".to_string(),
                )
            }

            DescriptorError::MissingMainLib { package } => {
                Diagnostic::error(format!("package `{}` has no main library", package))
                    .with_context(format!("a dependent of `{}` links against it", package))
                    .with_suggestion(format!("Add a [lib] section to `{}`", package))
                    .with_suggestion(format!(
                        "Move `{}` to [dev-dependencies] if only tests need it",
                        package
                    ))
            }

            DescriptorError::WrongTargetKind {
                target,
                expected,
                found,
            } => Diagnostic::error(format!(
                "target `{}` is a {}, expected a {}",
                target, found, expected
            )),

            DescriptorError::DuplicateTarget { package, target } => Diagnostic::error(format!(
                "duplicate target `{}` in package `{}`",
                target, package
            ))
            .with_suggestion("Rename one of the targets".to_string()),

            DescriptorError::DuplicatePackage { name } => {
                Diagnostic::error(format!("more than one package named `{}`", name))
                    .with_context("package names must be unique within a graph".to_string())
                    .with_suggestion(
                        "Point every dependency on this package at the same manifest".to_string(),
                    )
            }
        }
    }
}
