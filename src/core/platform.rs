//! Host platforms and platform-scoped link requirements.
//!
//! The platform is identified once per run and threaded through manifest
//! construction as plain data. `PlatformLibSet` is the table that maps a
//! resolved platform to the system libraries and frameworks a library
//! target must declare.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A host platform as reported by platform identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    #[serde(alias = "darwin", alias = "osx")]
    MacOS,
    Linux,
    Other,
}

impl Platform {
    /// Identify the platform this binary was compiled for.
    pub fn host() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an OS identifier (as in `std::env::consts::OS`) to a platform.
    ///
    /// Unknown identifiers map to `Other` rather than failing.
    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => Platform::Windows,
            "macos" => Platform::MacOS,
            "linux" => Platform::Linux,
            _ => Platform::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::MacOS => "macos",
            Platform::Linux => "linux",
            Platform::Other => "other",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "windows" | "win" => Ok(Platform::Windows),
            "macos" | "darwin" | "osx" => Ok(Platform::MacOS),
            "linux" => Ok(Platform::Linux),
            "other" => Ok(Platform::Other),
            _ => Err(format!(
                "unknown platform `{}` (expected windows, macos, linux or other)",
                s
            )),
        }
    }
}

/// The platforms a link requirement applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformScope {
    Windows,
    #[serde(alias = "darwin", alias = "osx")]
    MacOS,
    Linux,
    All,
}

impl PlatformScope {
    /// Check whether this scope covers the given platform.
    pub fn matches(&self, platform: Platform) -> bool {
        match self {
            PlatformScope::All => true,
            PlatformScope::Windows => platform == Platform::Windows,
            PlatformScope::MacOS => platform == Platform::MacOS,
            PlatformScope::Linux => platform == Platform::Linux,
        }
    }
}

impl fmt::Display for PlatformScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformScope::Windows => f.write_str("windows"),
            PlatformScope::MacOS => f.write_str("macos"),
            PlatformScope::Linux => f.write_str("linux"),
            PlatformScope::All => f.write_str("all"),
        }
    }
}

/// What kind of link input a requirement names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementKind {
    /// System library (kernel32, pthread, ...)
    #[serde(alias = "system", alias = "lib")]
    SystemLibrary,
    /// macOS framework
    Framework,
}

impl fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequirementKind::SystemLibrary => f.write_str("system library"),
            RequirementKind::Framework => f.write_str("framework"),
        }
    }
}

/// A platform-scoped list of system libraries or frameworks.
///
/// Names are link-only: `kernel32`, not `kernel32.lib`. File naming is the
/// generator's business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformLibRequirement {
    pub platform: PlatformScope,
    pub kind: RequirementKind,
    pub files: Vec<String>,
}

impl PlatformLibRequirement {
    pub fn new(
        platform: PlatformScope,
        kind: RequirementKind,
        files: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        PlatformLibRequirement {
            platform,
            kind,
            files: files.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a system library requirement.
    pub fn system(platform: PlatformScope, files: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::new(platform, RequirementKind::SystemLibrary, files)
    }

    /// Create a framework requirement.
    pub fn framework(
        platform: PlatformScope,
        files: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self::new(platform, RequirementKind::Framework, files)
    }

    /// Check whether this requirement is materialized on `platform`.
    pub fn applies_to(&self, platform: Platform) -> bool {
        !self.files.is_empty() && self.platform.matches(platform)
    }
}

const WINDOWS_SYSTEM_LIBS: &[&str] = &["kernel32", "user32", "gdi32", "comdlg32", "advapi32"];

const MACOS_FRAMEWORKS: &[&str] = &[
    "Cocoa",
    "Metal",
    "OpenGL",
    "IOKit",
    "Carbon",
    "CoreVideo",
    "QuartzCore",
];

/// A table of platform link requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformLibSet {
    entries: Vec<PlatformLibRequirement>,
}

impl PlatformLibSet {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The libraries a native UI/graphics-capable library links on each OS.
    pub fn native_ui() -> Self {
        PlatformLibSet::new()
            .with(PlatformLibRequirement::system(
                PlatformScope::Windows,
                WINDOWS_SYSTEM_LIBS.iter().copied(),
            ))
            .with(PlatformLibRequirement::framework(
                PlatformScope::MacOS,
                MACOS_FRAMEWORKS.iter().copied(),
            ))
    }

    /// Append a requirement to the table.
    pub fn with(mut self, requirement: PlatformLibRequirement) -> Self {
        self.entries.push(requirement);
        self
    }

    /// Resolve the default table for `platform`.
    ///
    /// Windows yields one system library requirement, macOS one framework
    /// requirement, everything else nothing.
    pub fn resolve(platform: Platform) -> Vec<PlatformLibRequirement> {
        Self::native_ui().resolve_for(platform)
    }

    /// Resolve this table for `platform`, keeping table order.
    pub fn resolve_for(&self, platform: Platform) -> Vec<PlatformLibRequirement> {
        self.entries
            .iter()
            .filter(|req| req.applies_to(platform))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_windows() {
        let first = PlatformLibSet::resolve(Platform::Windows);
        let second = PlatformLibSet::resolve(Platform::Windows);

        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].kind, RequirementKind::SystemLibrary);
        assert_eq!(first[0].platform, PlatformScope::Windows);
        assert_eq!(
            first[0].files,
            vec!["kernel32", "user32", "gdi32", "comdlg32", "advapi32"]
        );
    }

    #[test]
    fn test_resolve_macos() {
        let reqs = PlatformLibSet::resolve(Platform::MacOS);

        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].kind, RequirementKind::Framework);
        assert_eq!(
            reqs[0].files,
            vec!["Cocoa", "Metal", "OpenGL", "IOKit", "Carbon", "CoreVideo", "QuartzCore"]
        );
    }

    #[test]
    fn test_resolve_other_platforms_empty() {
        assert!(PlatformLibSet::resolve(Platform::Linux).is_empty());
        assert!(PlatformLibSet::resolve(Platform::Other).is_empty());
    }

    #[test]
    fn test_custom_table_keeps_order_and_drops_empty() {
        let table = PlatformLibSet::new()
            .with(PlatformLibRequirement::system(PlatformScope::All, ["m"]))
            .with(PlatformLibRequirement::system(PlatformScope::Linux, ["pthread", "dl"]))
            .with(PlatformLibRequirement::system(PlatformScope::Linux, Vec::<String>::new()))
            .with(PlatformLibRequirement::framework(PlatformScope::MacOS, ["Cocoa"]));

        let linux = table.resolve_for(Platform::Linux);
        assert_eq!(linux.len(), 2);
        assert_eq!(linux[0].files, vec!["m"]);
        assert_eq!(linux[1].files, vec!["pthread", "dl"]);

        let windows = table.resolve_for(Platform::Windows);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].platform, PlatformScope::All);
    }

    #[test]
    fn test_platform_parsing() {
        assert_eq!("macos".parse::<Platform>().unwrap(), Platform::MacOS);
        assert_eq!("Darwin".parse::<Platform>().unwrap(), Platform::MacOS);
        assert_eq!("win".parse::<Platform>().unwrap(), Platform::Windows);
        assert!("beos".parse::<Platform>().is_err());
        assert_eq!(Platform::from_os("freebsd"), Platform::Other);
        assert_eq!(Platform::MacOS.to_string(), "macos");
    }
}
