//! Manifest fixtures.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::core::MANIFEST_NAME;

/// Builder for a Berth.toml written to disk.
#[derive(Debug, Clone)]
pub struct ManifestFixture {
    name: String,
    root: Option<String>,
    lib: bool,
    tests: usize,
    dependencies: Vec<(String, String)>,
    dev_dependencies: Vec<(String, String)>,
    raw: String,
}

impl ManifestFixture {
    pub fn new(name: impl Into<String>) -> Self {
        ManifestFixture {
            name: name.into(),
            root: None,
            lib: false,
            tests: 0,
            dependencies: Vec::new(),
            dev_dependencies: Vec::new(),
            raw: String::new(),
        }
    }

    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Declare a `[lib]` with default settings.
    pub fn with_lib(mut self) -> Self {
        self.lib = true;
        self
    }

    /// Declare one more unnamed `[[test]]`.
    pub fn with_test(mut self) -> Self {
        self.tests += 1;
        self
    }

    pub fn with_dependency(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.dependencies.push((name.into(), path.into()));
        self
    }

    pub fn with_dev_dependency(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.dev_dependencies.push((name.into(), path.into()));
        self
    }

    /// Append raw TOML after the generated sections.
    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw.push_str(&raw.into());
        self
    }

    /// Render the manifest text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "[package]\nname = \"{}\"", self.name);
        if let Some(root) = &self.root {
            let _ = writeln!(out, "root = \"{}\"", root);
        }
        if self.lib {
            out.push_str("\n[lib]\n");
        }
        for _ in 0..self.tests {
            out.push_str("\n[[test]]\n");
        }
        for (header, deps) in [
            ("dependencies", &self.dependencies),
            ("dev-dependencies", &self.dev_dependencies),
        ] {
            if deps.is_empty() {
                continue;
            }
            let _ = writeln!(out, "\n[{}]", header);
            for (name, path) in deps {
                let _ = writeln!(out, "{} = {{ path = \"{}\" }}", name, path);
            }
        }
        if !self.raw.is_empty() {
            out.push('\n');
            out.push_str(&self.raw);
        }
        out
    }

    /// Write `Berth.toml` into `dir`, creating it. Returns the manifest path.
    pub fn write(&self, dir: &Path) -> PathBuf {
        std::fs::create_dir_all(dir).unwrap();
        let path = dir.join(MANIFEST_NAME);
        std::fs::write(&path, self.render()).unwrap();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Manifest;

    #[test]
    fn test_rendered_fixture_parses() {
        let text = ManifestFixture::new("chash")
            .with_root("github.com/jurgen-kluft/chash")
            .with_lib()
            .with_test()
            .with_dependency("cbase", "../cbase")
            .with_dev_dependency("cunittest", "../cunittest")
            .render();

        let manifest = Manifest::parse(&text, Path::new("Berth.toml")).unwrap();
        assert_eq!(manifest.name(), "chash");
        assert!(manifest.lib.is_some());
        assert_eq!(manifest.tests.len(), 1);
        assert_eq!(manifest.dependencies.len(), 1);
        assert_eq!(manifest.dev_dependencies.len(), 1);
    }
}
