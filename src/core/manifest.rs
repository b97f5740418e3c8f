//! Polytarget.toml manifest parsing and schema.
//!
//! The manifest lists what a project declares for every target: library
//! dependencies, sibling project dependencies and native interops.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::core::coordinate::NamingOptions;
use crate::core::target::Target;

/// Manifest file name.
pub const MANIFEST_NAME: &str = "Polytarget.toml";

/// Error locating a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not find `{}` in `{}` or any parent directory", MANIFEST_NAME, .dir.display())]
    NotFound { dir: PathBuf },
}

/// Project manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Manifest {
    pub project: ProjectSection,

    /// Library dependencies resolved per target
    #[serde(default)]
    pub dependencies: Vec<DependencyEntry>,

    /// Sibling projects added to the common source sets
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,

    /// Native interops declared by this project
    #[serde(default)]
    pub cinterops: Vec<CinteropEntry>,

    /// Interops published by another library as klibs
    #[serde(default)]
    pub external_cinterops: Vec<ExternalCinteropEntry>,
}

/// `[project]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ProjectSection {
    pub name: String,

    pub version: String,

    /// Package root for generated sources (e.g. `com.example`)
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_namespace() -> String {
    "com.example".to_string()
}

/// `[[dependencies]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DependencyEntry {
    /// `group:artifact:version`
    pub notation: String,

    /// Targets to resolve for; defaults to the active target set
    #[serde(default)]
    pub targets: Option<Vec<Target>>,

    #[serde(default)]
    pub android_is_jvm: Option<bool>,

    #[serde(default)]
    pub suffix_common_rename: Option<bool>,
}

impl DependencyEntry {
    /// Naming options for this entry, falling back to `defaults`.
    pub fn naming(&self, defaults: NamingOptions) -> NamingOptions {
        NamingOptions {
            suffix_common_rename: self
                .suffix_common_rename
                .unwrap_or(defaults.suffix_common_rename),
            android_is_jvm: self.android_is_jvm.unwrap_or(defaults.android_is_jvm),
        }
    }
}

/// `[[projects]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectEntry {
    pub path: String,
}

/// `[[cinterops]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CinteropEntry {
    pub name: String,

    /// Defaults to every native target
    #[serde(default)]
    pub targets: Option<Vec<Target>>,
}

/// `[[external-cinterops]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExternalCinteropEntry {
    /// `group:artifact:version` of the publishing library
    pub dependency: String,

    pub cinterop: String,

    #[serde(default)]
    pub targets: Option<Vec<Target>>,
}

impl Manifest {
    /// Load a manifest from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))
    }

    /// Parse manifest content.
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(content)?;

        if manifest.project.name.trim().is_empty() {
            anyhow::bail!("`project.name` must not be empty");
        }

        Ok(manifest)
    }
}

/// Find `Polytarget.toml` in `start` or its ancestors.
pub fn find_manifest(start: &Path) -> Result<PathBuf, ManifestError> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(MANIFEST_NAME);
        if candidate.is_file() {
            return Ok(candidate);
        }
        if !current.pop() {
            return Err(ManifestError::NotFound {
                dir: start.to_path_buf(),
            });
        }
    }
}
