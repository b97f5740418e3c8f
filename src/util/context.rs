//! Global context for polytarget operations.
//!
//! Everything the configuration pass needs from the process environment is
//! captured here once, at startup: working directory, home directories and
//! the `ANDROID_HOME` variable. Resolution code receives these as values and
//! never reads the environment itself.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;

use crate::core::manifest::{find_manifest, ManifestError};

/// Environment variable pointing at an Android SDK.
pub const ANDROID_HOME_ENV: &str = "ANDROID_HOME";

/// Global context containing paths and captured environment.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// The user's home directory
    user_home: PathBuf,

    /// Home directory for global polytarget data (~/.polytarget/)
    home: PathBuf,

    /// Value of `ANDROID_HOME`, if set and non-empty
    android_home: Option<PathBuf>,
}

impl GlobalContext {
    /// Create a new GlobalContext from the process environment.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        let user_home = BaseDirs::new()
            .map(|b| b.home_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let android_home = std::env::var_os(ANDROID_HOME_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Ok(GlobalContext {
            cwd,
            home: user_home.join(".polytarget"),
            user_home,
            android_home,
        })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    /// Replace the user home directory (and the polytarget home under it).
    pub fn with_user_home(mut self, user_home: PathBuf) -> Self {
        self.home = user_home.join(".polytarget");
        self.user_home = user_home;
        self
    }

    /// Replace the captured `ANDROID_HOME` value.
    pub fn with_android_home(mut self, android_home: Option<PathBuf>) -> Self {
        self.android_home = android_home;
        self
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the user's home directory.
    pub fn user_home(&self) -> &Path {
        &self.user_home
    }

    /// Get the polytarget home directory (~/.polytarget/).
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Get the captured `ANDROID_HOME` value.
    pub fn android_home(&self) -> Option<&Path> {
        self.android_home.as_deref()
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Well-known Android SDK install location probed as a last resort.
    pub fn default_android_sdk_dir(&self) -> PathBuf {
        self.user_home.join("Library").join("Android").join("sdk")
    }

    /// Find the manifest starting from cwd and searching upward.
    pub fn find_manifest(&self) -> Result<PathBuf, ManifestError> {
        find_manifest(&self.cwd)
    }

    /// Find the project root (directory containing Polytarget.toml).
    pub fn find_project_root(&self) -> Result<PathBuf, ManifestError> {
        self.find_manifest().map(|p| {
            p.parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.cwd.clone())
        })
    }
}
