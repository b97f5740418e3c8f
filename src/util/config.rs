//! Configuration file support for polytarget.
//!
//! Two configuration file locations are read:
//! - Global: `~/.polytarget/config.toml` - User-wide defaults
//! - Project: `.polytarget/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, field by field.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::coordinate::NamingOptions;

/// polytarget configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Android SDK settings
    pub android: AndroidConfig,

    /// Native target settings
    pub native: NativeConfig,

    /// Default naming options for dependencies
    pub naming: NamingConfig,
}

/// Android-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AndroidConfig {
    /// Whether the android target may be enabled at all
    pub enabled: bool,

    /// Explicit SDK location (the `sdk.dir` build property)
    pub sdk_dir: Option<PathBuf>,

    /// Install location probed when no SDK is configured
    /// (default: `~/Library/Android/sdk`)
    pub fallback_sdk_dir: Option<PathBuf>,
}

impl Default for AndroidConfig {
    fn default() -> Self {
        AndroidConfig {
            enabled: true,
            sdk_dir: None,
            fallback_sdk_dir: None,
        }
    }
}

/// Native-target configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NativeConfig {
    /// Include the linux desktop target
    pub linux: bool,
}

impl Default for NativeConfig {
    fn default() -> Self {
        NativeConfig { linux: true }
    }
}

/// Default naming options; `None` leaves the built-in default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct NamingConfig {
    pub android_is_jvm: Option<bool>,
    pub suffix_common_rename: Option<bool>,
}

/// Partial configuration as read from one file.
///
/// Every field is optional so merging can tell "unset" from "set to the
/// default value".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    android: RawAndroidConfig,
    native: RawNativeConfig,
    naming: NamingConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct RawAndroidConfig {
    enabled: Option<bool>,
    sdk_dir: Option<PathBuf>,
    fallback_sdk_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawNativeConfig {
    linux: Option<bool>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Config::default();
        config.merge(read_raw(path)?);
        Ok(config)
    }

    /// Apply the values set in `other` on top of this config.
    fn merge(&mut self, other: RawConfig) {
        if let Some(enabled) = other.android.enabled {
            self.android.enabled = enabled;
        }
        if other.android.sdk_dir.is_some() {
            self.android.sdk_dir = other.android.sdk_dir;
        }
        if other.android.fallback_sdk_dir.is_some() {
            self.android.fallback_sdk_dir = other.android.fallback_sdk_dir;
        }

        if let Some(linux) = other.native.linux {
            self.native.linux = linux;
        }

        if other.naming.android_is_jvm.is_some() {
            self.naming.android_is_jvm = other.naming.android_is_jvm;
        }
        if other.naming.suffix_common_rename.is_some() {
            self.naming.suffix_common_rename = other.naming.suffix_common_rename;
        }
    }

    /// Default naming options for dependencies that don't set their own.
    pub fn naming_options(&self) -> NamingOptions {
        NamingOptions {
            suffix_common_rename: self.naming.suffix_common_rename.unwrap_or(false),
            android_is_jvm: self.naming.android_is_jvm.unwrap_or(false),
        }
    }
}

fn read_raw(path: &Path) -> Result<RawConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file: {}", path.display()))
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.polytarget/config.toml)
/// 2. Global config (~/.polytarget/config.toml)
/// 3. Defaults
///
/// Unreadable files are skipped with a warning.
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    for path in global_path.into_iter().chain(Some(project_path)) {
        if !path.exists() {
            continue;
        }
        match read_raw(path) {
            Ok(raw) => config.merge(raw),
            Err(e) => tracing::warn!("Failed to load config from {}: {:#}", path.display(), e),
        }
    }

    config
}

/// Get the project config path (.polytarget/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".polytarget").join("config.toml")
}
