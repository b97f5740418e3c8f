//! Capability detection.
//!
//! Detection is split in two steps so the query stays pure:
//! - [`probe_android`] looks at the configured inputs and the filesystem and
//!   reports where an Android SDK is, if anywhere.
//! - [`persist_if_absent`] records an auto-discovered SDK in
//!   `local.properties`, where the host build tool picks it up.
//!
//! A missing SDK is never an error; it only removes the android target.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::core::catalog::CapabilityFlags;
use crate::util::config::Config;
use crate::util::fs;
use crate::util::GlobalContext;

/// File the SDK location is persisted to, relative to the project root.
pub const LOCAL_PROPERTIES: &str = "local.properties";

/// Property key holding the SDK location.
pub const SDK_DIR_KEY: &str = "sdk.dir";

/// Result of probing for an Android SDK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "path", rename_all = "kebab-case")]
pub enum AndroidSdk {
    /// Android support is switched off in configuration
    Disabled,
    /// Set through the `sdk.dir` property or `ANDROID_HOME`
    Explicit(PathBuf),
    /// Found at the fallback install location
    Discovered(PathBuf),
    /// No SDK anywhere
    Absent,
}

impl AndroidSdk {
    pub fn is_available(&self) -> bool {
        matches!(self, AndroidSdk::Explicit(_) | AndroidSdk::Discovered(_))
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            AndroidSdk::Explicit(path) | AndroidSdk::Discovered(path) => Some(path),
            AndroidSdk::Disabled | AndroidSdk::Absent => None,
        }
    }
}

/// Inputs consulted by Android detection, captured once per pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AndroidInputs {
    pub enabled: bool,

    /// The `sdk.dir` build property
    pub sdk_dir_property: Option<PathBuf>,

    /// The `ANDROID_HOME` environment variable
    pub android_home: Option<PathBuf>,

    /// Install location probed when neither of the above is set
    pub fallback_sdk_dir: PathBuf,
}

impl AndroidInputs {
    pub fn from_context(ctx: &GlobalContext, config: &Config) -> Self {
        AndroidInputs {
            enabled: config.android.enabled,
            sdk_dir_property: config.android.sdk_dir.clone(),
            android_home: ctx.android_home().map(Path::to_path_buf),
            fallback_sdk_dir: config
                .android
                .fallback_sdk_dir
                .clone()
                .unwrap_or_else(|| ctx.default_android_sdk_dir()),
        }
    }
}

/// Locate an Android SDK without side effects.
///
/// The `sdk.dir` property wins over `ANDROID_HOME`; the fallback location is
/// only checked when neither is set.
pub fn probe_android(inputs: &AndroidInputs) -> AndroidSdk {
    if !inputs.enabled {
        return AndroidSdk::Disabled;
    }

    if let Some(dir) = inputs
        .sdk_dir_property
        .as_ref()
        .or(inputs.android_home.as_ref())
    {
        return AndroidSdk::Explicit(dir.clone());
    }

    if inputs.fallback_sdk_dir.exists() {
        return AndroidSdk::Discovered(inputs.fallback_sdk_dir.clone());
    }

    AndroidSdk::Absent
}

/// Write `sdk.dir=<path>` to the project's `local.properties`.
///
/// An existing `sdk.dir` entry is never replaced, and other lines of an
/// existing file are kept. Returns whether the file was written.
pub fn persist_if_absent(project_root: &Path, sdk_dir: &Path) -> Result<bool> {
    let path = project_root.join(LOCAL_PROPERTIES);

    let existing = if path.exists() {
        fs::read_to_string(&path)?
    } else {
        String::new()
    };

    if has_property(&existing, SDK_DIR_KEY) {
        tracing::debug!("{} already sets {}", path.display(), SDK_DIR_KEY);
        return Ok(false);
    }

    let sdk_dir = if sdk_dir.is_absolute() {
        sdk_dir.to_path_buf()
    } else {
        project_root.join(sdk_dir)
    };

    let mut contents = existing;
    if !contents.is_empty() && !contents.ends_with('\n') {
        contents.push('\n');
    }
    contents.push_str(&format!("{}={}\n", SDK_DIR_KEY, sdk_dir.display()));

    fs::write_string(&path, &contents)?;
    tracing::info!("wrote {}={} to {}", SDK_DIR_KEY, sdk_dir.display(), path.display());

    Ok(true)
}

/// Whether a properties text has a non-comment entry for `key`.
fn has_property(contents: &str, key: &str) -> bool {
    contents.lines().any(|line| {
        let line = line.trim_start();
        if line.starts_with('#') || line.starts_with('!') {
            return false;
        }
        line.split(['=', ':'])
            .next()
            .is_some_and(|k| k.trim() == key)
    })
}

/// Probe for an SDK and persist it when it was discovered.
///
/// Persistence failures are logged and do not change the outcome.
pub fn detect_android(inputs: &AndroidInputs, project_root: Option<&Path>) -> AndroidSdk {
    let sdk = probe_android(inputs);

    tracing::info!(
        "android: {:?}, sdk.dir={:?}, ANDROID_HOME={:?}, fallback={} (exists: {})",
        sdk,
        inputs.sdk_dir_property,
        inputs.android_home,
        inputs.fallback_sdk_dir.display(),
        inputs.fallback_sdk_dir.exists()
    );

    if let (AndroidSdk::Discovered(dir), Some(root)) = (&sdk, project_root) {
        if let Err(e) = persist_if_absent(root, dir) {
            tracing::warn!("failed to persist Android SDK location: {:#}", e);
        }
    }

    sdk
}

/// Whether the linux desktop target is enabled. Configuration only.
pub fn detect_linux(config: &Config) -> bool {
    config.native.linux
}

/// Compute the capability flags for a configuration pass.
pub fn detect_capabilities(
    inputs: &AndroidInputs,
    config: &Config,
    project_root: Option<&Path>,
) -> (CapabilityFlags, AndroidSdk) {
    let sdk = detect_android(inputs, project_root);
    let flags = CapabilityFlags::new(sdk.is_available(), detect_linux(config));
    (flags, sdk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn inputs(fallback: PathBuf) -> AndroidInputs {
        AndroidInputs {
            enabled: true,
            sdk_dir_property: None,
            android_home: None,
            fallback_sdk_dir: fallback,
        }
    }

    #[test]
    fn test_probe_property_wins() {
        let mut i = inputs(PathBuf::from("/nonexistent"));
        i.sdk_dir_property = Some(PathBuf::from("/prop/sdk"));
        i.android_home = Some(PathBuf::from("/env/sdk"));
        assert_eq!(probe_android(&i), AndroidSdk::Explicit(PathBuf::from("/prop/sdk")));
    }

    #[test]
    fn test_probe_env() {
        let mut i = inputs(PathBuf::from("/nonexistent"));
        i.android_home = Some(PathBuf::from("/env/sdk"));
        assert_eq!(probe_android(&i), AndroidSdk::Explicit(PathBuf::from("/env/sdk")));
    }

    #[test]
    fn test_probe_fallback() {
        let tmp = TempDir::new().unwrap();
        let sdk = tmp.path().join("sdk");
        std::fs::create_dir(&sdk).unwrap();

        let result = probe_android(&inputs(sdk.clone()));
        assert_eq!(result, AndroidSdk::Discovered(sdk));
        assert!(result.is_available());
    }

    #[test]
    fn test_probe_absent() {
        let tmp = TempDir::new().unwrap();
        let result = probe_android(&inputs(tmp.path().join("missing")));
        assert_eq!(result, AndroidSdk::Absent);
        assert!(!result.is_available());
        assert!(result.path().is_none());
    }

    #[test]
    fn test_probe_disabled_ignores_everything() {
        let mut i = inputs(PathBuf::from("/nonexistent"));
        i.enabled = false;
        i.sdk_dir_property = Some(PathBuf::from("/prop/sdk"));
        assert_eq!(probe_android(&i), AndroidSdk::Disabled);
    }

    #[test]
    fn test_persist_creates_file() {
        let tmp = TempDir::new().unwrap();
        let wrote = persist_if_absent(tmp.path(), Path::new("/opt/sdk")).unwrap();
        assert!(wrote);

        let contents = std::fs::read_to_string(tmp.path().join(LOCAL_PROPERTIES)).unwrap();
        assert_eq!(contents, "sdk.dir=/opt/sdk\n");
    }

    #[test]
    fn test_persist_keeps_existing_setting() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(LOCAL_PROPERTIES);
        std::fs::write(&path, "sdk.dir = /mine\n").unwrap();

        assert!(!persist_if_absent(tmp.path(), Path::new("/opt/sdk")).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "sdk.dir = /mine\n");
    }

    #[test]
    fn test_persist_appends_to_other_properties() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(LOCAL_PROPERTIES);
        std::fs::write(&path, "# sdk.dir=/commented\nndk.dir=/ndk").unwrap();

        assert!(persist_if_absent(tmp.path(), Path::new("/opt/sdk")).unwrap());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "# sdk.dir=/commented\nndk.dir=/ndk\nsdk.dir=/opt/sdk\n"
        );
    }

    #[test]
    fn test_persist_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        assert!(persist_if_absent(tmp.path(), Path::new("/opt/sdk")).unwrap());
        assert!(!persist_if_absent(tmp.path(), Path::new("/opt/sdk")).unwrap());
    }

    #[test]
    fn test_detect_android_persists_discovered() {
        let tmp = TempDir::new().unwrap();
        let sdk = tmp.path().join("sdk");
        std::fs::create_dir(&sdk).unwrap();
        let project = tmp.path().join("project");
        std::fs::create_dir(&project).unwrap();

        let result = detect_android(&inputs(sdk.clone()), Some(&project));
        assert_eq!(result, AndroidSdk::Discovered(sdk.clone()));

        let contents = std::fs::read_to_string(project.join(LOCAL_PROPERTIES)).unwrap();
        assert_eq!(contents, format!("sdk.dir={}\n", sdk.display()));
    }

    #[test]
    fn test_detect_android_explicit_does_not_persist() {
        let tmp = TempDir::new().unwrap();
        let mut i = inputs(tmp.path().join("missing"));
        i.android_home = Some(PathBuf::from("/env/sdk"));

        detect_android(&i, Some(tmp.path()));
        assert!(!tmp.path().join(LOCAL_PROPERTIES).exists());
    }

    #[test]
    fn test_detect_capabilities() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.native.linux = false;

        let (flags, sdk) =
            detect_capabilities(&inputs(tmp.path().join("missing")), &config, None);
        assert_eq!(sdk, AndroidSdk::Absent);
        assert_eq!(flags, CapabilityFlags::new(false, false));
    }
}
