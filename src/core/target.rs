//! Compilation targets.
//!
//! A [`Target`] is one platform/architecture flavor the library is compiled
//! for. The set is closed: every target carries its identifier, family and
//! native-ness as data, so naming rules never operate on arbitrary strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A compilation target.
///
/// Variant order is catalog order, so `Ord` sorts targets the same way the
/// active target set lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Target {
    Android,
    Js,
    Jvm,
    /// Shared metadata compilation (the "common" source set)
    Metadata,
    IosArm64,
    IosArm32,
    IosX64,
    WatchosArm64,
    WatchosArm32,
    WatchosX64,
    TvosArm64,
    TvosX64,
    LinuxX64,
    MacosX64,
    MingwX64,
}

/// Deployment category a target belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetFamily {
    Android,
    Js,
    Jvm,
    Common,
    Ios,
    Watchos,
    Tvos,
    LinuxDesktop,
    MacosDesktop,
    WindowsDesktop,
}

impl TargetFamily {
    /// Whether targets of this family compile to native code.
    pub fn is_native(&self) -> bool {
        matches!(
            self,
            TargetFamily::Ios
                | TargetFamily::Watchos
                | TargetFamily::Tvos
                | TargetFamily::LinuxDesktop
                | TargetFamily::MacosDesktop
                | TargetFamily::WindowsDesktop
        )
    }

    /// Get the family name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetFamily::Android => "android",
            TargetFamily::Js => "js",
            TargetFamily::Jvm => "jvm",
            TargetFamily::Common => "common",
            TargetFamily::Ios => "ios",
            TargetFamily::Watchos => "watchos",
            TargetFamily::Tvos => "tvos",
            TargetFamily::LinuxDesktop => "linux-desktop",
            TargetFamily::MacosDesktop => "macos-desktop",
            TargetFamily::WindowsDesktop => "windows-desktop",
        }
    }
}

impl fmt::Display for TargetFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Target {
    /// Every target, in catalog order.
    pub const ALL: [Target; 15] = [
        Target::Android,
        Target::Js,
        Target::Jvm,
        Target::Metadata,
        Target::IosArm64,
        Target::IosArm32,
        Target::IosX64,
        Target::WatchosArm64,
        Target::WatchosArm32,
        Target::WatchosX64,
        Target::TvosArm64,
        Target::TvosX64,
        Target::LinuxX64,
        Target::MacosX64,
        Target::MingwX64,
    ];

    /// The identifier used by the host build tool (e.g. `iosArm64`).
    pub fn id(&self) -> &'static str {
        match self {
            Target::Android => "android",
            Target::Js => "js",
            Target::Jvm => "jvm",
            Target::Metadata => "metadata",
            Target::IosArm64 => "iosArm64",
            Target::IosArm32 => "iosArm32",
            Target::IosX64 => "iosX64",
            Target::WatchosArm64 => "watchosArm64",
            Target::WatchosArm32 => "watchosArm32",
            Target::WatchosX64 => "watchosX64",
            Target::TvosArm64 => "tvosArm64",
            Target::TvosX64 => "tvosX64",
            Target::LinuxX64 => "linuxX64",
            Target::MacosX64 => "macosX64",
            Target::MingwX64 => "mingwX64",
        }
    }

    pub fn family(&self) -> TargetFamily {
        match self {
            Target::Android => TargetFamily::Android,
            Target::Js => TargetFamily::Js,
            Target::Jvm => TargetFamily::Jvm,
            Target::Metadata => TargetFamily::Common,
            Target::IosArm64 | Target::IosArm32 | Target::IosX64 => TargetFamily::Ios,
            Target::WatchosArm64 | Target::WatchosArm32 | Target::WatchosX64 => {
                TargetFamily::Watchos
            }
            Target::TvosArm64 | Target::TvosX64 => TargetFamily::Tvos,
            Target::LinuxX64 => TargetFamily::LinuxDesktop,
            Target::MacosX64 => TargetFamily::MacosDesktop,
            Target::MingwX64 => TargetFamily::WindowsDesktop,
        }
    }

    /// Whether this target has a native compilation unit.
    pub fn is_native(&self) -> bool {
        self.family().is_native()
    }

    /// Source-set prefix this target's configurations are named after.
    ///
    /// The metadata target compiles the `common` source sets.
    pub fn config_base(&self) -> &'static str {
        match self {
            Target::Metadata => "common",
            other => other.id(),
        }
    }

    /// Default artifact suffix: `-` followed by the lowercased identifier.
    pub fn artifact_suffix(&self) -> String {
        format!("-{}", self.id().to_lowercase())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when parsing an unknown target identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown target `{}`, valid targets: {}", .0, valid_target_list())]
pub struct TargetParseError(pub String);

fn valid_target_list() -> String {
    Target::ALL
        .iter()
        .map(Target::id)
        .collect::<Vec<_>>()
        .join(", ")
}

impl FromStr for Target {
    type Err = TargetParseError;

    /// Identifiers are matched exactly; `iosarm64` is not `iosArm64`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::ALL
            .iter()
            .copied()
            .find(|t| t.id() == s)
            .ok_or_else(|| TargetParseError(s.to_string()))
    }
}

impl Serialize for Target {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for Target {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_id_roundtrip() {
        for target in Target::ALL {
            assert_eq!(target.id().parse::<Target>().unwrap(), target);
        }
    }

    #[test]
    fn test_target_parse_unknown() {
        let err = "solarisSparc".parse::<Target>().unwrap_err();
        assert_eq!(err.0, "solarisSparc");
        assert!(err
            .to_string()
            .starts_with("unknown target `solarisSparc`, valid targets: android, js"));
    }

    #[test]
    fn test_target_parse_is_case_sensitive() {
        assert!("iosarm64".parse::<Target>().is_err());
        assert!("JVM".parse::<Target>().is_err());
    }

    #[test]
    fn test_config_base() {
        assert_eq!(Target::Metadata.config_base(), "common");
        assert_eq!(Target::Jvm.config_base(), "jvm");
        assert_eq!(Target::IosArm64.config_base(), "iosArm64");
    }

    #[test]
    fn test_artifact_suffix_lowercases() {
        assert_eq!(Target::MacosX64.artifact_suffix(), "-macosx64");
        assert_eq!(Target::Js.artifact_suffix(), "-js");
        assert_eq!(Target::Metadata.artifact_suffix(), "-metadata");
    }

    #[test]
    fn test_native_targets() {
        assert!(!Target::Android.is_native());
        assert!(!Target::Metadata.is_native());
        assert!(Target::TvosX64.is_native());
        assert!(Target::MingwX64.is_native());
    }

    #[test]
    fn test_target_serde() {
        let json = serde_json::to_string(&vec![Target::WatchosArm32, Target::Js]).unwrap();
        assert_eq!(json, r#"["watchosArm32","js"]"#);

        let parsed: Vec<Target> = serde_json::from_str(r#"["linuxX64"]"#).unwrap();
        assert_eq!(parsed, vec![Target::LinuxX64]);

        assert!(serde_json::from_str::<Target>(r#""linux""#).is_err());
    }
}
