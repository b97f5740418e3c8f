//! Per-target artifact coordinate resolution.
//!
//! A [`DependencyDescriptor`] names a library independent of target. For
//! every requested target, [`resolve`] derives the configuration base the
//! dependency is registered under and the artifact coordinate, by appending
//! a target suffix to the artifact name:
//!
//! | target     | option                 | suffix      |
//! |------------|------------------------|-------------|
//! | `android`  | `android_is_jvm`       | `-jvm`      |
//! | `metadata` | `suffix_common_rename` | `-common`   |
//! | any other  |                        | `-<id lowercased>` |

use std::fmt;
use std::str::FromStr;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::target::Target;

/// Error parsing a dependency coordinate string.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum CoordinateError {
    #[error("malformed dependency descriptor `{input}`: expected `group:artifact:version`")]
    #[diagnostic(
        code(polytarget::coordinate::malformed),
        help("Write the dependency as three colon-separated fields, e.g. `com.example:lib:1.0`")
    )]
    MalformedDescriptor { input: String },
}

/// A `(group, artifact, version)` triple identifying a library.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyDescriptor {
    pub group: String,
    pub artifact: String,
    pub version: String,
}

impl DependencyDescriptor {
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        DependencyDescriptor {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
        }
    }

    /// Parse `group:artifact:version`.
    ///
    /// Only the first two colons separate fields; anything after the second
    /// colon belongs to the version, so `g:a:1.0:classifier@klib` keeps
    /// `1.0:classifier@klib` as its version.
    pub fn parse(text: &str) -> Result<Self, CoordinateError> {
        let mut parts = text.splitn(3, ':');
        let (Some(group), Some(artifact), Some(version)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(CoordinateError::MalformedDescriptor {
                input: text.to_string(),
            });
        };

        Ok(DependencyDescriptor::new(group, artifact, version))
    }

    /// Descriptor of an externally published cinterop klib for this library.
    pub fn cinterop(&self, cinterop: &str) -> Self {
        DependencyDescriptor {
            group: self.group.clone(),
            artifact: self.artifact.clone(),
            version: format!("{}:cinterop-{}@klib", self.version, cinterop),
        }
    }

    /// Coordinate for one target.
    pub fn coordinate_for(&self, target: Target, options: NamingOptions) -> String {
        format!(
            "{}:{}{}:{}",
            self.group,
            self.artifact,
            suffix(target, options),
            self.version
        )
    }
}

impl FromStr for DependencyDescriptor {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DependencyDescriptor::parse(s)
    }
}

impl fmt::Display for DependencyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

/// Naming switches applied during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NamingOptions {
    /// Publish the metadata artifact as `-common` instead of `-metadata`
    #[serde(default)]
    pub suffix_common_rename: bool,

    /// The android target consumes the `-jvm` artifact
    #[serde(default)]
    pub android_is_jvm: bool,
}

impl NamingOptions {
    pub fn with_suffix_common_rename(mut self, enabled: bool) -> Self {
        self.suffix_common_rename = enabled;
        self
    }

    pub fn with_android_is_jvm(mut self, enabled: bool) -> Self {
        self.android_is_jvm = enabled;
        self
    }
}

/// One resolved dependency for one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedCoordinate {
    /// Prefix of the configurations this coordinate is registered under
    pub config_base: String,

    /// Fully qualified artifact coordinate
    pub coordinate: String,
}

impl ResolvedCoordinate {
    pub fn main_configuration(&self) -> String {
        format!("{}MainApi", self.config_base)
    }

    pub fn test_configuration(&self) -> String {
        format!("{}TestImplementation", self.config_base)
    }

    /// The configurations a coordinate is added to: main API, then test.
    pub fn configurations(&self) -> [String; 2] {
        [self.main_configuration(), self.test_configuration()]
    }
}

/// Artifact suffix for a target under the given options.
pub fn suffix(target: Target, options: NamingOptions) -> String {
    match target {
        Target::Android if options.android_is_jvm => "-jvm".to_string(),
        Target::Metadata if options.suffix_common_rename => "-common".to_string(),
        other => other.artifact_suffix(),
    }
}

/// Resolve a descriptor to one coordinate per target, in target order.
pub fn resolve(
    descriptor: &DependencyDescriptor,
    targets: &[Target],
    options: NamingOptions,
) -> Vec<ResolvedCoordinate> {
    targets
        .iter()
        .map(|&target| {
            let resolved = ResolvedCoordinate {
                config_base: target.config_base().to_string(),
                coordinate: descriptor.coordinate_for(target, options),
            };
            tracing::debug!(
                target = target.id(),
                coordinate = %resolved.coordinate,
                "resolved dependency"
            );
            resolved
        })
        .collect()
}
