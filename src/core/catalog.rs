//! Target catalog and active target set.
//!
//! The catalog is fixed data: named groups of targets sharing a deployment
//! category. Capability flags decide which gated groups take part, and the
//! active target set is the concatenation of the included groups in catalog
//! order:
//!
//! ```text
//! android? -> js -> jvm -> metadata -> ios -> watchos -> tvos -> linux? -> macos -> mingw
//! ```

use serde::Serialize;

use crate::core::target::Target;

/// Capability flags for one configuration pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CapabilityFlags {
    /// An Android SDK is available
    pub has_android: bool,

    /// Linux desktop native targets are enabled
    pub linux_enabled: bool,
}

impl CapabilityFlags {
    pub fn new(has_android: bool, linux_enabled: bool) -> Self {
        CapabilityFlags {
            has_android,
            linux_enabled,
        }
    }
}

/// A named, ordered collection of targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetGroup {
    pub name: &'static str,
    pub targets: Vec<Target>,
}

impl TargetGroup {
    fn new(name: &'static str, targets: &[Target]) -> Self {
        TargetGroup {
            name,
            targets: targets.to_vec(),
        }
    }
}

const ANDROID_TARGETS: &[Target] = &[Target::Android];
const JS_TARGETS: &[Target] = &[Target::Js];
const JVM_TARGETS: &[Target] = &[Target::Jvm];
const COMMON_TARGETS: &[Target] = &[Target::Metadata];
const IOS_TARGETS: &[Target] = &[Target::IosArm64, Target::IosArm32, Target::IosX64];
const WATCHOS_TARGETS: &[Target] = &[
    Target::WatchosArm64,
    Target::WatchosArm32,
    Target::WatchosX64,
];
const TVOS_TARGETS: &[Target] = &[Target::TvosArm64, Target::TvosX64];
const LINUX_DESKTOP_TARGETS: &[Target] = &[Target::LinuxX64];
const MACOS_DESKTOP_TARGETS: &[Target] = &[Target::MacosX64];
const WINDOWS_DESKTOP_TARGETS: &[Target] = &[Target::MingwX64];

/// Ordered, duplicate-free list of targets active for a configuration pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ActiveTargetSet {
    targets: Vec<Target>,
}

impl ActiveTargetSet {
    /// Build a set from targets, dropping repeats but keeping first-seen order.
    pub fn from_targets(targets: impl IntoIterator<Item = Target>) -> Self {
        let mut set = ActiveTargetSet::default();
        for target in targets {
            if !set.targets.contains(&target) {
                set.targets.push(target);
            }
        }
        set
    }

    pub fn as_slice(&self) -> &[Target] {
        &self.targets
    }

    pub fn iter(&self) -> impl Iterator<Item = Target> + '_ {
        self.targets.iter().copied()
    }

    pub fn contains(&self, target: Target) -> bool {
        self.targets.contains(&target)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// The native subset, in set order.
    pub fn native(&self) -> Vec<Target> {
        self.iter().filter(Target::is_native).collect()
    }
}

/// The target catalog, gated by capability flags.
#[derive(Debug, Clone)]
pub struct TargetCatalog {
    flags: CapabilityFlags,
}

impl TargetCatalog {
    pub fn new(flags: CapabilityFlags) -> Self {
        TargetCatalog { flags }
    }

    pub fn flags(&self) -> CapabilityFlags {
        self.flags
    }

    /// The included groups, in catalog order.
    pub fn groups(&self) -> Vec<TargetGroup> {
        let mut groups = Vec::new();

        if self.flags.has_android {
            groups.push(TargetGroup::new("android", ANDROID_TARGETS));
        }
        groups.push(TargetGroup::new("js", JS_TARGETS));
        groups.push(TargetGroup::new("jvm", JVM_TARGETS));
        groups.push(TargetGroup::new("common", COMMON_TARGETS));
        groups.push(TargetGroup::new("ios", IOS_TARGETS));
        groups.push(TargetGroup::new("watchos", WATCHOS_TARGETS));
        groups.push(TargetGroup::new("tvos", TVOS_TARGETS));
        if self.flags.linux_enabled {
            groups.push(TargetGroup::new("linux-desktop", LINUX_DESKTOP_TARGETS));
        }
        groups.push(TargetGroup::new("macos-desktop", MACOS_DESKTOP_TARGETS));
        groups.push(TargetGroup::new("windows-desktop", WINDOWS_DESKTOP_TARGETS));

        groups
    }

    /// Concatenate the included groups into the active target set.
    pub fn active_targets(&self) -> ActiveTargetSet {
        let set = ActiveTargetSet::from_targets(
            self.groups().into_iter().flat_map(|group| group.targets),
        );
        tracing::debug!(
            has_android = self.flags.has_android,
            linux_enabled = self.flags.linux_enabled,
            count = set.len(),
            "built active target set"
        );
        set
    }

    /// Apple mobile, watch and TV targets.
    pub fn apple_mobile_targets(&self) -> Vec<Target> {
        [IOS_TARGETS, WATCHOS_TARGETS, TVOS_TARGETS].concat()
    }

    /// Desktop native targets; linux only when enabled.
    pub fn desktop_targets(&self) -> Vec<Target> {
        let mut targets = Vec::new();
        if self.flags.linux_enabled {
            targets.extend_from_slice(LINUX_DESKTOP_TARGETS);
        }
        targets.extend_from_slice(MACOS_DESKTOP_TARGETS);
        targets.extend_from_slice(WINDOWS_DESKTOP_TARGETS);
        targets
    }

    /// All native targets: apple mobile families followed by desktop.
    pub fn native_targets(&self) -> Vec<Target> {
        let mut targets = self.apple_mobile_targets();
        targets.extend(self.desktop_targets());
        targets
    }
}

/// Build the active target set for the given flags.
pub fn build_active_targets(flags: CapabilityFlags) -> ActiveTargetSet {
    TargetCatalog::new(flags).active_targets()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(set: &ActiveTargetSet) -> Vec<&'static str> {
        set.iter().map(|t| t.id()).collect()
    }

    #[test]
    fn test_full_target_order() {
        let set = build_active_targets(CapabilityFlags::new(true, true));
        assert_eq!(
            ids(&set),
            vec![
                "android",
                "js",
                "jvm",
                "metadata",
                "iosArm64",
                "iosArm32",
                "iosX64",
                "watchosArm64",
                "watchosArm32",
                "watchosX64",
                "tvosArm64",
                "tvosX64",
                "linuxX64",
                "macosX64",
                "mingwX64",
            ]
        );
    }

    #[test]
    fn test_android_gated() {
        let without = build_active_targets(CapabilityFlags::new(false, true));
        assert!(!without.contains(Target::Android));
        assert_eq!(without.as_slice()[0], Target::Js);

        let with = build_active_targets(CapabilityFlags::new(true, true));
        assert_eq!(with.iter().filter(|t| *t == Target::Android).count(), 1);
        assert_eq!(with.len(), without.len() + 1);
    }

    #[test]
    fn test_no_duplicates() {
        for flags in [
            CapabilityFlags::new(false, false),
            CapabilityFlags::new(false, true),
            CapabilityFlags::new(true, false),
            CapabilityFlags::new(true, true),
        ] {
            let set = build_active_targets(flags);
            let mut sorted = set.as_slice().to_vec();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), set.len(), "duplicate in {:?}", flags);
        }
    }

    #[test]
    fn test_linux_gated() {
        let set = build_active_targets(CapabilityFlags::new(true, false));
        assert!(!set.contains(Target::LinuxX64));
        assert!(set.contains(Target::MacosX64));
        assert!(set.contains(Target::MingwX64));
    }

    #[test]
    fn test_idempotent() {
        let flags = CapabilityFlags::new(true, false);
        assert_eq!(build_active_targets(flags), build_active_targets(flags));
    }

    #[test]
    fn test_groups_disjoint() {
        let catalog = TargetCatalog::new(CapabilityFlags::new(true, true));
        let groups = catalog.groups();
        for (i, a) in groups.iter().enumerate() {
            for b in &groups[i + 1..] {
                assert!(
                    a.targets.iter().all(|t| !b.targets.contains(t)),
                    "{} and {} overlap",
                    a.name,
                    b.name
                );
            }
        }
    }

    #[test]
    fn test_native_targets() {
        let catalog = TargetCatalog::new(CapabilityFlags::new(false, false));
        let native = catalog.native_targets();
        assert_eq!(native.len(), 10);
        assert!(native.iter().all(Target::is_native));
        assert!(!native.contains(&Target::LinuxX64));
        assert_eq!(native.last(), Some(&Target::MingwX64));

        let active = catalog.active_targets();
        assert_eq!(active.native(), native);
    }

    #[test]
    fn test_desktop_targets() {
        let catalog = TargetCatalog::new(CapabilityFlags::new(false, true));
        assert_eq!(
            catalog.desktop_targets(),
            vec![Target::LinuxX64, Target::MacosX64, Target::MingwX64]
        );
    }

    #[test]
    fn test_from_targets_dedups() {
        let set = ActiveTargetSet::from_targets([Target::Jvm, Target::Js, Target::Jvm]);
        assert_eq!(set.as_slice(), &[Target::Jvm, Target::Js]);
    }
}
