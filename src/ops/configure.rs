//! One configuration pass.
//!
//! Bootstrap captures configuration and capabilities once, builds the active
//! target set, and then applies a project's manifest declarations through the
//! declaration surface. The resulting [`ConfigurationPlan`] is what the host
//! build tool consumes.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::catalog::{ActiveTargetSet, CapabilityFlags, TargetCatalog};
use crate::core::interop::{InteropIntent, NativeInteropRegistry};
use crate::core::manifest::Manifest;
use crate::core::registrar::{
    script_string, DependencyRegistrar, NativeCompilationModel, RecordingRegistrar, Registration,
};
use crate::ops::declare::{
    declare_cinterop_external, declare_dependency_notation, declare_interop,
    declare_project_dependency,
};
use crate::ops::detect::{detect_capabilities, AndroidInputs, AndroidSdk};
use crate::util::config::{load_config, project_config_path, Config};
use crate::util::GlobalContext;

/// Bootstrap options.
#[derive(Debug, Clone, Copy)]
pub struct PassOptions {
    /// Record an auto-discovered Android SDK in local.properties
    pub persist_sdk: bool,
}

impl PassOptions {
    /// Options for passes that only report and must not write anything.
    pub fn read_only() -> Self {
        PassOptions { persist_sdk: false }
    }
}

impl Default for PassOptions {
    fn default() -> Self {
        PassOptions { persist_sdk: true }
    }
}

/// State of one configuration pass.
#[derive(Debug)]
pub struct ConfigurationPass {
    config: Config,
    /// `None` when the pass was started from known flags
    sdk: Option<AndroidSdk>,
    catalog: TargetCatalog,
    active: ActiveTargetSet,
    interops: NativeInteropRegistry,
}

impl ConfigurationPass {
    /// Load config, detect capabilities and build the active target set.
    pub fn bootstrap(ctx: &GlobalContext, project_root: &Path, options: PassOptions) -> Self {
        let config_path = ctx.config_path();
        let config = load_config(Some(config_path.as_path()), &project_config_path(project_root));

        let inputs = AndroidInputs::from_context(ctx, &config);
        let persist_root = options.persist_sdk.then_some(project_root);
        let (flags, sdk) = detect_capabilities(&inputs, &config, persist_root);

        let mut pass = Self::with_flags(config, flags);
        pass.sdk = Some(sdk);
        pass
    }

    /// Start a pass from already-known flags.
    pub fn with_flags(config: Config, flags: CapabilityFlags) -> Self {
        let catalog = TargetCatalog::new(flags);
        let active = catalog.active_targets();

        ConfigurationPass {
            config,
            sdk: None,
            catalog,
            active,
            interops: NativeInteropRegistry::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn flags(&self) -> CapabilityFlags {
        self.catalog.flags()
    }

    pub fn sdk(&self) -> Option<&AndroidSdk> {
        self.sdk.as_ref()
    }

    pub fn catalog(&self) -> &TargetCatalog {
        &self.catalog
    }

    pub fn active_targets(&self) -> &ActiveTargetSet {
        &self.active
    }

    pub fn interops(&self) -> &NativeInteropRegistry {
        &self.interops
    }

    /// Apply every declaration of `manifest`, stopping at the first error.
    ///
    /// Order: project dependencies, library dependencies, external cinterops,
    /// then interop declarations.
    pub fn apply<R>(&mut self, manifest: &Manifest, host: &mut R) -> Result<()>
    where
        R: DependencyRegistrar + NativeCompilationModel,
    {
        let defaults = self.config.naming_options();

        for project in &manifest.projects {
            declare_project_dependency(host, &project.path)?;
        }

        for dep in &manifest.dependencies {
            declare_dependency_notation(
                host,
                &self.active,
                &dep.notation,
                dep.targets.as_deref(),
                dep.naming(defaults),
            )
            .with_context(|| format!("failed to declare dependency `{}`", dep.notation))?;
        }

        for ext in &manifest.external_cinterops {
            declare_cinterop_external(
                host,
                &self.active,
                &ext.dependency,
                &ext.cinterop,
                ext.targets.as_deref(),
            )?;
        }

        for cinterop in &manifest.cinterops {
            let created = declare_interop(
                &mut self.interops,
                host,
                &self.active,
                &cinterop.name,
                cinterop.targets.as_deref(),
            )
            .with_context(|| format!("failed to declare interop `{}`", cinterop.name))?;
            if !created {
                tracing::warn!("interop `{}` declared more than once; keeping the first", cinterop.name);
            }
        }

        Ok(())
    }
}

/// Everything one pass produced.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigurationPlan {
    pub project: String,
    pub flags: CapabilityFlags,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android: Option<AndroidSdk>,
    pub targets: ActiveTargetSet,
    pub registrations: Vec<Registration>,
    pub interops: Vec<InteropIntent>,
}

/// Run a full pass for the manifest at `manifest_path`.
pub fn plan(ctx: &GlobalContext, manifest_path: &Path, options: PassOptions) -> Result<ConfigurationPlan> {
    let manifest = Manifest::load(manifest_path)?;
    let root = manifest_path.parent().unwrap_or(Path::new("."));

    let mut pass = ConfigurationPass::bootstrap(ctx, root, options);
    plan_with(&mut pass, &manifest)
}

/// Apply `manifest` to an existing pass and collect the plan.
pub fn plan_with(pass: &mut ConfigurationPass, manifest: &Manifest) -> Result<ConfigurationPlan> {
    let mut host = RecordingRegistrar::new();
    pass.apply(manifest, &mut host)?;

    Ok(ConfigurationPlan {
        project: manifest.project.name.clone(),
        flags: pass.flags(),
        android: pass.sdk().cloned(),
        targets: pass.active_targets().clone(),
        registrations: host.registrations,
        interops: host.interops,
    })
}

/// Render a plan as a build script fragment.
pub fn render_script(plan: &ConfigurationPlan) -> String {
    let mut out = String::new();

    let targets: Vec<_> = plan.targets.iter().map(|t| t.id()).collect();
    let _ = writeln!(out, "// {}: {}", plan.project.escape_debug(), targets.join(", "));

    out.push_str("dependencies {\n");
    for r in &plan.registrations {
        let _ = writeln!(out, "    add({}, {})", script_string(&r.configuration), r.notation);
    }
    out.push_str("}\n");

    if !plan.interops.is_empty() {
        out.push_str("\nkotlin {\n");
        for intent in &plan.interops {
            let _ = writeln!(
                out,
                "    targets[{}].compilations[{}].cinterops.maybeCreate({})",
                script_string(intent.target.id()),
                script_string(intent.compilation),
                script_string(&intent.interop)
            );
        }
        out.push_str("}\n");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::target::Target;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"
[project]
name = "korio"
version = "1.0.0"

[[projects]]
path = "klock"

[[dependencies]]
notation = "com.x:lib:1.0"
targets = ["jvm", "js", "android"]
android-is-jvm = true

[[cinterops]]
name = "zlib"
targets = ["linuxX64"]

[[cinterops]]
name = "zlib"
targets = ["macosX64"]
"#;

    fn pass(flags: CapabilityFlags) -> ConfigurationPass {
        ConfigurationPass::with_flags(Config::default(), flags)
    }

    #[test]
    fn test_plan_registrations() {
        let manifest = Manifest::parse(MANIFEST).unwrap();
        let mut pass = pass(CapabilityFlags::new(true, true));
        let plan = plan_with(&mut pass, &manifest).unwrap();

        let lines: Vec<_> = plan
            .registrations
            .iter()
            .map(|r| format!("{} {}", r.configuration, r.notation))
            .collect();
        assert_eq!(
            lines,
            vec![
                "commonMainApi project(\":klock\")",
                "commonTestImplementation project(\":klock\")",
                "jvmMainApi \"com.x:lib-jvm:1.0\"",
                "jvmTestImplementation \"com.x:lib-jvm:1.0\"",
                "jsMainApi \"com.x:lib-js:1.0\"",
                "jsTestImplementation \"com.x:lib-js:1.0\"",
                "androidMainApi \"com.x:lib-jvm:1.0\"",
                "androidTestImplementation \"com.x:lib-jvm:1.0\"",
            ]
        );
    }

    #[test]
    fn test_plan_repeat_interop_keeps_first() {
        let manifest = Manifest::parse(MANIFEST).unwrap();
        let mut pass = pass(CapabilityFlags::new(false, true));
        let plan = plan_with(&mut pass, &manifest).unwrap();

        assert_eq!(plan.interops.len(), 1);
        assert_eq!(plan.interops[0].target, Target::LinuxX64);
        assert_eq!(pass.interops().len(), 1);
    }

    #[test]
    fn test_plan_uses_config_naming_defaults() {
        let manifest = Manifest::parse(
            r#"
[project]
name = "a"
version = "1"

[[dependencies]]
notation = "g:a:1"
targets = ["metadata"]
"#,
        )
        .unwrap();

        let mut config = Config::default();
        config.naming.suffix_common_rename = Some(true);
        let mut pass = ConfigurationPass::with_flags(config, CapabilityFlags::new(false, false));
        let plan = plan_with(&mut pass, &manifest).unwrap();

        assert_eq!(
            plan.registrations[0],
            Registration::module("commonMainApi", "g:a-common:1")
        );
    }

    #[test]
    fn test_plan_fails_fast_on_malformed() {
        let manifest = Manifest::parse(
            r#"
[project]
name = "a"
version = "1"

[[dependencies]]
notation = "broken"

[[cinterops]]
name = "zlib"
"#,
        )
        .unwrap();

        let mut pass = pass(CapabilityFlags::new(false, false));
        let err = plan_with(&mut pass, &manifest).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to declare dependency `broken`"));
        assert!(pass.interops().is_empty());
    }

    #[test]
    fn test_render_script() {
        let manifest = Manifest::parse(MANIFEST).unwrap();
        let mut pass = pass(CapabilityFlags::new(false, true));
        let script = render_script(&plan_with(&mut pass, &manifest).unwrap());

        assert!(script.starts_with("// korio: js, jvm, metadata, iosArm64"));
        assert!(script.contains("    add(\"commonMainApi\", project(\":klock\"))\n"));
        assert!(script.contains("    add(\"jvmMainApi\", \"com.x:lib-jvm:1.0\")\n"));
        assert!(script.contains(
            "    targets[\"linuxX64\"].compilations[\"main\"].cinterops.maybeCreate(\"zlib\")\n"
        ));
    }

    #[test]
    fn test_render_script_escapes_manifest_values() {
        let manifest = Manifest::parse(
            r#"
[project]
name = "a"
version = "1"

[[dependencies]]
notation = 'g:a:1"+evil+"'
targets = ["jvm"]

[[cinterops]]
name = 'z"lib'
targets = ["linuxX64"]
"#,
        )
        .unwrap();

        let mut pass = pass(CapabilityFlags::new(false, true));
        let script = render_script(&plan_with(&mut pass, &manifest).unwrap());

        assert!(script.contains(r#"    add("jvmMainApi", "g:a-jvm:1\"+evil+\"")"#));
        assert!(script.contains(r#"cinterops.maybeCreate("z\"lib")"#));
    }

    #[test]
    fn test_bootstrap_reads_project_config() {
        let tmp = TempDir::new().unwrap();
        let home = tmp.path().join("home");
        let project = tmp.path().join("project");
        std::fs::create_dir_all(project.join(".polytarget")).unwrap();
        std::fs::write(
            project.join(".polytarget").join("config.toml"),
            "[native]\nlinux = false\n\n[android]\nenabled = false\n",
        )
        .unwrap();

        let ctx = GlobalContext::with_cwd(project.clone())
            .unwrap()
            .with_user_home(home)
            .with_android_home(None);
        let pass = ConfigurationPass::bootstrap(&ctx, &project, PassOptions::default());

        assert_eq!(pass.flags(), CapabilityFlags::new(false, false));
        assert_eq!(pass.sdk(), Some(&AndroidSdk::Disabled));
        assert!(!pass.active_targets().contains(Target::LinuxX64));
        assert!(!pass.active_targets().contains(Target::Android));
    }

    #[test]
    fn test_bootstrap_discovers_and_persists_sdk() {
        let tmp = TempDir::new().unwrap();
        let home = tmp.path().join("home");
        let sdk = home.join("Library").join("Android").join("sdk");
        std::fs::create_dir_all(&sdk).unwrap();
        let project = tmp.path().join("project");
        std::fs::create_dir_all(&project).unwrap();

        let ctx = GlobalContext::with_cwd(project.clone())
            .unwrap()
            .with_user_home(home)
            .with_android_home(None);
        let pass = ConfigurationPass::bootstrap(&ctx, &project, PassOptions::default());

        assert!(pass.flags().has_android);
        assert_eq!(pass.active_targets().as_slice()[0], Target::Android);
        let props = std::fs::read_to_string(project.join("local.properties")).unwrap();
        assert_eq!(props, format!("sdk.dir={}\n", sdk.display()));
    }

    #[test]
    fn test_plan_persists_discovered_sdk_by_default() {
        let tmp = TempDir::new().unwrap();
        let home = tmp.path().join("home");
        let sdk = home.join("Library").join("Android").join("sdk");
        std::fs::create_dir_all(&sdk).unwrap();
        let project = tmp.path().join("project");
        std::fs::create_dir_all(&project).unwrap();
        let manifest_path = project.join("Polytarget.toml");
        std::fs::write(&manifest_path, MANIFEST).unwrap();

        let ctx = GlobalContext::with_cwd(project.clone())
            .unwrap()
            .with_user_home(home)
            .with_android_home(None);
        let plan = plan(&ctx, &manifest_path, PassOptions::default()).unwrap();

        assert!(plan.flags.has_android);
        assert!(plan
            .registrations
            .iter()
            .any(|r| r.configuration == "androidMainApi"));
        let props = std::fs::read_to_string(project.join("local.properties")).unwrap();
        assert!(props.contains(&format!("sdk.dir={}", sdk.display())));
    }

    #[test]
    fn test_read_only_bootstrap_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let home = tmp.path().join("home");
        std::fs::create_dir_all(home.join("Library").join("Android").join("sdk")).unwrap();
        let project = tmp.path().join("project");
        std::fs::create_dir_all(&project).unwrap();

        let ctx = GlobalContext::with_cwd(project.clone())
            .unwrap()
            .with_user_home(home)
            .with_android_home(None);
        let pass = ConfigurationPass::bootstrap(&ctx, &project, PassOptions::read_only());

        assert!(pass.flags().has_android);
        assert!(!project.join("local.properties").exists());
    }
}
