//! Dependency and interop declaration surface.
//!
//! These are the calls a project's build configuration makes. Each one
//! resolves a single logical declaration against the active targets and
//! hands the per-target results to the host-side registrar.

use anyhow::{Context, Result};

use crate::core::catalog::ActiveTargetSet;
use crate::core::coordinate::{resolve, DependencyDescriptor, NamingOptions};
use crate::core::interop::{NativeInteropRegistry, RegisterOutcome};
use crate::core::registrar::{DependencyRegistrar, NativeCompilationModel, Registration};
use crate::core::target::Target;

/// Configuration project dependencies are added to for main sources.
pub const COMMON_MAIN_API: &str = "commonMainApi";

/// Configuration project dependencies are added to for test sources.
pub const COMMON_TEST_IMPLEMENTATION: &str = "commonTestImplementation";

/// Declare a library dependency for every target in `targets`, or for the
/// whole active set when `targets` is `None`.
///
/// Every resolved coordinate is registered twice: under the target's main
/// API configuration and its test implementation configuration. Returns the
/// number of registrations made.
pub fn declare_dependency(
    registrar: &mut dyn DependencyRegistrar,
    active: &ActiveTargetSet,
    descriptor: &DependencyDescriptor,
    targets: Option<&[Target]>,
    options: NamingOptions,
) -> Result<usize> {
    let targets = targets.unwrap_or(active.as_slice());
    let mut count = 0;

    for resolved in resolve(descriptor, targets, options) {
        for configuration in resolved.configurations() {
            registrar.add(Registration::module(configuration, resolved.coordinate.clone()))?;
            count += 1;
        }
    }

    tracing::debug!(dependency = %descriptor, registrations = count, "declared dependency");
    Ok(count)
}

/// Parse `group:artifact:version` and declare it.
pub fn declare_dependency_notation(
    registrar: &mut dyn DependencyRegistrar,
    active: &ActiveTargetSet,
    notation: &str,
    targets: Option<&[Target]>,
    options: NamingOptions,
) -> Result<usize> {
    let descriptor = DependencyDescriptor::parse(notation)?;
    declare_dependency(registrar, active, &descriptor, targets, options)
}

/// Depend on a sibling project from the common source sets.
pub fn declare_project_dependency(
    registrar: &mut dyn DependencyRegistrar,
    path: &str,
) -> Result<()> {
    let path = path.trim_start_matches(':');
    if path.is_empty() {
        anyhow::bail!("project dependency path must not be empty");
    }

    registrar.add(Registration::project(COMMON_MAIN_API, path))?;
    registrar.add(Registration::project(COMMON_TEST_IMPLEMENTATION, path))?;
    Ok(())
}

/// Depend on the cinterop klibs another library publishes.
///
/// `targets` defaults to the native subset of the active set. Naming options
/// are left at their defaults.
pub fn declare_cinterop_external(
    registrar: &mut dyn DependencyRegistrar,
    active: &ActiveTargetSet,
    dependency: &str,
    cinterop: &str,
    targets: Option<&[Target]>,
) -> Result<usize> {
    let descriptor = DependencyDescriptor::parse(dependency)?.cinterop(cinterop);
    let native;
    let targets = match targets {
        Some(targets) => targets,
        None => {
            native = active.native();
            &native
        }
    };

    declare_dependency(registrar, active, &descriptor, Some(targets), NamingOptions::default())
        .with_context(|| format!("failed to declare cinterop `{}` of `{}`", cinterop, dependency))
}

/// Declare a native interop and forward its intents to the compilation
/// model. `targets` defaults to the native subset of the active set.
///
/// Returns `false` when the name was already declared.
pub fn declare_interop(
    registry: &mut NativeInteropRegistry,
    model: &mut dyn NativeCompilationModel,
    active: &ActiveTargetSet,
    name: &str,
    targets: Option<&[Target]>,
) -> Result<bool> {
    let native;
    let targets = match targets {
        Some(targets) => targets,
        None => {
            native = active.native();
            &native
        }
    };

    let outcome = registry.register(name, targets)?;
    for intent in outcome.intents() {
        model.attach_interop(intent)?;
    }

    Ok(matches!(outcome, RegisterOutcome::Created(_)))
}
