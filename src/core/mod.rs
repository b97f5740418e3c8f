//! Core data structures for polytarget.
//!
//! This module contains the resolution logic proper:
//! - Targets and the gated target catalog
//! - Per-target coordinate resolution
//! - Native interop declarations
//! - The registrar boundary to the host build tool
//! - The project manifest

pub mod catalog;
pub mod coordinate;
pub mod interop;
pub mod manifest;
pub mod registrar;
pub mod target;

pub use catalog::{build_active_targets, ActiveTargetSet, CapabilityFlags, TargetCatalog, TargetGroup};
pub use coordinate::{
    resolve, suffix, CoordinateError, DependencyDescriptor, NamingOptions, ResolvedCoordinate,
};
pub use interop::{InteropDeclaration, InteropError, InteropIntent, NativeInteropRegistry, RegisterOutcome};
pub use manifest::{find_manifest, Manifest, ManifestError, MANIFEST_NAME};
pub use registrar::{
    script_string, DependencyRegistrar, NativeCompilationModel, Notation, RecordingRegistrar,
    Registration,
};
pub use target::{Target, TargetFamily, TargetParseError};
