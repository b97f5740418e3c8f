//! polytarget - multi-target dependency and capability resolution
//!
//! This crate decides which compilation targets are active in an
//! environment and turns single logical declarations (library dependencies,
//! native interops) into per-target registrations for a host build tool.

pub mod core;
pub mod ops;
pub mod util;

pub use core::{
    catalog::{ActiveTargetSet, CapabilityFlags, TargetCatalog},
    coordinate::{DependencyDescriptor, NamingOptions, ResolvedCoordinate},
    interop::NativeInteropRegistry,
    manifest::Manifest,
    target::Target,
};

pub use util::context::GlobalContext;
