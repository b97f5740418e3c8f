//! High-level operations.
//!
//! This module contains the implementation of polytarget commands.

pub mod configure;
pub mod declare;
pub mod detect;
pub mod version_stamp;

pub use configure::{plan, plan_with, render_script, ConfigurationPass, ConfigurationPlan, PassOptions};
pub use declare::{
    declare_cinterop_external, declare_dependency, declare_dependency_notation, declare_interop,
    declare_project_dependency,
};
pub use detect::{
    detect_android, detect_capabilities, detect_linux, persist_if_absent, probe_android,
    AndroidInputs, AndroidSdk,
};
pub use version_stamp::{render_stamp, stamp_path, write_stamp};
