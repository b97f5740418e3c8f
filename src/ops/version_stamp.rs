//! Version stamp generation.
//!
//! Writes a small source file into the common source set that exposes the
//! library version as a constant:
//!
//! ```text
//! src/commonMain/kotlin/com/example/korio/internal/KorioVersion.kt
//! ```

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::util::fs;

/// Package the stamp is generated in: `<namespace>.<name>.internal`.
pub fn stamp_package(namespace: &str, name: &str) -> String {
    format!("{}.{}.internal", namespace, name)
}

/// Path of the stamp file relative to the project directory.
pub fn stamp_path(namespace: &str, name: &str) -> PathBuf {
    let mut path = PathBuf::from("src").join("commonMain").join("kotlin");
    for segment in stamp_package(namespace, name).split('.') {
        path.push(segment);
    }
    path.join(format!("{}Version.kt", capitalize(name)))
}

/// Render the stamp file contents.
pub fn render_stamp(namespace: &str, name: &str, version: &str) -> String {
    format!(
        "package {}\n\ninternal const val {}_VERSION = \"{}\"\n",
        stamp_package(namespace, name),
        name.to_uppercase(),
        version
    )
}

/// Write the stamp under `project_dir`, returning the written path.
pub fn write_stamp(project_dir: &Path, namespace: &str, name: &str, version: &str) -> Result<PathBuf> {
    if name.is_empty() {
        anyhow::bail!("library name must not be empty");
    }

    let path = project_dir.join(stamp_path(namespace, name));
    fs::write_string(&path, &render_stamp(namespace, name, version))?;
    tracing::info!("wrote version stamp {}", path.display());
    Ok(path)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
