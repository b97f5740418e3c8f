//! Native interop declarations.
//!
//! An interop declaration binds a named native library definition to a set
//! of native targets. The registry keeps one declaration per name for the
//! whole configuration pass; the first registration wins and later ones for
//! the same name are ignored.

use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

use crate::core::target::Target;

/// Name of the compilation unit interops are attached to.
pub const MAIN_COMPILATION: &str = "main";

/// Error registering an interop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteropError {
    #[error("interop `{name}` cannot target `{target}`: not a native target")]
    NonNativeTarget { name: String, target: Target },

    #[error("interop name must not be empty")]
    EmptyName,
}

/// A named interop binding and the native targets it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteropDeclaration {
    pub name: String,
    pub targets: BTreeSet<Target>,
}

/// Instruction for the native compilation model: make sure `interop` exists
/// on the `compilation` unit of `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteropIntent {
    pub interop: String,
    pub target: Target,
    pub compilation: &'static str,
}

/// Outcome of a registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// First registration of the name; one intent per target.
    Created(Vec<InteropIntent>),
    /// The name was already declared; nothing changed.
    AlreadyDeclared,
}

impl RegisterOutcome {
    pub fn intents(&self) -> &[InteropIntent] {
        match self {
            RegisterOutcome::Created(intents) => intents,
            RegisterOutcome::AlreadyDeclared => &[],
        }
    }
}

/// Interop declarations, in registration order.
#[derive(Debug, Clone, Default)]
pub struct NativeInteropRegistry {
    declarations: Vec<InteropDeclaration>,
}

impl NativeInteropRegistry {
    pub fn new() -> Self {
        NativeInteropRegistry::default()
    }

    /// Declare `name` for `targets`.
    ///
    /// A repeated name is a no-op: the first declaration and its target
    /// set are left untouched, even if `targets` differs.
    pub fn register(
        &mut self,
        name: &str,
        targets: &[Target],
    ) -> Result<RegisterOutcome, InteropError> {
        if name.is_empty() {
            return Err(InteropError::EmptyName);
        }

        if self.get(name).is_some() {
            tracing::debug!(interop = name, "interop already declared, ignoring");
            return Ok(RegisterOutcome::AlreadyDeclared);
        }

        if let Some(target) = targets.iter().find(|t| !t.is_native()) {
            return Err(InteropError::NonNativeTarget {
                name: name.to_string(),
                target: *target,
            });
        }

        let declaration = InteropDeclaration {
            name: name.to_string(),
            targets: targets.iter().copied().collect(),
        };

        let intents = declaration
            .targets
            .iter()
            .map(|&target| InteropIntent {
                interop: name.to_string(),
                target,
                compilation: MAIN_COMPILATION,
            })
            .collect();

        tracing::debug!(
            interop = name,
            targets = declaration.targets.len(),
            "declared interop"
        );
        self.declarations.push(declaration);

        Ok(RegisterOutcome::Created(intents))
    }

    pub fn get(&self, name: &str) -> Option<&InteropDeclaration> {
        self.declarations.iter().find(|d| d.name == name)
    }

    pub fn declarations(&self) -> &[InteropDeclaration] {
        &self.declarations
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}
