//! Reverse lookup from a problem `type` URI to the error kind that produces it.
//!
//! Clients receiving a problem body use this to map the `type` member back to
//! a known kind. Explicit registrations are consulted first; otherwise a
//! `urn:problem-type:` URI is matched by naming convention against every kind
//! linked into the process.

use std::collections::HashMap;
use std::sync::LazyLock;

use heck::ToUpperCamelCase;
use parking_lot::RwLock;

use crate::kind::{ExceptionKind, ProblemDetail};
use crate::naming::{URN_PROBLEM_TYPE_PREFIX, build_type_uri};

/// Link-time registration of a kind, emitted by `#[derive(ProblemDetail)]`.
#[derive(Debug)]
pub struct KindRegistration {
    pub kind: &'static ExceptionKind,
}

impl KindRegistration {
    #[must_use]
    pub const fn new(kind: &'static ExceptionKind) -> Self {
        Self { kind }
    }
}

inventory::collect!(KindRegistration);

/// Name suffixes tried, in order, when matching a type URI by convention.
const CONVENTIONAL_SUFFIXES: [&str; 2] = ["Exception", ""];

#[derive(Debug, Default)]
pub struct ProblemTypeRegistry {
    by_type: RwLock<HashMap<String, &'static ExceptionKind>>,
}

impl ProblemTypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `E` under its type URI and returns that URI.
    pub fn register<E: ProblemDetail>(&self) -> String {
        self.register_kind(E::KIND)
    }

    pub fn register_kind(&self, kind: &'static ExceptionKind) -> String {
        let type_uri = build_type_uri(kind).into_string();
        if let Some(previous) = self.by_type.write().insert(type_uri.clone(), kind)
            && previous != kind
        {
            tracing::warn!(
                type_uri = %type_uri,
                previous = previous.name,
                current = kind.name,
                "problem type re-registered"
            );
        }
        type_uri
    }

    /// Kind producing `type_uri`, if known.
    #[must_use]
    pub fn resolve(&self, type_uri: &str) -> Option<&'static ExceptionKind> {
        if let Some(kind) = self.by_type.read().get(type_uri).copied() {
            return Some(kind);
        }
        let words = type_uri.strip_prefix(URN_PROBLEM_TYPE_PREFIX)?;
        let camel = words.to_upper_camel_case();
        CONVENTIONAL_SUFFIXES.iter().find_map(|suffix| {
            let name = format!("{camel}{suffix}");
            inventory::iter::<KindRegistration>
                .into_iter()
                .map(|registration| registration.kind)
                .find(|kind| kind.name == name && kind.type_uri.is_none())
        })
    }
}

static GLOBAL_REGISTRY: LazyLock<ProblemTypeRegistry> = LazyLock::new(ProblemTypeRegistry::new);

/// Process-wide registry.
#[must_use]
pub fn global_registry() -> &'static ProblemTypeRegistry {
    &GLOBAL_REGISTRY
}
