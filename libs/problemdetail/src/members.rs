//! Reading marked members out of an error instance.
//!
//! Reads never fail: a member that cannot be read contributes a diagnostic
//! string instead, so reporting an error never raises a new one.

use std::collections::BTreeMap;

use serde_json::Value;
use uuid::Uuid;

use crate::body::{CORE_KEYS, value_text};
use crate::kind::{AccessError, Marker, Member, Origin, ProblemDetail};
use crate::uri::{ProblemUri, create_safe_uri};

fn read<E: ProblemDetail>(member: &Member<E>, exception: &E) -> Value {
    let outcome = match member.origin {
        Origin::Method { params } if params != 0 => Err(AccessError::Arity(params)),
        _ => (member.read)(exception),
    };
    outcome.unwrap_or_else(|err| Value::String(diagnostic::<E>(member, &err)))
}

fn diagnostic<E: ProblemDetail>(member: &Member<E>, err: &AccessError) -> String {
    let kind = E::KIND.name;
    match member.origin {
        Origin::Method { .. } => format!("could not invoke {kind}.{}: {err}", member.name),
        Origin::Field => format!("could not get {kind}.{}: {err}", member.name),
    }
}

fn marked<E: ProblemDetail>(
    origin_is_method: bool,
    accept: impl Fn(Marker) -> bool,
) -> impl Iterator<Item = &'static Member<E>> {
    E::members().iter().filter(move |member| {
        matches!(member.origin, Origin::Method { .. }) == origin_is_method && accept(member.marker)
    })
}

/// Detail text: the detail-marked methods, then fields, joined with `". "`.
///
/// `None` when no member is marked.
pub fn collect_detail<E: ProblemDetail>(exception: &E) -> Option<String> {
    let is_detail = |marker: Marker| marker == Marker::Detail;
    let details: Vec<String> = marked::<E>(true, is_detail)
        .chain(marked::<E>(false, is_detail))
        .map(|member| value_text(&read(member, exception)))
        .collect();
    if details.is_empty() {
        None
    } else {
        Some(details.join(". "))
    }
}

/// Instance URI: the first non-null instance field, else the first non-null
/// instance method, else a random `urn:uuid:`.
pub fn resolve_instance<E: ProblemDetail>(exception: &E) -> ProblemUri {
    let is_instance = |marker: Marker| marker == Marker::Instance;
    let found = marked::<E>(false, is_instance)
        .chain(marked::<E>(true, is_instance))
        .map(|member| read(member, exception))
        .find(|value| !value.is_null())
        .map(|value| value_text(&value));
    let instance = found.unwrap_or_else(|| format!("urn:uuid:{}", Uuid::new_v4()));
    create_safe_uri(&instance)
}

/// Extension entries keyed by override name or member name, sorted by key.
///
/// Keys colliding with a standard member are dropped.
pub fn collect_extensions<E: ProblemDetail>(exception: &E) -> BTreeMap<String, Value> {
    let is_extension = |marker: Marker| matches!(marker, Marker::Extension(_));
    let mut extensions = BTreeMap::new();
    for member in marked::<E>(true, is_extension).chain(marked::<E>(false, is_extension)) {
        let key = member.extension_name();
        if CORE_KEYS.contains(&key) {
            tracing::warn!(
                kind = E::KIND.name,
                member = member.name,
                key,
                "extension key collides with a standard problem member; dropped"
            );
            continue;
        }
        extensions.insert(key.to_owned(), read(member, exception));
    }
    extensions
}
