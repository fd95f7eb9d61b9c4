//! Declarative metadata of an error type and its marked members.
//!
//! An error participates in problem-detail translation by implementing
//! [`ProblemDetail`]: a `'static` [`ExceptionKind`] describing the type, and a
//! `'static` table of [`Member`]s describing which fields and accessors feed the
//! `detail`, `instance` and extension entries of the body. Both are normally
//! generated by `#[derive(ProblemDetail)]`.

use serde::Serialize;
use serde_json::Value;

use crate::logging::Logging;

/// Metadata attached to an error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExceptionKind {
    /// Simple type name, e.g. `OutOfCreditException`.
    pub name: &'static str,
    /// Module path the type is declared in, as produced by `module_path!()`.
    pub module: &'static str,
    pub status: Option<u16>,
    pub type_uri: Option<&'static str>,
    pub title: Option<&'static str>,
    pub logging: Option<Logging<'static>>,
    /// Errors caused by an invalid argument from the caller map to `400 Bad Request`.
    pub bad_argument: bool,
}

impl ExceptionKind {
    #[must_use]
    pub const fn new(name: &'static str, module: &'static str) -> Self {
        Self {
            name,
            module,
            status: None,
            type_uri: None,
            title: None,
            logging: None,
            bad_argument: false,
        }
    }

    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub const fn with_type_uri(mut self, type_uri: &'static str) -> Self {
        self.type_uri = Some(type_uri);
        self
    }

    #[must_use]
    pub const fn with_title(mut self, title: &'static str) -> Self {
        self.title = Some(title);
        self
    }

    #[must_use]
    pub const fn with_logging(mut self, logging: Logging<'static>) -> Self {
        self.logging = Some(logging);
        self
    }

    #[must_use]
    pub const fn bad_argument(mut self) -> Self {
        self.bad_argument = true;
        self
    }

    /// Log channel used when neither the type nor its module names one.
    #[must_use]
    pub fn default_channel(&self) -> String {
        format!("{}::{}", self.module, self.name)
    }
}

/// Where a member value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Field,
    /// An accessor method. Only zero-argument accessors can be read.
    Method { params: usize },
}

/// Role of a member in the problem body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Detail,
    Instance,
    /// Extension entry, optionally renamed.
    Extension(Option<&'static str>),
}

/// Reads a member value out of an error instance.
pub type Reader<E> = fn(&E) -> Result<Value, AccessError>;

/// One marked member of an error type.
pub struct Member<E> {
    pub name: &'static str,
    pub origin: Origin,
    pub marker: Marker,
    pub read: Reader<E>,
}

impl<E> Member<E> {
    #[must_use]
    pub const fn field(name: &'static str, marker: Marker, read: Reader<E>) -> Self {
        Self {
            name,
            origin: Origin::Field,
            marker,
            read,
        }
    }

    #[must_use]
    pub const fn method(name: &'static str, marker: Marker, read: Reader<E>) -> Self {
        Self {
            name,
            origin: Origin::Method { params: 0 },
            marker,
            read,
        }
    }

    /// Declares the accessor arity. Accessors taking parameters are never invoked.
    #[must_use]
    pub const fn with_params(mut self, params: usize) -> Self {
        self.origin = Origin::Method { params };
        self
    }

    /// Key used for an extension entry.
    #[must_use]
    pub fn extension_name(&self) -> &'static str {
        match self.marker {
            Marker::Extension(Some(name)) if !name.is_empty() => name,
            _ => self.name,
        }
    }
}

impl<E> Clone for Member<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Member<E> {}

impl<E> std::fmt::Debug for Member<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("origin", &self.origin)
            .field("marker", &self.marker)
            .finish_non_exhaustive()
    }
}

/// Failure to read a member value.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("expected no args but got {0}")]
    Arity(usize),
    #[error("{0}")]
    Serialize(#[from] serde_json::Error),
    #[error("{0}")]
    Failed(String),
}

/// An error type that can be translated into a problem detail body.
///
/// Usually derived:
///
/// ```ignore
/// #[derive(Debug, thiserror::Error, ProblemDetail)]
/// #[error("you need {needed} more credits")]
/// #[problem(status = 402)]
/// pub struct OutOfCreditException {
///     #[problem(extension)]
///     needed: u32,
///     #[problem(instance)]
///     order: String,
/// }
/// ```
pub trait ProblemDetail: std::error::Error + Sized + 'static {
    const KIND: &'static ExceptionKind;

    /// Marked members, in declaration order.
    #[must_use]
    fn members() -> &'static [Member<Self>] {
        &[]
    }
}

/// Converts a member value into the JSON value stored in the body.
///
/// # Errors
/// Returns [`AccessError::Serialize`] if the value cannot be represented as JSON.
pub fn member_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, AccessError> {
    Ok(serde_json::to_value(value)?)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::logging::LogLevel;

    #[test]
    fn kind_builder_sets_metadata() {
        const KIND: ExceptionKind = ExceptionKind::new("NotThereException", "shop::orders")
            .with_status(404)
            .with_title("Not There")
            .with_logging(Logging::new("audit", LogLevel::Info));

        assert_eq!(KIND.status, Some(404));
        assert_eq!(KIND.title, Some("Not There"));
        assert_eq!(KIND.type_uri, None);
        assert!(!KIND.bad_argument);
        assert_eq!(KIND.logging.map(|l| l.to), Some("audit"));
        assert_eq!(KIND.default_channel(), "shop::orders::NotThereException");
    }

    #[test]
    fn extension_name_prefers_override() {
        fn read(_: &()) -> Result<Value, AccessError> {
            Ok(Value::Null)
        }

        let plain = Member::field("balance", Marker::Extension(None), read);
        let renamed = Member::field("balance", Marker::Extension(Some("credit")), read);
        let blank = Member::field("balance", Marker::Extension(Some("")), read);

        assert_eq!(plain.extension_name(), "balance");
        assert_eq!(renamed.extension_name(), "credit");
        assert_eq!(blank.extension_name(), "balance");
    }

    #[test]
    fn with_params_turns_member_into_method() {
        fn read(_: &()) -> Result<Value, AccessError> {
            Ok(Value::Null)
        }

        let member = Member::method("summary", Marker::Detail, read).with_params(2);
        assert_eq!(member.origin, Origin::Method { params: 2 });
    }
}
