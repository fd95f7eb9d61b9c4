//! Extension points supplied by the layer embedding problem details into a
//! web framework.

use std::borrow::Cow;

use http::StatusCode;

use crate::config::ProblemDetailsConfig;

/// Framework specifics consulted while building a problem body.
pub trait Framework {
    /// Status used when the error declares none and is not a bad argument.
    fn fallback_status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    /// Whether `message` is just the boilerplate phrase of `status`, which would
    /// only repeat the title.
    fn has_default_message(&self, status: StatusCode, message: &str) -> bool;

    /// Wire format subtype, e.g. `json` or `xml`.
    fn media_type_subtype(&self) -> Cow<'_, str>;
}

/// Plain HTTP embedding serving JSON bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpFramework {
    subtype: String,
}

impl HttpFramework {
    #[must_use]
    pub fn new(subtype: impl Into<String>) -> Self {
        Self {
            subtype: subtype.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &ProblemDetailsConfig) -> Self {
        Self::new(config.media_subtype.clone())
    }
}

impl Default for HttpFramework {
    fn default() -> Self {
        Self::new("json")
    }
}

impl Framework for HttpFramework {
    fn has_default_message(&self, status: StatusCode, message: &str) -> bool {
        let Some(reason) = status.canonical_reason() else {
            return false;
        };
        let code = status.as_u16();
        message == reason
            || message == format!("{code} {reason}")
            || message == format!("HTTP {code} {reason}")
    }

    fn media_type_subtype(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.subtype)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn recognizes_status_boilerplate() {
        let framework = HttpFramework::default();
        assert!(framework.has_default_message(StatusCode::NOT_FOUND, "Not Found"));
        assert!(framework.has_default_message(StatusCode::NOT_FOUND, "404 Not Found"));
        assert!(framework.has_default_message(StatusCode::NOT_FOUND, "HTTP 404 Not Found"));
        assert!(!framework.has_default_message(StatusCode::NOT_FOUND, "order 42 not found"));
        assert!(!framework.has_default_message(StatusCode::BAD_REQUEST, "Not Found"));
    }

    #[test]
    fn uncommon_status_has_no_boilerplate() {
        let status = StatusCode::from_u16(599).unwrap();
        assert!(!HttpFramework::default().has_default_message(status, "599"));
    }

    #[test]
    fn fallback_is_internal_server_error() {
        assert_eq!(
            HttpFramework::default().fallback_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn subtype_comes_from_config() {
        let config = ProblemDetailsConfig {
            media_subtype: "xml".to_owned(),
            ..ProblemDetailsConfig::default()
        };
        assert_eq!(HttpFramework::from_config(&config).media_type_subtype(), "xml");
    }
}
