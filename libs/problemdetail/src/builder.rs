//! Per-occurrence problem detail builder.

use std::cell::OnceCell;

use http::StatusCode;
use tracing::Level;

use crate::body::ProblemBody;
use crate::framework::{Framework, HttpFramework};
use crate::kind::ProblemDetail;
use crate::logging::{LogLevel, LoggingPolicy, resolve_policy};
use crate::members::{collect_detail, collect_extensions, resolve_instance};
use crate::naming::{build_title, build_type_uri};
use crate::sink::{LogRecord, LogSink, TracingSink};

/// Translates one error occurrence into a problem body and a log record.
///
/// Every derived value is computed on first access and cached for the lifetime
/// of the builder, so member accessors are invoked at most once. The builder is
/// meant to be owned by the code handling a single occurrence and is not `Sync`.
///
/// ```ignore
/// let problem = ProblemDetails::new(&err);
/// problem.log();
/// let status = problem.status();
/// let body = serde_json::to_string(problem.body())?;
/// ```
pub struct ProblemDetails<'e, E, F = HttpFramework> {
    exception: &'e E,
    framework: F,
    status: OnceCell<StatusCode>,
    body: OnceCell<ProblemBody>,
    media_type: OnceCell<String>,
    log_message: OnceCell<String>,
}

impl<'e, E: ProblemDetail> ProblemDetails<'e, E> {
    #[must_use]
    pub fn new(exception: &'e E) -> Self {
        Self::with_framework(exception, HttpFramework::default())
    }
}

impl<'e, E: ProblemDetail, F: Framework> ProblemDetails<'e, E, F> {
    #[must_use]
    pub fn with_framework(exception: &'e E, framework: F) -> Self {
        Self {
            exception,
            framework,
            status: OnceCell::new(),
            body: OnceCell::new(),
            media_type: OnceCell::new(),
            log_message: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn exception(&self) -> &'e E {
        self.exception
    }

    /// Declared status, else `400` for bad arguments, else the framework fallback.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        *self.status.get_or_init(|| self.build_status())
    }

    #[must_use]
    pub fn body(&self) -> &ProblemBody {
        self.body.get_or_init(|| self.build_body())
    }

    /// `application/problem+<subtype>`, or `text/html` for `xhtml+xml`.
    #[must_use]
    pub fn media_type(&self) -> &str {
        self.media_type.get_or_init(|| self.build_media_type())
    }

    #[must_use]
    pub fn log_message(&self) -> &str {
        self.log_message
            .get_or_init(|| format!("ProblemDetail:\n{}\nException", self.body().format_lines()))
    }

    #[must_use]
    pub fn logging_policy(&self) -> LoggingPolicy {
        resolve_policy(E::KIND)
    }

    /// Logs the occurrence through `tracing`.
    pub fn log(&self) -> &Self {
        self.log_to(&TracingSink)
    }

    /// Logs the occurrence to `sink`. Each call emits a record.
    pub fn log_to(&self, sink: &dyn LogSink) -> &Self {
        let policy = self.logging_policy();
        let (level, with_error) = match policy.level {
            LogLevel::Auto if self.status().is_client_error() => (Level::DEBUG, false),
            LogLevel::Auto | LogLevel::Error => (Level::ERROR, true),
            LogLevel::Warning => (Level::WARN, true),
            LogLevel::Info => (Level::INFO, false),
            LogLevel::Debug => (Level::DEBUG, false),
            LogLevel::Off => return self,
        };
        sink.emit(&LogRecord {
            channel: &policy.channel,
            level,
            status: self.status(),
            message: self.log_message(),
            error: with_error.then_some(self.exception as &(dyn std::error::Error + 'static)),
        });
        self
    }

    fn build_status(&self) -> StatusCode {
        let kind = E::KIND;
        if let Some(code) = kind.status {
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        } else if kind.bad_argument {
            StatusCode::BAD_REQUEST
        } else {
            self.framework.fallback_status()
        }
    }

    fn build_body(&self) -> ProblemBody {
        let kind = E::KIND;
        ProblemBody {
            type_uri: build_type_uri(kind),
            title: build_title(kind),
            status: self.status(),
            detail: self.build_detail(),
            instance: resolve_instance(self.exception),
            extensions: collect_extensions(self.exception),
        }
    }

    fn build_detail(&self) -> Option<String> {
        if let Some(detail) = collect_detail(self.exception) {
            return Some(detail);
        }
        let message = self.exception.to_string();
        if message.is_empty() || self.framework.has_default_message(self.status(), &message) {
            None
        } else {
            Some(message)
        }
    }

    fn build_media_type(&self) -> String {
        let subtype = self.framework.media_type_subtype();
        // browsers rank `application/problem+xhtml+xml` below `*/*` and download it
        if subtype == "xhtml+xml" {
            "text/html".to_owned()
        } else {
            format!("application/problem+{subtype}")
        }
    }
}

impl<E: std::fmt::Debug, F> std::fmt::Debug for ProblemDetails<'_, E, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProblemDetails")
            .field("exception", self.exception)
            .field("status", &self.status.get())
            .field("body", &self.body.get())
            .finish_non_exhaustive()
    }
}
