//! RFC 9457 problem details for Rust errors.
//!
//! Implement [`ProblemDetail`] for an error type (usually with
//! `#[derive(ProblemDetail)]`) and wrap each occurrence in a
//! [`ProblemDetails`] builder to get:
//! - the HTTP status, `type` URI, title, detail, instance and extensions
//! - the `application/problem+json` media type
//! - a log record routed to the channel and level resolved for the error's kind
//!
//! ```ignore
//! #[derive(Debug, thiserror::Error, ProblemDetail)]
//! #[error("not enough credit")]
//! #[problem(status = 403)]
//! struct OutOfCreditException {
//!     #[problem(extension)]
//!     balance: u32,
//! }
//!
//! let problem = ProblemDetails::new(&err);
//! problem.log();
//! assert_eq!(problem.body().type_uri.as_str(), "urn:problem-type:out-of-credit");
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate self as problemdetail;

pub mod body;
pub mod builder;
pub mod builtin;
pub mod config;
pub mod framework;
pub mod kind;
pub mod logging;
pub mod members;
pub mod naming;
pub mod registry;
pub mod sink;
pub mod uri;

#[cfg(feature = "axum")]
pub mod axum;

pub use body::{APPLICATION_PROBLEM_JSON, ProblemBody};
pub use builder::ProblemDetails;
pub use config::{ConfigError, ProblemDetailsConfig};
pub use framework::{Framework, HttpFramework};
pub use kind::{AccessError, ExceptionKind, Marker, Member, Origin, ProblemDetail, member_value};
pub use logging::{LogLevel, Logging, LoggingPolicy};
pub use naming::{URN_PROBLEM_TYPE_PREFIX, build_title, build_type_uri};
pub use registry::{ProblemTypeRegistry, global_registry};
pub use sink::{LogRecord, LogSink, TracingSink};
pub use uri::{ProblemUri, UriSyntaxError, create_safe_uri};

#[cfg(feature = "axum")]
pub use crate::axum::ProblemResponse;

#[cfg(feature = "derive")]
pub use problemdetail_macros::ProblemDetail;

#[doc(hidden)]
pub use inventory;
#[doc(hidden)]
pub use serde_json;
