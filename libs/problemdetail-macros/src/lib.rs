//! # problemdetail-macros
//!
//! Procedural macros for the `problemdetail` crate.
//!
//! ## `#[derive(ProblemDetail)]`
//!
//! Implements `problemdetail::ProblemDetail` for an error struct: a `'static`
//! kind descriptor built from `#[problem(...)]` container attributes, and a
//! member table built from marked fields and declared accessor methods. The
//! kind is also registered for reverse lookup by `type` URI.
//!
//! ### Example
//!
//! ```ignore
//! use problemdetail::ProblemDetail;
//!
//! #[derive(Debug, thiserror::Error, ProblemDetail)]
//! #[error("your current balance is {balance}, but that costs {cost}")]
//! #[problem(status = 403, title = "You do not have enough credit")]
//! #[problem(logging(to = "billing", at = "warning"))]
//! #[problem(detail(method = "summary"))]
//! pub struct OutOfCreditException {
//!     #[problem(extension)]
//!     pub balance: u32,
//!     #[problem(extension = "price")]
//!     pub cost: u32,
//!     #[problem(instance)]
//!     pub account: Option<String>,
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro_error2::proc_macro_error;
use syn::{DeriveInput, parse_macro_input};

mod problem_detail;

/// Derive macro for implementing `ProblemDetail`.
///
/// # Container attributes
///
/// - `status = 403` - HTTP status, must be in `100..=599`
/// - `type_uri = "https://..."` - explicit `type` URI
/// - `title = "..."` - explicit title
/// - `bad_argument` - the error is caused by invalid caller input (`400` unless `status` is set)
/// - `logging(to = "channel", at = "warning")` - either key optional; levels are
///   `auto`, `error`, `warning`, `info`, `debug`, `off`
/// - `detail(method = "name")`, `instance(method = "name")`,
///   `extension(method = "name", name = "key")` - zero-argument accessors feeding the body.
///   `fallible` marks an accessor returning `Result<T, E: Display>`; `params = N`
///   declares an accessor that takes arguments and is reported instead of invoked.
///
/// # Field attributes
///
/// - `#[problem(detail)]`, `#[problem(instance)]`
/// - `#[problem(extension)]` or `#[problem(extension = "key")]`
///
/// Marked values must implement `serde::Serialize`.
#[proc_macro_derive(ProblemDetail, attributes(problem))]
#[proc_macro_error]
pub fn derive_problem_detail(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    problem_detail::expand_derive_problem_detail(input).into()
}
