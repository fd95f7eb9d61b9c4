//! Axum integration: return problem-detail errors directly from handlers.

use ::axum::http::HeaderValue;
use ::axum::http::header::CONTENT_TYPE;
use ::axum::response::{IntoResponse, Response};

use crate::APPLICATION_PROBLEM_JSON;
use crate::builder::ProblemDetails;
use crate::kind::ProblemDetail;

/// Handler error rendered as `application/problem+json` and logged per its policy.
///
/// ```ignore
/// async fn buy(Path(id): Path<u32>) -> Result<Json<Order>, ProblemResponse<OutOfCreditException>> {
///     Ok(Json(shop.buy(id)?))
/// }
/// ```
#[derive(Debug)]
pub struct ProblemResponse<E>(pub E);

impl<E: ProblemDetail> From<E> for ProblemResponse<E> {
    fn from(exception: E) -> Self {
        Self(exception)
    }
}

impl<E: ProblemDetail> IntoResponse for ProblemResponse<E> {
    fn into_response(self) -> Response {
        let problem = ProblemDetails::new(&self.0);
        problem.log();

        let mut resp = ::axum::Json(problem.body()).into_response();
        *resp.status_mut() = problem.status();
        let content_type = HeaderValue::from_str(problem.media_type())
            .unwrap_or_else(|_| HeaderValue::from_static(APPLICATION_PROBLEM_JSON));
        resp.headers_mut().insert(CONTENT_TYPE, content_type);
        resp
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::kind::ExceptionKind;
    use ::axum::http::StatusCode;

    #[derive(Debug, thiserror::Error)]
    #[error("no seats left on flight {0}")]
    struct SoldOutException(u32);

    impl ProblemDetail for SoldOutException {
        const KIND: &'static ExceptionKind =
            &ExceptionKind::new("SoldOutException", "travel").with_status(409);
    }

    fn book(flight: u32) -> Result<(), SoldOutException> {
        Err(SoldOutException(flight))
    }

    fn handler() -> Result<(), ProblemResponse<SoldOutException>> {
        book(7)?;
        Ok(())
    }

    #[test]
    fn problem_response_sets_status_and_content_type() {
        let resp = handler().unwrap_err().into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let ct = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        assert_eq!(ct, APPLICATION_PROBLEM_JSON);
    }
}
