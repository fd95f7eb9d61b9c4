//! Problem metadata for standard library errors caused by invalid input.

use crate::kind::{ExceptionKind, ProblemDetail};
use crate::registry::KindRegistration;

macro_rules! bad_argument {
    ($($ty:ty => $name:literal in $module:literal),* $(,)?) => {
        $(
            impl ProblemDetail for $ty {
                const KIND: &'static ExceptionKind =
                    &ExceptionKind::new($name, $module).bad_argument();
            }

            inventory::submit! {
                KindRegistration::new(<$ty as ProblemDetail>::KIND)
            }
        )*
    };
}

bad_argument! {
    std::num::ParseIntError => "ParseIntError" in "core::num",
    std::num::ParseFloatError => "ParseFloatError" in "core::num",
    std::num::TryFromIntError => "TryFromIntError" in "core::num",
    std::str::ParseBoolError => "ParseBoolError" in "core::str",
    std::str::Utf8Error => "Utf8Error" in "core::str",
    std::char::ParseCharError => "ParseCharError" in "core::char",
    std::string::FromUtf8Error => "FromUtf8Error" in "alloc::string",
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use http::StatusCode;

    use crate::builder::ProblemDetails;

    #[test]
    fn parse_errors_are_bad_requests() {
        let err = "forty-two".parse::<u32>().unwrap_err();
        let problem = ProblemDetails::new(&err);
        let body = problem.body();

        assert_eq!(problem.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body.type_uri.as_str(), "urn:problem-type:parse-int-error");
        assert_eq!(body.title, "Parse Int Error");
        assert_eq!(body.detail.as_deref(), Some("invalid digit found in string"));
    }

    #[test]
    fn bool_parse_error_uses_its_message() {
        let err = "maybe".parse::<bool>().unwrap_err();
        let problem = ProblemDetails::new(&err);
        assert_eq!(problem.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            problem.body().detail.as_deref(),
            Some("provided string was not `true` or `false`")
        );
    }
}
