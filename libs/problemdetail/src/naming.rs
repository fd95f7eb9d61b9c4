//! Type URI and title derivation from type names.

use crate::kind::ExceptionKind;
use crate::uri::ProblemUri;

/// Prefix of type URIs synthesized from a type name.
pub const URN_PROBLEM_TYPE_PREFIX: &str = "urn:problem-type:";

const EXCEPTION_SUFFIX: &str = "Exception";

/// Type URI of a kind.
///
/// An explicit `type_uri` is used verbatim. Otherwise the simple type name is
/// split at uppercase letters, joined with `-`, stripped of a trailing
/// `-Exception` and lowercased: `OutOfCreditException` becomes
/// `urn:problem-type:out-of-credit`.
#[must_use]
pub fn build_type_uri(kind: &ExceptionKind) -> ProblemUri {
    match kind.type_uri {
        Some(explicit) => ProblemUri::new_unchecked(explicit),
        None => ProblemUri::new_unchecked(format!(
            "{URN_PROBLEM_TYPE_PREFIX}{}",
            words_from_type_name(kind.name, '-').to_lowercase()
        )),
    }
}

/// Title of a kind: explicit `title`, else the words of the type name.
#[must_use]
pub fn build_title(kind: &ExceptionKind) -> String {
    kind.title
        .map_or_else(|| words_from_type_name(kind.name, ' '), str::to_owned)
}

fn words_from_type_name(name: &str, delimiter: char) -> String {
    let mut words = camel_to_words(name, delimiter);
    let suffix_len = delimiter.len_utf8() + EXCEPTION_SUFFIX.len();
    if words.len() >= suffix_len
        && words.ends_with(EXCEPTION_SUFFIX)
        && words[..words.len() - EXCEPTION_SUFFIX.len()].ends_with(delimiter)
    {
        words.truncate(words.len() - suffix_len);
    }
    words
}

fn camel_to_words(input: &str, delimiter: char) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    for c in input.chars() {
        if c.is_uppercase() && !out.is_empty() {
            out.push(delimiter);
        }
        out.push(c);
    }
    out
}
