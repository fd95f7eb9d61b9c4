//! URI references used for the `type` and `instance` members.
//!
//! Parsing follows RFC 3986 reference syntax strictly: spaces, unescaped
//! delimiters in the wrong component and broken percent escapes are rejected,
//! while non-ASCII printable characters are accepted.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// A URI reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProblemUri(String);

impl ProblemUri {
    /// Parses a URI reference.
    ///
    /// # Errors
    /// Returns [`UriSyntaxError`] pointing at the first offending character.
    pub fn parse(input: &str) -> Result<Self, UriSyntaxError> {
        check_uri_reference(input)?;
        Ok(Self(input.to_owned()))
    }

    /// Wraps a string that is a URI by construction or by contract.
    pub(crate) fn new_unchecked(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ProblemUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProblemUri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Invalid URI syntax.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason} at index {index}: {input}")]
pub struct UriSyntaxError {
    pub input: String,
    /// Character (not byte) offset of the failure.
    pub index: usize,
    pub reason: &'static str,
}

/// Turns an arbitrary string into a URI without ever failing.
///
/// 1. the string itself, if it parses;
/// 2. `urn:` + the string with spaces replaced by `+`, if that parses;
/// 3. `urn:invalid-uri-syntax?source=..&exception=..` carrying the input and the
///    first parse error, form-urlencoded.
#[must_use]
pub fn create_safe_uri(input: &str) -> ProblemUri {
    match ProblemUri::parse(input) {
        Ok(uri) => uri,
        Err(first) => match ProblemUri::parse(&format!("urn:{}", input.replace(' ', "+"))) {
            Ok(uri) => uri,
            Err(_) => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .append_pair("source", input)
                    .append_pair("exception", &first.to_string())
                    .finish();
                // form-urlencoding only emits unreserved characters, `+`, `&`, `=` and escapes
                ProblemUri::new_unchecked(format!("urn:invalid-uri-syntax?{query}"))
            }
        },
    }
}

#[derive(Clone, Copy)]
enum Component {
    Scheme,
    Authority,
    Path,
    Query,
    Fragment,
    Opaque,
}

impl Component {
    const fn illegal(self) -> &'static str {
        match self {
            Self::Scheme => "Illegal character in scheme name",
            Self::Authority => "Illegal character in authority",
            Self::Path => "Illegal character in path",
            Self::Query => "Illegal character in query",
            Self::Fragment => "Illegal character in fragment",
            Self::Opaque => "Illegal character in opaque part",
        }
    }
}

struct Checker<'a> {
    input: &'a str,
    chars: Vec<char>,
}

impl Checker<'_> {
    fn fail(&self, index: usize, reason: &'static str) -> UriSyntaxError {
        UriSyntaxError {
            input: self.input.to_owned(),
            index,
            reason,
        }
    }

    fn find(&self, from: usize, to: usize, stops: &[char]) -> usize {
        self.chars[from..to]
            .iter()
            .position(|c| stops.contains(c))
            .map_or(to, |p| from + p)
    }

    /// Checks `chars[from..to]` against the allowed set of `component`.
    fn check(&self, from: usize, to: usize, component: Component) -> Result<(), UriSyntaxError> {
        let mut i = from;
        while i < to {
            let c = self.chars[i];
            if c == '%' {
                let valid = i + 2 < to
                    && self.chars[i + 1].is_ascii_hexdigit()
                    && self.chars[i + 2].is_ascii_hexdigit();
                if !valid {
                    return Err(self.fail(i, "Malformed escape pair"));
                }
                i += 3;
                continue;
            }
            if !allowed(c, component) {
                return Err(self.fail(i, component.illegal()));
            }
            i += 1;
        }
        Ok(())
    }

    fn check_scheme(&self, end: usize) -> Result<(), UriSyntaxError> {
        if !self.chars[0].is_ascii_alphabetic() {
            return Err(self.fail(0, Component::Scheme.illegal()));
        }
        match self.chars[1..end]
            .iter()
            .position(|c| !(c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')))
        {
            Some(p) => Err(self.fail(p + 1, Component::Scheme.illegal())),
            None => Ok(()),
        }
    }

    /// Path, query and fragment of a hierarchical reference starting at `from`.
    fn check_hierarchical(&self, from: usize) -> Result<(), UriSyntaxError> {
        let n = self.chars.len();
        let mut path_start = from;
        if self.chars[from..].starts_with(&['/', '/']) {
            let auth_start = from + 2;
            let auth_end = self.find(auth_start, n, &['/', '?', '#']);
            if auth_start == auth_end && auth_end == n {
                return Err(self.fail(auth_start, "Expected authority"));
            }
            self.check(auth_start, auth_end, Component::Authority)?;
            path_start = auth_end;
        }
        let path_end = self.find(path_start, n, &['?', '#']);
        self.check(path_start, path_end, Component::Path)?;
        let mut rest = path_end;
        if rest < n && self.chars[rest] == '?' {
            let query_end = self.find(rest + 1, n, &['#']);
            self.check(rest + 1, query_end, Component::Query)?;
            rest = query_end;
        }
        if rest < n {
            self.check(rest + 1, n, Component::Fragment)?;
        }
        Ok(())
    }
}

fn allowed(c: char, component: Component) -> bool {
    let unreserved = c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~');
    let sub_delim = matches!(
        c,
        '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | ';' | '='
    );
    let other = !c.is_ascii() && !c.is_control() && !c.is_whitespace();
    if unreserved || sub_delim || other || matches!(c, ':' | '@') {
        return true;
    }
    match component {
        Component::Authority => matches!(c, '[' | ']'),
        Component::Path => c == '/',
        Component::Query | Component::Fragment | Component::Opaque => matches!(c, '/' | '?'),
        Component::Scheme => false,
    }
}

fn check_uri_reference(input: &str) -> Result<(), UriSyntaxError> {
    let checker = Checker {
        input,
        chars: input.chars().collect(),
    };
    let n = checker.chars.len();
    if n == 0 {
        return Ok(());
    }

    let colon = checker.find(0, n, &['/', '?', '#', ':']);
    if colon < n && checker.chars[colon] == ':' {
        if colon == 0 {
            return Err(checker.fail(0, "Expected scheme name"));
        }
        checker.check_scheme(colon)?;
        let ssp = colon + 1;
        if ssp == n {
            return Err(checker.fail(ssp, "Expected scheme-specific part"));
        }
        if checker.chars[ssp] != '/' {
            let fragment = checker.find(ssp, n, &['#']);
            checker.check(ssp, fragment, Component::Opaque)?;
            if fragment < n {
                checker.check(fragment + 1, n, Component::Fragment)?;
            }
            return Ok(());
        }
        return checker.check_hierarchical(ssp);
    }
    checker.check_hierarchical(0)
}
