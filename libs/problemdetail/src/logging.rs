//! Logging policy: where and at which level a problem occurrence is logged.
//!
//! A policy can be declared on the error type (`#[problem(logging(..))]`) and on
//! the module declaring it (`module_logging!` or the `modules` section of
//! [`ProblemDetailsConfig`](crate::config::ProblemDetailsConfig)). When both
//! exist, the type overrides the module field by field.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::LazyLock;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::kind::ExceptionKind;

/// Level a problem is logged at.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum LogLevel {
    /// `DEBUG` for `4xx`, `ERROR` with the error attached for everything else.
    #[default]
    Auto,
    Error,
    Warning,
    Info,
    Debug,
    Off,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level '{0}'; expected one of: auto, error, warning, info, debug, off")]
pub struct UnknownLogLevel(pub String);

impl FromStr for LogLevel {
    type Err = UnknownLogLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "error" => Ok(Self::Error),
            "warning" | "warn" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "off" => Ok(Self::Off),
            _ => Err(UnknownLogLevel(s.to_owned())),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = UnknownLogLevel;

    fn try_from(s: String) -> Result<Self, <Self as TryFrom<String>>::Error> {
        s.parse()
    }
}

/// A logging declaration. An empty channel and [`LogLevel::Auto`] mean "not declared".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Logging<'a> {
    pub to: &'a str,
    pub at: LogLevel,
}

impl<'a> Logging<'a> {
    #[must_use]
    pub const fn new(to: &'a str, at: LogLevel) -> Self {
        Self { to, at }
    }

    /// Field-wise override: declared fields of `self` win over `fallback`.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            to: if self.to.is_empty() { fallback.to } else { self.to },
            at: if self.at == LogLevel::Auto {
                fallback.at
            } else {
                self.at
            },
        }
    }
}

/// Owned logging declaration, as read from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub at: LogLevel,
}

impl LoggingConfig {
    #[must_use]
    pub fn as_logging(&self) -> Logging<'_> {
        Logging::new(&self.to, self.at)
    }
}

impl From<Logging<'_>> for LoggingConfig {
    fn from(logging: Logging<'_>) -> Self {
        Self {
            to: logging.to.to_owned(),
            at: logging.at,
        }
    }
}

/// Resolved policy for one error kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingPolicy {
    pub channel: String,
    pub level: LogLevel,
}

/// Module-wide declaration collected at link time, see [`module_logging!`](crate::module_logging).
#[derive(Debug)]
pub struct ModuleLogging {
    pub module: &'static str,
    pub logging: Logging<'static>,
}

impl ModuleLogging {
    #[must_use]
    pub const fn new(module: &'static str, logging: Logging<'static>) -> Self {
        Self { module, logging }
    }
}

inventory::collect!(ModuleLogging);

/// Declares the logging policy of every problem type in the calling module.
///
/// ```ignore
/// problemdetail::module_logging!(to = "billing", at = LogLevel::Warning);
/// problemdetail::module_logging!(at = LogLevel::Info);
/// ```
#[macro_export]
macro_rules! module_logging {
    (to = $to:literal, at = $at:expr $(,)?) => {
        $crate::inventory::submit! {
            $crate::logging::ModuleLogging::new(
                ::core::module_path!(),
                $crate::logging::Logging::new($to, $at),
            )
        }
    };
    (to = $to:literal $(,)?) => {
        $crate::module_logging!(to = $to, at = $crate::logging::LogLevel::Auto);
    };
    (at = $at:expr $(,)?) => {
        $crate::module_logging!(to = "", at = $at);
    };
}

static MODULE_OVERRIDES: LazyLock<RwLock<BTreeMap<String, LoggingConfig>>> =
    LazyLock::new(|| RwLock::new(BTreeMap::new()));

/// Installs a module-wide declaration that takes precedence over `module_logging!`.
pub fn set_module_logging(module: impl Into<String>, logging: LoggingConfig) {
    MODULE_OVERRIDES.write().insert(module.into(), logging);
}

/// Removes an installed module-wide declaration.
pub fn clear_module_logging(module: &str) {
    MODULE_OVERRIDES.write().remove(module);
}

/// Module-wide declaration for `module`, if any.
#[must_use]
pub fn module_logging_for(module: &str) -> Option<LoggingConfig> {
    if let Some(configured) = MODULE_OVERRIDES.read().get(module) {
        return Some(configured.clone());
    }
    inventory::iter::<ModuleLogging>
        .into_iter()
        .find(|declared| declared.module == module)
        .map(|declared| declared.logging.into())
}

/// Merges type-level and module-level declarations.
///
/// If only one is declared it is used as is; if both are, the type wins for each
/// field it actually declares.
#[must_use]
pub fn merge<'a>(on_type: Option<Logging<'a>>, on_module: Option<Logging<'a>>) -> Option<Logging<'a>> {
    match (on_type, on_module) {
        (None, module) => module,
        (kind, None) => kind,
        (Some(kind), Some(module)) => Some(kind.or(module)),
    }
}

/// Resolves the logging policy of `kind`.
#[must_use]
pub fn resolve_policy(kind: &ExceptionKind) -> LoggingPolicy {
    let module = module_logging_for(kind.module);
    let merged = merge(kind.logging, module.as_ref().map(LoggingConfig::as_logging));
    match merged {
        Some(logging) if !logging.to.is_empty() => LoggingPolicy {
            channel: logging.to.to_owned(),
            level: logging.at,
        },
        Some(logging) => LoggingPolicy {
            channel: kind.default_channel(),
            level: logging.at,
        },
        None => LoggingPolicy {
            channel: kind.default_channel(),
            level: LogLevel::Auto,
        },
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    crate::module_logging!(to = "declared-channel", at = LogLevel::Debug);

    #[test]
    fn parses_levels_case_insensitively() {
        assert_eq!("WARNING".parse::<LogLevel>(), Ok(LogLevel::Warning));
        assert_eq!("warn".parse::<LogLevel>(), Ok(LogLevel::Warning));
        assert_eq!("off".parse::<LogLevel>(), Ok(LogLevel::Off));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn serde_accepts_every_parsed_spelling() {
        let level: LogLevel = serde_json::from_str("\"WARN\"").unwrap();
        assert_eq!(level, LogLevel::Warning);
        assert_eq!(serde_json::to_string(&level).unwrap(), "\"warning\"");

        let err = serde_json::from_str::<LogLevel>("\"loud\"").unwrap_err();
        assert!(err.to_string().contains("unknown log level 'loud'"));
    }

    #[test]
    fn single_declaration_is_used_as_is() {
        let kind = Logging::new("", LogLevel::Info);
        assert_eq!(merge(Some(kind), None), Some(kind));
        assert_eq!(merge(None, Some(kind)), Some(kind));
        assert_eq!(merge(None, None), None);
    }

    #[test]
    fn type_channel_and_module_level_combine() {
        let merged = merge(
            Some(Logging::new("audit", LogLevel::Auto)),
            Some(Logging::new("", LogLevel::Warning)),
        );
        assert_eq!(merged, Some(Logging::new("audit", LogLevel::Warning)));
    }

    #[test]
    fn declared_type_fields_override_module() {
        let merged = merge(
            Some(Logging::new("audit", LogLevel::Info)),
            Some(Logging::new("billing", LogLevel::Off)),
        );
        assert_eq!(merged, Some(Logging::new("audit", LogLevel::Info)));
    }

    #[test]
    fn default_channel_is_the_type_path() {
        let kind = ExceptionKind::new("LostException", "shop::unconfigured");
        assert_eq!(
            resolve_policy(&kind),
            LoggingPolicy {
                channel: "shop::unconfigured::LostException".to_owned(),
                level: LogLevel::Auto,
            }
        );
    }

    #[test]
    fn declared_module_policy_is_found() {
        let kind = ExceptionKind::new("NearbyException", module_path!())
            .with_logging(Logging::new("", LogLevel::Error));
        assert_eq!(
            resolve_policy(&kind),
            LoggingPolicy {
                channel: "declared-channel".to_owned(),
                level: LogLevel::Error,
            }
        );
    }

    #[test]
    fn installed_override_beats_declaration() {
        let module = "shop::overridden";
        set_module_logging(
            module,
            LoggingConfig {
                to: "ops".to_owned(),
                at: LogLevel::Warning,
            },
        );
        let kind = ExceptionKind::new("StuckException", "shop::overridden");
        let policy = resolve_policy(&kind);
        clear_module_logging(module);

        assert_eq!(policy.channel, "ops");
        assert_eq!(policy.level, LogLevel::Warning);
        assert_eq!(module_logging_for(module), None);
    }
}
