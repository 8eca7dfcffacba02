// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;

/// Which characters count as whitespace between tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhitespaceClass {
    /// The classic C-locale set: space, `\t`, `\n`, `\v`, `\f`, `\r`
    Ascii,
    /// Everything `char::is_whitespace` accepts
    Unicode,
}

impl WhitespaceClass {
    /// The predicate the tokenizer uses for this class
    pub fn predicate(self) -> fn(char) -> bool {
        match self {
            WhitespaceClass::Ascii => crate::lexical::chars::is_c_whitespace,
            WhitespaceClass::Unicode => char::is_whitespace,
        }
    }
}

impl Default for WhitespaceClass {
    fn default() -> Self {
        WhitespaceClass::Ascii
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexicalPreferences {
    /// Whitespace classification used to separate tokens
    pub whitespace: WhitespaceClass,

    /// Whether to collect per-kind token metrics
    pub collect_metrics: bool,

    /// Whether to emit a debug event for every token produced
    pub log_token_events: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            whitespace: WhitespaceClass::Ascii,
            collect_metrics: true,
            log_token_events: false,
        }
    }
}

impl LexicalPreferences {
    /// Defaults overridden by `RADIX_LEXICAL_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable name
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            whitespace: lookup(env_vars::LEXICAL_WHITESPACE)
                .and_then(|v| parse_whitespace_class(&v))
                .unwrap_or(defaults.whitespace),
            collect_metrics: lookup(env_vars::LEXICAL_COLLECT_METRICS)
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.collect_metrics),
            log_token_events: lookup(env_vars::LEXICAL_LOG_TOKENS)
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.log_token_events),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging (user preference)
    pub use_structured_logging: bool,

    /// User preferred minimum log level
    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: false,
            min_log_level: LogLevel::Info,
        }
    }
}

impl LoggingPreferences {
    /// Defaults overridden by `RADIX_LOGGING_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            use_structured_logging: lookup(env_vars::LOGGING_USE_STRUCTURED)
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.use_structured_logging),
            min_log_level: lookup(env_vars::LOGGING_MIN_LEVEL)
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(defaults.min_log_level),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Convert to events::LogLevel for compatibility
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

fn parse_whitespace_class(class: &str) -> Option<WhitespaceClass> {
    match class.to_lowercase().as_str() {
        "ascii" | "c" => Some(WhitespaceClass::Ascii),
        "unicode" => Some(WhitespaceClass::Unicode),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub lexical: LexicalPreferences,
    pub logging: LoggingPreferences,
}

/// Environment variable names for configuration
pub mod env_vars {
    // Lexical
    pub const LEXICAL_WHITESPACE: &str = "RADIX_LEXICAL_WHITESPACE";
    pub const LEXICAL_COLLECT_METRICS: &str = "RADIX_LEXICAL_COLLECT_METRICS";
    pub const LEXICAL_LOG_TOKENS: &str = "RADIX_LEXICAL_LOG_TOKENS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "RADIX_LOGGING_USE_STRUCTURED";
    pub const LOGGING_MIN_LEVEL: &str = "RADIX_LOGGING_MIN_LEVEL";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("1"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("3"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("invalid"), None);
    }

    #[test]
    fn test_whitespace_class_parsing() {
        assert_eq!(parse_whitespace_class("ascii"), Some(WhitespaceClass::Ascii));
        assert_eq!(parse_whitespace_class("C"), Some(WhitespaceClass::Ascii));
        assert_eq!(parse_whitespace_class("Unicode"), Some(WhitespaceClass::Unicode));
        assert_eq!(parse_whitespace_class("locale"), None);
    }

    #[test]
    fn test_whitespace_predicates_differ_on_unicode_space() {
        let ascii = WhitespaceClass::Ascii.predicate();
        let unicode = WhitespaceClass::Unicode.predicate();

        assert!(ascii('\t') && unicode('\t'));
        assert!(!ascii('\u{00A0}'));
        assert!(unicode('\u{00A0}'));
    }

    #[test]
    fn test_preferences_roundtrip_through_toml() {
        let config = RuntimeConfig {
            lexical: LexicalPreferences {
                whitespace: WhitespaceClass::Unicode,
                collect_metrics: false,
                log_token_events: true,
            },
            logging: LoggingPreferences {
                use_structured_logging: true,
                min_log_level: LogLevel::Debug,
            },
        };

        let text = toml::to_string(&config).unwrap();
        let parsed: RuntimeConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.lexical.whitespace, WhitespaceClass::Unicode);
        assert!(!parsed.lexical.collect_metrics);
        assert_eq!(parsed.logging.min_log_level, LogLevel::Debug);
    }

    #[test]
    fn test_defaults_ignore_environment() {
        let preferences = LexicalPreferences::default();
        assert_eq!(preferences.whitespace, WhitespaceClass::Ascii);
        assert!(preferences.collect_metrics);
        assert!(!preferences.log_token_events);

        let logging = LoggingPreferences::default();
        assert!(!logging.use_structured_logging);
        assert_eq!(logging.min_log_level, LogLevel::Info);
    }

    #[test]
    fn test_lexical_preferences_from_lookup() {
        let vars = std::collections::HashMap::from([
            (env_vars::LEXICAL_WHITESPACE, "unicode"),
            (env_vars::LEXICAL_COLLECT_METRICS, "false"),
            (env_vars::LEXICAL_LOG_TOKENS, "not-a-bool"),
        ]);
        let preferences =
            LexicalPreferences::from_lookup(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(preferences.whitespace, WhitespaceClass::Unicode);
        assert!(!preferences.collect_metrics);
        assert!(!preferences.log_token_events);
    }

    #[test]
    fn test_logging_preferences_from_lookup() {
        let vars = std::collections::HashMap::from([
            (env_vars::LOGGING_USE_STRUCTURED, "true"),
            (env_vars::LOGGING_MIN_LEVEL, "debug"),
        ]);
        let preferences =
            LoggingPreferences::from_lookup(|name| vars.get(name).map(|v| v.to_string()));

        assert!(preferences.use_structured_logging);
        assert_eq!(preferences.min_log_level, LogLevel::Debug);

        let empty = LoggingPreferences::from_lookup(|_| None);
        assert_eq!(empty.min_log_level, LogLevel::Info);
    }
}
