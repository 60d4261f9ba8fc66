//! Editor configuration
//!
//! Defaults follow the forum composer: `@` trigger, `company:` / `contact:` /
//! `topic:` prefixes, two-character minimum query, eight suggestions.

use crate::error::ConfigError;
use crate::types::TriggerKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Maps a typed prefix after the trigger symbol to a kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerPrefix {
    /// Prefix text, matched case-insensitively (e.g. `company:`)
    pub prefix: String,
    /// Kind selected by the prefix
    pub kind: TriggerKind,
}

impl TriggerPrefix {
    /// Create new prefix mapping
    #[inline]
    #[must_use]
    pub fn new(prefix: impl Into<String>, kind: TriggerKind) -> Self {
        Self {
            prefix: prefix.into(),
            kind,
        }
    }

    /// Strip this prefix from `raw`, returning the remainder on match
    #[must_use]
    pub fn strip<'a>(&self, raw: &'a str) -> Option<&'a str> {
        let head = raw.get(..self.prefix.len())?;
        if head.eq_ignore_ascii_case(&self.prefix) {
            raw.get(self.prefix.len()..)
        } else {
            None
        }
    }
}

/// Mention editor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Character that opens a mention
    pub trigger_symbol: char,
    /// Kind prefixes, checked in order
    pub prefixes: Vec<TriggerPrefix>,
    /// Kind used for unprefixed triggers without a UI hint
    pub default_kind: TriggerKind,
    /// Minimum query length (characters) before searching
    pub min_query_len: usize,
    /// Maximum suggestions kept from a search
    pub max_suggestions: usize,
    /// Debounce window in milliseconds
    pub debounce_ms: u64,
    /// Search timeout in milliseconds
    pub search_timeout_ms: u64,
}

impl EditorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML and validate it
    ///
    /// # Errors
    /// - `ConfigError::Parse` on malformed TOML
    /// - `ConfigError::Invalid` if a constraint is violated
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check constraints
    ///
    /// # Errors
    /// `ConfigError::Invalid` describing the first violation
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trigger_symbol.is_whitespace() {
            return Err(ConfigError::Invalid(
                "trigger_symbol must not be whitespace".to_string(),
            ));
        }
        if self.min_query_len == 0 {
            return Err(ConfigError::Invalid(
                "min_query_len must be at least 1".to_string(),
            ));
        }
        if self.max_suggestions == 0 {
            return Err(ConfigError::Invalid(
                "max_suggestions must be at least 1".to_string(),
            ));
        }
        if let Some(p) = self
            .prefixes
            .iter()
            .find(|p| p.prefix.is_empty() || p.prefix.chars().any(char::is_whitespace))
        {
            return Err(ConfigError::Invalid(format!(
                "prefix {:?} must be non-empty and free of whitespace",
                p.prefix
            )));
        }
        Ok(())
    }

    /// With trigger symbol
    #[inline]
    #[must_use]
    pub fn with_trigger_symbol(mut self, symbol: char) -> Self {
        self.trigger_symbol = symbol;
        self
    }

    /// With prefix table
    #[inline]
    #[must_use]
    pub fn with_prefixes(mut self, prefixes: Vec<TriggerPrefix>) -> Self {
        self.prefixes = prefixes;
        self
    }

    /// With default kind
    #[inline]
    #[must_use]
    pub fn with_default_kind(mut self, kind: TriggerKind) -> Self {
        self.default_kind = kind;
        self
    }

    /// With minimum query length
    #[inline]
    #[must_use]
    pub fn with_min_query_len(mut self, len: usize) -> Self {
        self.min_query_len = len;
        self
    }

    /// With maximum suggestions
    #[inline]
    #[must_use]
    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max;
        self
    }

    /// With debounce window
    #[inline]
    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce_ms = u64::try_from(debounce.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// With search timeout
    #[inline]
    #[must_use]
    pub fn with_search_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Debounce window
    #[inline]
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Search timeout
    #[inline]
    #[must_use]
    pub fn search_timeout(&self) -> Duration {
        Duration::from_millis(self.search_timeout_ms)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            trigger_symbol: '@',
            prefixes: vec![
                TriggerPrefix::new("company:", TriggerKind::Company),
                TriggerPrefix::new("contact:", TriggerKind::Contact),
                TriggerPrefix::new("topic:", TriggerKind::Topic),
            ],
            default_kind: TriggerKind::Any,
            min_query_len: 2,
            max_suggestions: 8,
            debounce_ms: 250,
            search_timeout_ms: 5_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.debounce(), Duration::from_millis(250));
        assert_eq!(config.min_query_len, 2);
    }

    #[test]
    fn prefix_strip_is_case_insensitive() {
        let p = TriggerPrefix::new("company:", TriggerKind::Company);
        assert_eq!(p.strip("Company:acme"), Some("acme"));
        assert_eq!(p.strip("company:"), Some(""));
        assert_eq!(p.strip("comp"), None);
        assert_eq!(p.strip("contact:x"), None);
    }

    #[test]
    fn prefix_strip_respects_char_boundaries() {
        let p = TriggerPrefix::new("ab", TriggerKind::Topic);
        assert_eq!(p.strip("aé"), None);
    }

    #[test]
    fn from_toml_partial_overrides() {
        let config = EditorConfig::from_toml_str(
            r#"
            min_query_len = 3
            debounce_ms = 300
            default_kind = "company"
            "#,
        )
        .unwrap();

        assert_eq!(config.min_query_len, 3);
        assert_eq!(config.debounce_ms, 300);
        assert_eq!(config.default_kind, TriggerKind::Company);
        assert_eq!(config.trigger_symbol, '@');
        assert_eq!(config.prefixes.len(), 3);
    }

    #[test]
    fn from_toml_custom_prefixes() {
        let config = EditorConfig::from_toml_str(
            r#"
            [[prefixes]]
            prefix = "org:"
            kind = "company"
            "#,
        )
        .unwrap();

        assert_eq!(config.prefixes, vec![TriggerPrefix::new("org:", TriggerKind::Company)]);
    }

    #[test]
    fn from_toml_rejects_invalid() {
        assert!(matches!(
            EditorConfig::from_toml_str("min_query_len = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EditorConfig::from_toml_str("trigger_symbol = \" \""),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EditorConfig::from_toml_str("min_query_len = \"two\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn builder_durations() {
        let config = EditorConfig::new()
            .with_debounce(Duration::from_millis(300))
            .with_search_timeout(Duration::from_secs(2));
        assert_eq!(config.debounce_ms, 300);
        assert_eq!(config.search_timeout(), Duration::from_secs(2));
    }
}
