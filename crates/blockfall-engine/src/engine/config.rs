use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, core::MAX_SHAPE_SIZE};

/// Tunable parameters of a [`GameSession`](super::GameSession).
///
/// Every field has a default, so a JSON file only needs the values it changes:
///
/// ```
/// use blockfall_engine::SessionConfig;
///
/// let config: SessionConfig = serde_json::from_str(r#"{ "rows": 24 }"#).unwrap();
/// assert_eq!(config.cols, 10);
/// assert_eq!(config.rows, 24);
/// assert_eq!(config.drop_interval_ms, 1000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Board width in cells.
    pub cols: usize,
    /// Board height in cells.
    pub rows: usize,
    /// Time between automatic drops, in milliseconds.
    pub drop_interval_ms: u64,
}

impl SessionConfig {
    /// Smallest board side that fits every piece in every orientation.
    pub const MIN_SIZE: usize = MAX_SHAPE_SIZE;
    pub const MAX_SIZE: usize = 64;

    /// Checks that the board fits every piece and that gravity is enabled.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let range = Self::MIN_SIZE..=Self::MAX_SIZE;
        if !range.contains(&self.cols) {
            return Err(ConfigError::ColsOutOfRange { cols: self.cols });
        }
        if !range.contains(&self.rows) {
            return Err(ConfigError::RowsOutOfRange { rows: self.rows });
        }
        if self.drop_interval_ms == 0 {
            return Err(ConfigError::ZeroDropInterval);
        }
        Ok(())
    }

    #[must_use]
    pub fn drop_interval(&self) -> Duration {
        Duration::from_millis(self.drop_interval_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cols: 10,
            rows: 20,
            drop_interval_ms: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.drop_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_validate_rejects_bad_dimensions() {
        let narrow = SessionConfig {
            cols: 3,
            ..SessionConfig::default()
        };
        assert!(matches!(
            narrow.validate(),
            Err(ConfigError::ColsOutOfRange { cols: 3 })
        ));

        let tall = SessionConfig {
            rows: 65,
            ..SessionConfig::default()
        };
        assert!(matches!(
            tall.validate(),
            Err(ConfigError::RowsOutOfRange { rows: 65 })
        ));

        let frozen = SessionConfig {
            drop_interval_ms: 0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            frozen.validate(),
            Err(ConfigError::ZeroDropInterval)
        ));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result = serde_json::from_str::<SessionConfig>(r#"{ "colums": 12 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_roundtrip() {
        let config = SessionConfig {
            cols: 12,
            rows: 22,
            drop_interval_ms: 500,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"cols":12,"rows":22,"drop_interval_ms":500}"#);
        assert_eq!(serde_json::from_str::<SessionConfig>(&json).unwrap(), config);
    }
}
