//! Equality-delete filter configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteFilterConfig {
    /// Pre-size hint for the delete index (distinct keys). Not a bound: the
    /// index grows past it as needed.
    pub initial_capacity: usize,

    /// Give up after this many consecutive "no page yet" polls.
    /// `None` keeps polling until the source reports completion.
    pub max_pending_polls: Option<usize>,

    /// Check every delete-file value against its declared column type while
    /// building the index.
    pub validate_batch_types: bool,
}

impl Default for DeleteFilterConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            max_pending_polls: None,
            validate_batch_types: true,
        }
    }
}

impl DeleteFilterConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `EQDEL_INITIAL_CAPACITY`: delete index pre-size hint
    /// - `EQDEL_MAX_PENDING_POLLS`: consecutive empty polls before giving up
    /// - `EQDEL_VALIDATE_BATCH_TYPES`: `true`/`false`
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("EQDEL_INITIAL_CAPACITY") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.initial_capacity = v;
            }
        }

        if let Ok(s) = std::env::var("EQDEL_MAX_PENDING_POLLS") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.max_pending_polls = Some(v);
            }
        }

        if let Ok(s) = std::env::var("EQDEL_VALIDATE_BATCH_TYPES") {
            if let Ok(v) = s.parse::<bool>() {
                cfg.validate_batch_types = v;
            }
        }

        cfg
    }

    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    pub fn with_max_pending_polls(mut self, polls: usize) -> Self {
        self.max_pending_polls = Some(polls);
        self
    }

    pub fn with_batch_type_validation(mut self, enabled: bool) -> Self {
        self.validate_batch_types = enabled;
        self
    }

    /// Reject settings that can never make progress.
    pub fn validate(&self) -> Result<()> {
        if self.max_pending_polls == Some(0) {
            return Err(Error::Config(
                "max_pending_polls must be at least 1 when set".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_poll_forever_and_validate_types() {
        let cfg = DeleteFilterConfig::default();
        assert_eq!(cfg.max_pending_polls, None);
        assert!(cfg.validate_batch_types);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_pending_polls_is_rejected() {
        let cfg = DeleteFilterConfig::default().with_max_pending_polls(0);
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn round_trips_through_json() {
        let cfg = DeleteFilterConfig::default()
            .with_initial_capacity(16)
            .with_batch_type_validation(false);
        let json = serde_json::to_string(&cfg).unwrap();
        let back: DeleteFilterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
