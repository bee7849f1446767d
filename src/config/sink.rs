//! Event sink configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Event sink configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SinkConfig {
    /// Where verified events are recorded
    #[serde(default)]
    pub backend: SinkBackend,

    /// How events reach the backend
    #[serde(default)]
    pub dispatch: SinkDispatch,

    /// Per-delivery timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Queue capacity for the queued dispatch mode
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

/// Sink storage backend
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SinkBackend {
    /// In-process map; events vanish on restart. Development only.
    #[default]
    Memory,
    /// `billing_events` table in PostgreSQL.
    Postgres,
}

/// Sink dispatch mode
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SinkDispatch {
    /// Deliver during webhook handling, inside the request.
    #[default]
    Inline,
    /// Enqueue and deliver from a background worker.
    Queued,
}

impl SinkConfig {
    /// Whether this configuration needs a database connection.
    pub fn requires_database(&self) -> bool {
        self.backend == SinkBackend::Postgres
    }

    /// Validate sink configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.timeout_secs > 60 {
            return Err(ValidationError::InvalidSinkTimeout);
        }
        if self.queue_capacity == 0 {
            return Err(ValidationError::InvalidQueueCapacity);
        }
        Ok(())
    }
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            backend: SinkBackend::default(),
            dispatch: SinkDispatch::default(),
            timeout_secs: default_timeout(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_timeout() -> u64 {
    5
}

fn default_queue_capacity() -> usize {
    256
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_memory_and_inline() {
        let config = SinkConfig::default();
        assert_eq!(config.backend, SinkBackend::Memory);
        assert_eq!(config.dispatch, SinkDispatch::Inline);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.queue_capacity, 256);
        assert!(!config.requires_database());
    }

    #[test]
    fn postgres_backend_requires_database() {
        let config = SinkConfig {
            backend: SinkBackend::Postgres,
            ..Default::default()
        };
        assert!(config.requires_database());
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let config = SinkConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_timeout_fails_validation() {
        let config = SinkConfig {
            timeout_secs: 120,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_queue_capacity_fails_validation() {
        let config = SinkConfig {
            queue_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
