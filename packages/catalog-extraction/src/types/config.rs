//! Pipeline configuration.

use serde::{Deserialize, Serialize};

/// Tunables for a pipeline instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Minimum classification confidence before falling back to the
    /// default parser. Default: 0.35.
    pub confidence_floor: f32,

    /// Relative margin under which the top two family scores count as a
    /// tie (ambiguous classification). Default: 0.05.
    pub tie_margin: f32,

    /// Timeout for one resource existence probe, in milliseconds. A
    /// timed-out probe drops the candidate, never the run. Default: 5000.
    pub probe_timeout_ms: u64,

    /// Concurrent runs in `run_many`. The external rate/backoff policy
    /// lives in the fetch collaborator; this only bounds local work.
    /// Default: 4.
    pub concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            confidence_floor: 0.35,
            tie_margin: 0.05,
            probe_timeout_ms: 5000,
            concurrency: 4,
        }
    }
}

impl PipelineConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the classification confidence floor.
    pub fn with_confidence_floor(mut self, floor: f32) -> Self {
        self.confidence_floor = floor.clamp(0.0, 1.0);
        self
    }

    /// Set the classification tie margin.
    pub fn with_tie_margin(mut self, margin: f32) -> Self {
        self.tie_margin = margin.clamp(0.0, 1.0);
        self
    }

    /// Set the resource probe timeout.
    pub fn with_probe_timeout_ms(mut self, ms: u64) -> Self {
        self.probe_timeout_ms = ms;
        self
    }

    /// Set batch concurrency.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_clamps() {
        let config = PipelineConfig::new()
            .with_confidence_floor(2.0)
            .with_tie_margin(-1.0)
            .with_concurrency(0);

        assert_eq!(config.confidence_floor, 1.0);
        assert_eq!(config.tie_margin, 0.0);
        assert_eq!(config.concurrency, 1);
    }
}
