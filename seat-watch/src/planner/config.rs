//! Search configuration for itinerary discovery.

/// Configuration parameters for itinerary discovery.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum number of leg probes in flight at one search level.
    /// Higher values finish wide levels sooner but put more load on the
    /// upstream, which also bounds concurrency on its own.
    pub probe_concurrency: usize,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(probe_concurrency: usize) -> Self {
        Self { probe_concurrency }
    }

    /// Set the number of concurrent probes (at least one).
    pub fn with_probe_concurrency(mut self, n: usize) -> Self {
        self.probe_concurrency = n.max(1);
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            probe_concurrency: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        assert_eq!(SearchConfig::default().probe_concurrency, 4);
    }

    #[test]
    fn custom_config() {
        assert_eq!(SearchConfig::new(9).probe_concurrency, 9);
        assert_eq!(
            SearchConfig::default()
                .with_probe_concurrency(0)
                .probe_concurrency,
            1
        );
    }
}
