//! Relay configuration.

/// Relay configuration — the three deploy-time constants.
///
/// Defaults match the deployed values; each can be overridden with an
/// environment variable for local runs.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Fixed destination address every message is forwarded to.
    pub forward_to: String,
    /// Fixed source address the forwarded message is sent from.
    pub from_address: String,
    /// Bucket the receipt pipeline stores raw messages in.
    pub bucket: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            forward_to: "steve.laughton@billie.coop".to_string(),
            from_address: "noreply@macroscope.info".to_string(),
            bucket: "macroscope-email-storage".to_string(),
        }
    }
}

impl RelayConfig {
    /// Build config from environment variables, falling back to the
    /// deployed defaults for any that are unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            forward_to: std::env::var("RELAY_FORWARD_TO").unwrap_or(defaults.forward_to),
            from_address: std::env::var("RELAY_FROM_ADDRESS").unwrap_or(defaults.from_address),
            bucket: std::env::var("RELAY_BUCKET").unwrap_or(defaults.bucket),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_deployed_constants() {
        let config = RelayConfig::default();
        assert_eq!(config.from_address, "noreply@macroscope.info");
        assert_eq!(config.bucket, "macroscope-email-storage");
        assert!(config.forward_to.contains('@'));
    }
}
