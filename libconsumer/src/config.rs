//! Consumer lifecycle configuration.
//!
//! Environment variables:
//! - `OCS_CONSUMER_CONNECT_TIMEOUT_SECS`: handshake timeout for the provider
//!   channel, in seconds. Defaults to `10`.
//! - `OCS_CONSUMER_NAME_PREFIX`: prefix of the registration name sent at
//!   onboarding. Defaults to `ocs-consumer-`.

use std::time::Duration;

use tracing::warn;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CONSUMER_NAME_PREFIX: &str = "ocs-consumer-";

const ENV_CONNECT_TIMEOUT: &str = "OCS_CONSUMER_CONNECT_TIMEOUT_SECS";
const ENV_NAME_PREFIX: &str = "OCS_CONSUMER_NAME_PREFIX";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerConfig {
    /// Bound on establishing the provider channel.
    pub connect_timeout: Duration,
    /// Registration name is this prefix followed by the cluster id.
    pub consumer_name_prefix: String,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            consumer_name_prefix: DEFAULT_CONSUMER_NAME_PREFIX.to_owned(),
        }
    }
}

impl ConsumerConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_CONNECT_TIMEOUT) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.connect_timeout = Duration::from_secs(secs),
                _ => warn!(
                    value = %raw,
                    "ignoring invalid {ENV_CONNECT_TIMEOUT}, using {}s",
                    DEFAULT_CONNECT_TIMEOUT.as_secs()
                ),
            }
        }

        if let Some(prefix) = lookup(ENV_NAME_PREFIX) {
            if prefix.is_empty() {
                warn!("ignoring empty {ENV_NAME_PREFIX}");
            } else {
                config.consumer_name_prefix = prefix;
            }
        }

        config
    }

    /// Registration name for the cluster identified by `cluster_id`.
    pub fn consumer_name(&self, cluster_id: &str) -> String {
        format!("{}{cluster_id}", self.consumer_name_prefix)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = ConsumerConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ConsumerConfig::default());
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.consumer_name("abc"), "ocs-consumer-abc");
    }

    #[test]
    fn overrides_from_environment() {
        let config = ConsumerConfig::from_lookup(lookup(&[
            (ENV_CONNECT_TIMEOUT, "30"),
            (ENV_NAME_PREFIX, "dev-consumer-"),
        ]));
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
        assert_eq!(config.consumer_name("abc"), "dev-consumer-abc");
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = ConsumerConfig::from_lookup(lookup(&[
            (ENV_CONNECT_TIMEOUT, "soon"),
            (ENV_NAME_PREFIX, ""),
        ]));
        assert_eq!(config, ConsumerConfig::default());

        let config = ConsumerConfig::from_lookup(lookup(&[(ENV_CONNECT_TIMEOUT, "0")]));
        assert_eq!(config.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
    }

    #[test]
    fn consumer_name_is_deterministic() {
        let config = ConsumerConfig::default();
        assert_eq!(config.consumer_name("c1"), config.consumer_name("c1"));
        assert_ne!(config.consumer_name("c1"), config.consumer_name("c2"));
    }
}
