//! Startup configuration.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file. Every key has a default, so an empty environment yields a devnet
//! setup with the stock retry policy.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::network::Network;
use crate::retry::{RetryPolicy, DEFAULT_BASE_DELAY, DEFAULT_MAX_RETRIES};

pub const NETWORK_ID_KEY: &str = "ACTIONS_NETWORK_ID";
pub const MAX_RETRIES_KEY: &str = "ACTIONS_MAX_RETRIES";
pub const RETRY_BASE_DELAY_KEY: &str = "ACTIONS_RETRY_BASE_DELAY_MS";
pub const LOG_KEY: &str = "ACTIONS_LOG";

const DEFAULT_NETWORK_ID: &str = "solana-devnet";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionsConfig {
    pub network: Network,
    pub retry: RetryPolicy,
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl ActionsConfig {
    /// Load from the environment, reading `.env` first if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        // a missing .env file is normal
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let network: Network = lookup(NETWORK_ID_KEY)
            .as_deref()
            .unwrap_or(DEFAULT_NETWORK_ID)
            .parse()?;

        let max_retries = match lookup(MAX_RETRIES_KEY) {
            Some(raw) => parse_number::<u32>(MAX_RETRIES_KEY, &raw)?,
            None => DEFAULT_MAX_RETRIES,
        };

        let base_delay = match lookup(RETRY_BASE_DELAY_KEY) {
            Some(raw) => {
                let millis = parse_number::<u64>(RETRY_BASE_DELAY_KEY, &raw)?;
                if millis == 0 {
                    return Err(invalid(RETRY_BASE_DELAY_KEY, &raw, "must be positive"));
                }
                Duration::from_millis(millis)
            }
            None => DEFAULT_BASE_DELAY,
        };

        Ok(Self {
            network,
            retry: RetryPolicy::new(max_retries, base_delay),
            log_filter: lookup(LOG_KEY).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| invalid(key, raw, &e.to_string()))
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
