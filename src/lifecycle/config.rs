//! Runtime configuration

use std::time::Duration;

const DEFAULT_STORE_BUFFER_SIZE: usize = 64;
const DEFAULT_REMOTE_CALL_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_COMPENSATION_RETRY_INTERVAL_MS: u64 = 30_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// mpsc capacity of each store actor (env: STORE_BUFFER_SIZE)
    pub store_buffer_size: usize,
    /// Upper bound for each remote call (env: REMOTE_CALL_TIMEOUT_MS)
    pub remote_call_timeout: Duration,
    /// Period of the background outbox replay; `None` disables it
    /// (env: COMPENSATION_RETRY_INTERVAL_MS, 0 = off)
    pub compensation_retry_interval: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_buffer_size: DEFAULT_STORE_BUFFER_SIZE,
            remote_call_timeout: Duration::from_millis(DEFAULT_REMOTE_CALL_TIMEOUT_MS),
            compensation_retry_interval: Some(Duration::from_millis(
                DEFAULT_COMPENSATION_RETRY_INTERVAL_MS,
            )),
        }
    }
}

impl Config {
    /// Load configuration from environment variables. Missing or unparsable values fall
    /// back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let number = |name: &str| lookup(name).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            store_buffer_size: number("STORE_BUFFER_SIZE")
                .and_then(|n| usize::try_from(n).ok())
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_STORE_BUFFER_SIZE),
            remote_call_timeout: Duration::from_millis(
                number("REMOTE_CALL_TIMEOUT_MS")
                    .filter(|ms| *ms > 0)
                    .unwrap_or(DEFAULT_REMOTE_CALL_TIMEOUT_MS),
            ),
            compensation_retry_interval: match number("COMPENSATION_RETRY_INTERVAL_MS")
                .unwrap_or(DEFAULT_COMPENSATION_RETRY_INTERVAL_MS)
            {
                0 => None,
                ms => Some(Duration::from_millis(ms)),
            },
        }
    }
}
