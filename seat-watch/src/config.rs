//! Process configuration from the environment.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::planner::SearchConfig;
use crate::regiojet::{DEFAULT_BASE_URL, DEFAULT_CURRENCY, RegioJetConfig};
use crate::stations::StationClientConfig;

const DEFAULT_BIND: ([u8; 4], u16) = ([127, 0, 0, 1], 7900);
const DEFAULT_SCAN_INTERVAL_SECS: u64 = 60;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// An environment variable held an unusable value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}={value:?} is not a valid {expected}")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("{var} must be greater than zero")]
    Zero { var: &'static str },
}

/// Everything the binary needs to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub scan_interval: Duration,
    /// Also look for alternatives when the watched route has seats
    pub notify_alternatives_with_direct: bool,
    pub base_url: String,
    pub currency: String,
    pub timeout_secs: u64,
    pub max_concurrent: usize,
}

impl AppConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read the configuration through `lookup`; unset variables take their
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let text = |var: &str, default: &str| {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let bind = parse(&lookup, "SEATWATCH_BIND", "socket address")?
            .unwrap_or(SocketAddr::from(DEFAULT_BIND));

        let scan_interval_secs =
            positive(&lookup, "SEATWATCH_SCAN_INTERVAL_SECS", DEFAULT_SCAN_INTERVAL_SECS)?;

        let notify_alternatives_with_direct = match lookup("SEATWATCH_NOTIFY_ALTERNATIVES_WITH_DIRECT") {
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::Invalid {
                var: "SEATWATCH_NOTIFY_ALTERNATIVES_WITH_DIRECT",
                value: raw,
                expected: "boolean",
            })?,
            None => false,
        };

        Ok(Self {
            bind,
            scan_interval: Duration::from_secs(scan_interval_secs),
            notify_alternatives_with_direct,
            base_url: text("REGIOJET_BASE_URL", DEFAULT_BASE_URL),
            currency: text("REGIOJET_CURRENCY", DEFAULT_CURRENCY),
            timeout_secs: positive(&lookup, "REGIOJET_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            max_concurrent: positive(&lookup, "REGIOJET_MAX_CONCURRENT", DEFAULT_MAX_CONCURRENT)?,
        })
    }

    pub fn regiojet(&self) -> RegioJetConfig {
        RegioJetConfig::new()
            .with_base_url(&self.base_url)
            .with_currency(&self.currency)
            .with_max_concurrent(self.max_concurrent)
            .with_timeout(self.timeout_secs)
    }

    pub fn stations(&self) -> StationClientConfig {
        StationClientConfig::new()
            .with_base_url(&self.base_url)
            .with_currency(&self.currency)
            .with_timeout(self.timeout_secs)
    }

    /// Search settings; probes share the upstream's request limit.
    pub fn search(&self) -> SearchConfig {
        SearchConfig::default().with_probe_concurrency(self.max_concurrent)
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                var,
                value: raw,
                expected,
            }),
        _ => Ok(None),
    }
}

fn positive<T: FromStr + Default + PartialEq>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match parse(lookup, var, "positive integer")? {
        Some(value) if value == T::default() => Err(ConfigError::Zero { var }),
        Some(value) => Ok(value),
        None => Ok(default),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
