//! Timeout configuration for server requests

use lazy_static::lazy_static;
use std::env;
use std::time::Duration;

/// Default timeout for listing models
pub const DEFAULT_LIST_TIMEOUT: Duration = Duration::from_secs(5);

/// Default timeout for a generate request
pub const DEFAULT_GENERATE_TIMEOUT: Duration = Duration::from_secs(60);

/// Request timeouts, overridable through environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingConfig {
    pub list_timeout: Duration,
    pub generate_timeout: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            list_timeout: secs_from_env("VISION_TESTER_LIST_TIMEOUT").unwrap_or(DEFAULT_LIST_TIMEOUT),
            generate_timeout: secs_from_env("VISION_TESTER_GENERATE_TIMEOUT")
                .unwrap_or(DEFAULT_GENERATE_TIMEOUT),
        }
    }
}

impl TimingConfig {
    pub fn with_list_timeout(mut self, timeout: Duration) -> Self {
        self.list_timeout = timeout;
        self
    }

    pub fn with_generate_timeout(mut self, timeout: Duration) -> Self {
        self.generate_timeout = timeout;
        self
    }
}

/// Read a positive number of seconds (fractions allowed)
fn secs_from_env(key: &str) -> Option<Duration> {
    env::var(key).ok().and_then(|v| parse_secs(&v))
}

fn parse_secs(value: &str) -> Option<Duration> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|s| *s > 0.0)
        .and_then(|s| Duration::try_from_secs_f64(s).ok())
}

lazy_static! {
    /// Global timing configuration instance
    pub static ref TIMING_CONFIG: TimingConfig = TimingConfig::default();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_secs() {
        assert_eq!(parse_secs("120"), Some(Duration::from_secs(120)));
        assert_eq!(parse_secs(" 0.5 "), Some(Duration::from_millis(500)));
        assert_eq!(parse_secs("0"), None);
        assert_eq!(parse_secs("-3"), None);
        assert_eq!(parse_secs("soon"), None);
    }

    #[test]
    fn test_parse_secs_rejects_out_of_range() {
        assert_eq!(parse_secs("1e20"), None);
        assert_eq!(parse_secs("inf"), None);
        assert_eq!(parse_secs("NaN"), None);
    }

    #[test]
    fn test_builder() {
        let config = TimingConfig::default()
            .with_list_timeout(Duration::from_secs(1))
            .with_generate_timeout(Duration::from_secs(120));
        assert_eq!(config.list_timeout, Duration::from_secs(1));
        assert_eq!(config.generate_timeout, Duration::from_secs(120));
    }
}
