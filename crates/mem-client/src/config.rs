//! Client configuration (base URL + request timeout), optionally read from env.

use mem_types::ClientError;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://0.0.0.0:8182";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix every endpoint is appended to, e.g. `http://127.0.0.1:8182`.
    pub base_url: String,
    /// Overall timeout applied to every request.
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `MEMORY_API_URL` and `MEMORY_API_TIMEOUT_SECS`, falling back to defaults.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let base_url = lookup("MEMORY_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout = match lookup("MEMORY_API_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    ClientError::Config(format!("MEMORY_API_TIMEOUT_SECS is not a number: {}", raw))
                })?;
                Duration::from_secs(secs)
            }
            None => DEFAULT_TIMEOUT,
        };
        Ok(Self { base_url, timeout })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_env_missing() {
        let cfg = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, ClientConfig::default());
        assert_eq!(cfg.base_url, "http://0.0.0.0:8182");
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn reads_url_and_timeout() {
        let cfg = ClientConfig::from_lookup(lookup(&[
            ("MEMORY_API_URL", "http://memory.local:9000"),
            ("MEMORY_API_TIMEOUT_SECS", " 5 "),
        ]))
        .unwrap();
        assert_eq!(cfg.base_url, "http://memory.local:9000");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_timeout_is_config_error() {
        let err = ClientConfig::from_lookup(lookup(&[("MEMORY_API_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ClientError::Config(ref m) if m.contains("soon")));
    }

    #[test]
    fn with_timeout_overrides_default() {
        let cfg = ClientConfig::new("http://x").with_timeout(Duration::from_millis(250));
        assert_eq!(cfg.timeout, Duration::from_millis(250));
        assert_eq!(cfg.base_url, "http://x");
    }
}
