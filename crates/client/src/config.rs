/// Connection settings for a Hue server.
///
/// All fields have defaults suitable for a local Hue install; override via
/// environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Hue server (default: `http://localhost:8888`).
    pub base_url: String,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Django CSRF token, sent as `X-CSRFToken` on POST requests.
    pub csrf_token: Option<String>,
    /// Hue `sessionid` cookie of an authenticated session.
    pub session_id: Option<String>,
}

/// Default Hue base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8888";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            csrf_token: None,
            session_id: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                 |
    /// |----------------------------|-------------------------|
    /// | `HUE_URL`                  | `http://localhost:8888` |
    /// | `HUE_REQUEST_TIMEOUT_SECS` | `30`                    |
    /// | `HUE_CSRF_TOKEN`           | unset                   |
    /// | `HUE_SESSION_ID`           | unset                   |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let request_timeout_secs = match non_empty("HUE_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "HUE_REQUEST_TIMEOUT_SECS is not a valid u64, using default");
                DEFAULT_TIMEOUT_SECS
            }),
            None => DEFAULT_TIMEOUT_SECS,
        };

        Self {
            base_url: non_empty("HUE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_timeout_secs,
            csrf_token: non_empty("HUE_CSRF_TOKEN"),
            session_id: non_empty("HUE_SESSION_ID"),
        }
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
    fn defaults_when_unset() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.csrf_token.is_none());
    }

    #[test]
    fn reads_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("HUE_URL", "https://hue.internal:8889"),
            ("HUE_REQUEST_TIMEOUT_SECS", "5"),
            ("HUE_CSRF_TOKEN", "tok"),
        ]));
        assert_eq!(config.base_url, "https://hue.internal:8889");
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.csrf_token.as_deref(), Some("tok"));
    }

    #[test]
    fn invalid_timeout_falls_back() {
        let config = ClientConfig::from_lookup(lookup(&[("HUE_REQUEST_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
    }
}
