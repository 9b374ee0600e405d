// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Server configuration loaded from environment variables.

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on.
    pub port: u16,
    /// CSV dataset with one row per apartment element.
    pub dataset_path: String,
    /// Directory for GLB cache storage.
    pub cache_dir: String,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Allowed CORS origins (comma-separated, or "*" for all).
    pub cors_origins: Vec<String>,
    /// Number of ids returned by `/apartments` without `limit`.
    pub default_list_limit: usize,
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            port: env_or("PORT", 8000),
            dataset_path: std::env::var("DATASET_PATH")
                .unwrap_or_else(|_| "./mds_V2_5.372k.csv".into()),
            cache_dir: std::env::var("CACHE_DIR").unwrap_or_else(|_| "./.cache".into()),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 60),
            cors_origins: parse_origins(
                &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".into()),
            ),
            default_list_limit: env_or("DEFAULT_LIST_LIMIT", 10),
        }
    }

    /// Any origin may call the API.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("http://localhost:3000, http://127.0.0.1:5173,,"),
            vec!["http://localhost:3000", "http://127.0.0.1:5173"]
        );
    }

    #[test]
    fn test_wildcard_origin() {
        let config = Config {
            port: 8000,
            dataset_path: String::new(),
            cache_dir: String::new(),
            request_timeout_secs: 60,
            cors_origins: vec!["*".into()],
            default_list_limit: 10,
        };
        assert!(config.allows_any_origin());
    }

    #[test]
    fn test_unparsable_value_falls_back() {
        assert_eq!(env_or("HOMECRAFT_TEST_UNSET_VARIABLE", 42usize), 42);
    }
}
