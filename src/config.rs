//! Client configuration: backend endpoints, app routes, and storage namespaces.
//!
//! SYSTEM CONTEXT
//! ==============
//! WASM builds have no process environment, so overrides are read at compile
//! time with `option_env!`. The resolved config is provided once through the
//! `SessionController` and never mutated afterwards.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

const DEFAULT_API_URL: &str = "http://localhost:3000";
const DEFAULT_DB_URL: &str = "mongodb://localhost:27017/chirps";
const DEFAULT_DB_TYPE: &str = "mongodb";

/// Backend endpoint paths, relative to `api_base_url`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    pub login: String,
    pub signup: String,
    pub query: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            login: "/login".to_owned(),
            signup: "/signup".to_owned(),
            query: "/ai-agent/query".to_owned(),
        }
    }
}

/// In-app route paths used by guards and the interceptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Routes {
    pub login: String,
    pub signup: String,
    pub home: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self { login: "/login".to_owned(), signup: "/signup".to_owned(), home: "/".to_owned() }
    }
}

/// Resolved client configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub endpoints: Endpoints,
    /// Database URL forwarded with generic query requests.
    pub db_url: String,
    /// Database kind forwarded with generic query requests.
    pub db_type: String,
    pub routes: Routes,
    /// Durable-storage key prefixes owned by the app and removed on purge.
    pub purge_prefixes: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_owned(),
            endpoints: Endpoints::default(),
            db_url: DEFAULT_DB_URL.to_owned(),
            db_type: DEFAULT_DB_TYPE.to_owned(),
            routes: Routes::default(),
            purge_prefixes: vec!["app_".to_owned(), "chirp_".to_owned(), "user_".to_owned()],
        }
    }
}

impl ClientConfig {
    /// Load from `CHIRPNEST_API_URL`, `CHIRPNEST_DB_URL`, `CHIRPNEST_DB_TYPE`
    /// captured at compile time. Unset or blank values fall back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_overrides(
            option_env!("CHIRPNEST_API_URL"),
            option_env!("CHIRPNEST_DB_URL"),
            option_env!("CHIRPNEST_DB_TYPE"),
        )
    }

    fn from_overrides(api_url: Option<&str>, db_url: Option<&str>, db_type: Option<&str>) -> Self {
        let pick = |value: Option<&str>, fallback: &str| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback)
                .to_owned()
        };
        Self {
            api_base_url: pick(api_url, DEFAULT_API_URL),
            db_url: pick(db_url, DEFAULT_DB_URL),
            db_type: pick(db_type, DEFAULT_DB_TYPE),
            ..Self::default()
        }
    }

    /// Join `api_base_url` with an endpoint path.
    #[must_use]
    pub fn build_api_url(&self, endpoint: &str) -> String {
        let base = self.api_base_url.trim_end_matches('/');
        if endpoint.starts_with('/') {
            format!("{base}{endpoint}")
        } else {
            format!("{base}/{endpoint}")
        }
    }
}
