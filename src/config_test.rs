use super::*;

#[test]
fn defaults_point_at_local_backend() {
    let config = ClientConfig::default();
    assert_eq!(config.api_base_url, "http://localhost:3000");
    assert_eq!(config.endpoints.login, "/login");
    assert_eq!(config.endpoints.signup, "/signup");
    assert_eq!(config.endpoints.query, "/ai-agent/query");
    assert_eq!(config.routes.home, "/");
}

#[test]
fn build_api_url_joins_without_double_slash() {
    let mut config = ClientConfig::default();
    config.api_base_url = "https://api.chirpnest.dev/".to_owned();
    assert_eq!(config.build_api_url("/login"), "https://api.chirpnest.dev/login");
    assert_eq!(config.build_api_url("signup"), "https://api.chirpnest.dev/signup");
}

#[test]
fn overrides_replace_defaults_and_blank_values_fall_back() {
    let config = ClientConfig::from_overrides(Some("https://x.test"), Some("   "), None);
    assert_eq!(config.api_base_url, "https://x.test");
    assert_eq!(config.db_url, "mongodb://localhost:27017/chirps");
    assert_eq!(config.db_type, "mongodb");
}
