//! Tests for the auth module

use super::*;
use std::collections::HashMap;

fn build(auth: &Authenticator) -> reqwest::Request {
    let client = reqwest::Client::new();
    auth.apply(client.get("https://app.asana.com/api/1.0/users/me"))
        .build()
        .unwrap()
}

#[test]
fn test_no_auth() {
    let built = build(&Authenticator::new(AuthConfig::None));
    assert!(built.headers().get("Authorization").is_none());
}

#[test]
fn test_api_key_basic_auth() {
    let built = build(&Authenticator::new(AuthConfig::api_key("key123")));

    // "key123:" base64-encoded
    assert_eq!(
        built.headers().get("Authorization").unwrap(),
        "Basic a2V5MTIzOg=="
    );
}

#[test]
fn test_bearer_auth() {
    let built = build(&Authenticator::new(AuthConfig::bearer("0/abc")));
    assert_eq!(
        built.headers().get("Authorization").unwrap(),
        "Bearer 0/abc"
    );
}

#[test]
fn test_custom_headers() {
    let mut headers = HashMap::new();
    headers.insert("X-Asana-Client-Lib".to_string(), "rust".to_string());
    let built = build(&Authenticator::new(AuthConfig::CustomHeaders { headers }));
    assert_eq!(built.headers().get("X-Asana-Client-Lib").unwrap(), "rust");
}

#[test]
fn test_auth_config_from_yaml() {
    let config: AuthConfig = serde_yaml::from_str("type: bearer\ntoken: abc\n").unwrap();
    assert_eq!(config, AuthConfig::bearer("abc"));

    let config: AuthConfig = serde_yaml::from_str("type: basic\nusername: key\n").unwrap();
    assert_eq!(config, AuthConfig::api_key("key"));

    let config: AuthConfig = serde_yaml::from_str("type: none\n").unwrap();
    assert!(config.is_none());
}
