use http_client_utils::application::builder::ClientBuilder;
use http_client_utils::application::config::{AuthType, LoginEncoding, Settings};
use http_client_utils::error::AppError;
use std::collections::{BTreeSet, HashMap};

#[test]
fn test_client_builder_sets_base_url() {
    let builder = ClientBuilder::new().set_base_url("http://example.com");
    assert_eq!(builder.settings().base_url, "http://example.com");
}

#[test]
fn test_client_builder_sets_token() {
    let builder = ClientBuilder::new()
        .set_auth_type(AuthType::Token)
        .set_token("test-token");
    assert_eq!(builder.settings().token, "test-token");
    assert_eq!(builder.settings().auth_type, AuthType::Token);
}

#[test]
fn test_client_builder_sets_credentials_and_header() {
    let builder = ClientBuilder::new()
        .set_basic_auth("user", "pass")
        .set_custom_token_header("X-Api-Key", "k")
        .set_login_url("http://example.com/login")
        .set_verify(false)
        .set_data_key("items")
        .set_login_encoding(LoginEncoding::Json);
    let settings = builder.settings();
    assert_eq!(settings.username, "user");
    assert_eq!(settings.password, "pass");
    assert_eq!(settings.custom_token_header, "X-Api-Key");
    assert_eq!(settings.token, "k");
    assert_eq!(settings.login_url, "http://example.com/login");
    assert!(!settings.verify_tls);
    assert_eq!(settings.data_key.as_deref(), Some("items"));
    assert_eq!(settings.login_encoding, Some(LoginEncoding::Json));
}

#[test]
fn test_set_login_status_adds_200() {
    let builder = ClientBuilder::new().set_login_status(&[201]).unwrap();
    assert_eq!(
        builder.settings().login_status_codes,
        BTreeSet::from([200, 201])
    );
}

#[test]
fn test_set_login_status_deduplicates() {
    let builder = ClientBuilder::new()
        .set_login_status(&[200, 204, 204])
        .unwrap();
    assert_eq!(
        builder.settings().login_status_codes,
        BTreeSet::from([200, 204])
    );
}

#[test]
fn test_set_login_status_rejects_600() {
    let result = ClientBuilder::new().set_login_status(&[600]);
    assert!(matches!(result, Err(AppError::InvalidStatusCode(600))));
}

#[test]
fn test_client_builder_build_creates_client() {
    let client = ClientBuilder::new()
        .set_base_url("http://example.com")
        .build()
        .unwrap();
    assert_eq!(client.settings().base_url, "http://example.com");
    assert!(client.transport().verify_tls());
}

#[test]
fn test_build_without_base_url_fails() {
    let result = ClientBuilder::new().build();
    assert!(matches!(result, Err(AppError::MissingSettings)));
}

#[test]
fn test_build_token_injects_bearer_header() {
    let headers = HashMap::from([("Accept".to_string(), "application/json".to_string())]);
    let client = ClientBuilder::new()
        .set_base_url("http://example.com")
        .set_headers(headers)
        .set_auth_type(AuthType::Token)
        .set_token("abc")
        .build()
        .unwrap();
    assert_eq!(client.settings().headers["Authorization"], "Bearer abc");
    assert_eq!(client.settings().headers["Accept"], "application/json");
}

#[test]
fn test_build_custom_header_injects_token() {
    let client = ClientBuilder::new()
        .set_base_url("http://example.com")
        .set_auth_type(AuthType::CustomTokenHeader)
        .set_custom_token_header("X-Api-Key", "secret")
        .build()
        .unwrap();
    assert_eq!(client.settings().headers["X-Api-Key"], "secret");
    assert!(!client.settings().headers.contains_key("Authorization"));
}

#[test]
fn test_build_basic_attaches_credentials_to_transport() {
    let client = ClientBuilder::new()
        .set_base_url("http://example.com")
        .set_auth_type(AuthType::Basic)
        .set_basic_auth("user", "pass")
        .build()
        .unwrap();
    let creds = client.transport().basic_credentials().unwrap();
    assert_eq!(creds.username, "user");
    assert!(client.settings().headers.is_empty());
}

#[test]
fn test_build_basic_without_username_fails() {
    let result = ClientBuilder::new()
        .set_base_url("http://example.com")
        .set_auth_type(AuthType::Basic)
        .build();
    assert!(matches!(result, Err(AppError::MissingCredentials(_))));
}

#[test]
fn test_build_forwards_verify_flag() {
    let client = ClientBuilder::new()
        .set_base_url("https://example.com")
        .set_verify(false)
        .build()
        .unwrap();
    assert!(!client.transport().verify_tls());
}

#[test]
fn test_from_settings_keeps_fields() {
    let settings = Settings {
        base_url: "http://example.com".to_string(),
        data_key: Some("data".to_string()),
        ..Settings::default()
    };
    let builder = ClientBuilder::from_settings(settings.clone());
    assert_eq!(builder.settings(), &settings);
}

#[test]
fn test_async_build_token_without_network() {
    let client = tokio_test::block_on(
        ClientBuilder::new()
            .set_base_url("http://example.com")
            .set_auth_type(AuthType::Token)
            .set_token("abc")
            .async_build(),
    )
    .unwrap();
    assert_eq!(client.settings().headers["Authorization"], "Bearer abc");
}

#[test]
fn test_build_token_replaces_header_in_any_case() {
    let headers = HashMap::from([("authorization".to_string(), "Bearer old".to_string())]);
    let client = ClientBuilder::new()
        .set_base_url("http://example.com")
        .set_headers(headers)
        .set_auth_type(AuthType::Token)
        .set_token("new")
        .build()
        .unwrap();
    let headers = &client.settings().headers;
    assert_eq!(headers.len(), 1);
    assert_eq!(headers["Authorization"], "Bearer new");
}

#[test]
fn test_build_custom_header_replaces_header_in_any_case() {
    let headers = HashMap::from([("X-API-KEY".to_string(), "old".to_string())]);
    let client = ClientBuilder::new()
        .set_base_url("http://example.com")
        .set_headers(headers)
        .set_auth_type(AuthType::CustomTokenHeader)
        .set_custom_token_header("x-api-key", "new")
        .build()
        .unwrap();
    let headers = &client.settings().headers;
    assert_eq!(headers.len(), 1);
    assert_eq!(headers["x-api-key"], "new");
}
