use super::*;

// =============================================================================
// provider_message
// =============================================================================

#[test]
fn provider_message_prefers_error_description() {
    let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
    assert_eq!(provider_message(400, body), "Invalid login credentials");
}

#[test]
fn provider_message_reads_msg_field() {
    let body = r#"{"code":422,"msg":"Signup requires a valid password"}"#;
    assert_eq!(provider_message(422, body), "Signup requires a valid password");
}

#[test]
fn provider_message_falls_back_to_error_field() {
    let body = r#"{"error":"invalid_request"}"#;
    assert_eq!(provider_message(400, body), "invalid_request");
}

#[test]
fn provider_message_passes_unrecognized_body_through() {
    assert_eq!(provider_message(502, "upstream unavailable"), "upstream unavailable");
    assert_eq!(provider_message(500, r#"{"unexpected":true}"#), r#"{"unexpected":true}"#);
}

#[test]
fn provider_message_names_status_for_empty_body() {
    assert_eq!(provider_message(503, "  "), "identity backend returned status 503");
}

// =============================================================================
// IdentityClient — endpoint construction
//
// IdentityConfig::from_env reads shared process globals (IDENTITY_URL etc.),
// so it is not exercised directly here; tests would race under the parallel
// runner. Construction from an explicit config covers the same paths.
// =============================================================================

fn test_config() -> IdentityConfig {
    IdentityConfig {
        base_url: "https://id.example.com/auth/v1/".to_owned(),
        api_key: "anon-key".to_owned(),
        site_url: "https://app.example.com".to_owned(),
    }
}

#[test]
fn endpoint_trims_trailing_slash_once() {
    let client = IdentityClient::new(&test_config());
    assert_eq!(client.endpoint("/token"), "https://id.example.com/auth/v1/token");
    assert_eq!(client.endpoint("/user"), "https://id.example.com/auth/v1/user");
}

#[test]
fn endpoint_keeps_clean_base_untouched() {
    let config = IdentityConfig { base_url: "http://localhost:9999".to_owned(), ..test_config() };
    let client = IdentityClient::new(&config);
    assert_eq!(client.endpoint("/signup"), "http://localhost:9999/signup");
}
