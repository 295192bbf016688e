use rcurl::{Curl, CurlConfig, Method, RawResult};

#[test]
fn test_version() {
    assert!(!rcurl::VERSION.is_empty());
}

#[test]
fn test_default_builder_state() {
    let curl = Curl::new();
    assert_eq!(curl.get_communication_method(), Method::Get);
    assert!(curl.get_url().is_none());
    assert!(curl.get_endpoint().is_none());
    assert!(curl.get_result().is_none());
    assert!(curl.get_error().is_none());
    assert_eq!(curl.get_config(), &CurlConfig::default());
}

#[test]
fn test_one_shot_with_malformed_url_returns_sentinel() {
    assert_eq!(Curl::get("not a url"), RawResult::Failed);
    assert_eq!(Curl::post("", serde_json::json!({"a": 1})), RawResult::Failed);
}
