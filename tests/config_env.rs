use aps_client::config::{ApsConfig, Region, DEFAULT_BASE_URL};
use aps_client::error::ApsError;
use aps_client::http::HttpTransport;
use serial_test::serial;

#[test]
#[serial]
fn from_env_falls_back_to_production_defaults() {
    std::env::remove_var("APS_BASE_URL");
    std::env::remove_var("APS_REGION");

    let config = ApsConfig::from_env().expect("defaults should load");
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.default_region, Region::Us);
}

#[test]
#[serial]
fn from_env_trims_trailing_slash_and_parses_region() {
    std::env::set_var("APS_BASE_URL", "http://localhost:8080/");
    std::env::set_var("APS_REGION", "emea");

    let config = ApsConfig::from_env().expect("env config should load");
    assert_eq!(config.base_url, "http://localhost:8080");
    assert_eq!(config.default_region, Region::Emea);

    std::env::remove_var("APS_BASE_URL");
    std::env::remove_var("APS_REGION");
}

#[test]
#[serial]
fn from_env_rejects_an_unknown_region() {
    std::env::set_var("APS_REGION", "MARS");

    let err = ApsConfig::from_env().expect_err("unknown region should fail");
    assert!(matches!(err, ApsError::Configuration(_)));

    std::env::remove_var("APS_REGION");
}

#[test]
#[serial]
fn transport_from_env_requires_an_access_token() {
    std::env::remove_var("APS_ACCESS_TOKEN");

    let err = HttpTransport::from_env().expect_err("missing token should fail");
    assert!(matches!(err, ApsError::Configuration(_)));

    std::env::set_var("APS_ACCESS_TOKEN", "test-token");
    assert!(HttpTransport::from_env().is_ok());
    std::env::remove_var("APS_ACCESS_TOKEN");
}

#[test]
fn transport_debug_output_redacts_the_credential() {
    let transport = HttpTransport::new("very-secret-token");
    let rendered = format!("{transport:?}");
    assert!(!rendered.contains("very-secret-token"));
    assert!(rendered.contains("<redacted>"));
}
