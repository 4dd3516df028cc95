use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

// =============================================================================
// from_lookup
// =============================================================================

#[test]
fn defaults_point_every_domain_at_localhost() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(cfg.endpoints.get(Domain::Identity).base_url, "http://localhost:8080/api/iam/v1");
    assert_eq!(cfg.endpoints.get(Domain::Catalog).base_url, "http://localhost:8080/api/catalog/v1");
    assert_eq!(cfg.endpoints.get(Domain::Notification).base_url, "http://localhost:8080/api/notification/v1");
    assert_eq!(cfg.auth_failure, AuthFailurePolicy::ForceLogout);
    assert_eq!(cfg.request_timeout, None);
    assert_eq!(cfg.token_path, default_token_path());
}

#[test]
fn gateway_override_applies_to_all_domains() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[("BOOKVAULT_API_URL", "https://library.test/")])).unwrap();
    for domain in Domain::ALL {
        let endpoint = cfg.endpoints.get(domain);
        assert_eq!(endpoint.domain, domain);
        assert_eq!(endpoint.base_url, format!("https://library.test{}", domain.path_prefix()));
    }
}

#[test]
fn domain_override_replaces_only_that_domain() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[("BOOKVAULT_SEARCH_URL", "http://search.internal:9200/v2/")]))
        .unwrap();
    assert_eq!(cfg.endpoints.get(Domain::Search).base_url, "http://search.internal:9200/v2");
    assert_eq!(cfg.endpoints.get(Domain::Catalog).base_url, "http://localhost:8080/api/catalog/v1");
}

#[test]
fn parses_policy_timeout_and_token_path() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[
        ("BOOKVAULT_LOGOUT_ON_UNAUTHORIZED", "off"),
        ("BOOKVAULT_REQUEST_TIMEOUT_SECS", " 30 "),
        ("BOOKVAULT_TOKEN_PATH", "/tmp/bv/token"),
    ]))
    .unwrap();
    assert_eq!(cfg.auth_failure, AuthFailurePolicy::Surface);
    assert_eq!(cfg.request_timeout, Some(Duration::from_secs(30)));
    assert_eq!(cfg.token_path, PathBuf::from("/tmp/bv/token"));
}

#[test]
fn invalid_url_errors() {
    let err = ClientConfig::from_lookup(lookup_from(&[("BOOKVAULT_CATALOG_URL", "ftp://nope")])).unwrap_err();
    assert_eq!(err, ConfigError::InvalidUrl { var: "BOOKVAULT_CATALOG_URL".into(), value: "ftp://nope".into() });
}

#[test]
fn invalid_bool_errors() {
    let err = ClientConfig::from_lookup(lookup_from(&[("BOOKVAULT_LOGOUT_ON_UNAUTHORIZED", "maybe")])).unwrap_err();
    assert!(err.to_string().contains("BOOKVAULT_LOGOUT_ON_UNAUTHORIZED"));
}

#[test]
fn invalid_timeout_errors() {
    let err = ClientConfig::from_lookup(lookup_from(&[("BOOKVAULT_REQUEST_TIMEOUT_SECS", "soon")])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidNumber { .. }));
}

// =============================================================================
// helpers
// =============================================================================

#[test]
fn endpoint_url_joins_without_double_slash() {
    let endpoints = DomainEndpoints::from_gateway("http://gw");
    assert_eq!(endpoints.get(Domain::Catalog).url("/books/7"), "http://gw/api/catalog/v1/books/7");
    assert_eq!(endpoints.get(Domain::Catalog).url("books"), "http://gw/api/catalog/v1/books");
}

#[test]
fn parse_bool_variants() {
    for raw in ["1", "true", "YES", " on "] {
        assert_eq!(parse_bool(raw), Some(true), "expected true for {raw:?}");
    }
    for raw in ["0", "False", "no", "off"] {
        assert_eq!(parse_bool(raw), Some(false), "expected false for {raw:?}");
    }
    assert_eq!(parse_bool(""), None);
}

#[test]
fn default_token_path_ends_with_slot_name() {
    let path = default_token_path();
    assert!(path.ends_with("bookvault/token") || path.ends_with(".bookvault-token"));
}
