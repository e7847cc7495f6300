use std::sync::Arc;

use oidc_client_settings::oidc_client_store::{
    FixedStorage, Headless, InMemoryWebStorage, StateStore, Storage, StorageProvider,
    WebStorageStateStore,
};
use oidc_client_settings::{
    ClientAuthentication, ClientSettings, QueryParamValue, ResolvedSettings, ResponseMode,
    SettingValue, SettingsResolver, StateStoreOrigin, UserInfoJwtIssuer,
};
use serde_json::json;

fn minimal() -> ClientSettings {
    ClientSettings::new("https://issuer.example", "abc")
}

fn headless(settings: ClientSettings) -> ResolvedSettings {
    SettingsResolver::with_provider(Headless)
        .resolve(settings)
        .unwrap()
}

#[test]
fn test_minimal_settings_get_defaults() {
    let resolved = minimal().resolve();

    assert_eq!(resolved.authority(), "https://issuer.example");
    assert_eq!(resolved.client_id(), "abc");
    assert_eq!(resolved.response_mode(), ResponseMode::Query);
    assert!(resolved.filter_protocol_claims());
    assert!(!resolved.load_user_info());
    assert_eq!(resolved.stale_state_age_in_seconds(), 900);
    assert_eq!(resolved.clock_skew_in_seconds(), 300);
    assert_eq!(resolved.user_info_jwt_issuer(), &UserInfoJwtIssuer::Op);
    assert_eq!(resolved.user_info_jwt_issuer().as_str(), "OP");
    assert!(!resolved.merge_claims());
    assert!(resolved.extra_query_params().is_empty());
    assert!(resolved.extra_token_params().is_empty());
}

#[test]
fn test_supplemented_defaults() {
    let resolved = headless(minimal());
    assert_eq!(resolved.response_type(), "code");
    assert_eq!(resolved.scope(), "openid");
    assert_eq!(
        resolved.client_authentication(),
        ClientAuthentication::ClientSecretPost
    );
}

#[test]
fn test_fields_without_default_stay_unset() {
    let resolved = headless(minimal());
    assert!(resolved.prompt().is_none());
    assert!(resolved.display().is_none());
    assert!(resolved.max_age().is_none());
    assert!(resolved.ui_locales().is_none());
    assert!(resolved.acr_values().is_none());
    assert!(resolved.resource().is_none());
    assert!(resolved.client_secret().is_none());
    assert!(resolved.metadata_url().is_none());
    assert!(resolved.metadata().is_none());
    assert!(resolved.metadata_seed().is_none());
    assert!(resolved.signing_keys().is_none());
    assert!(resolved.redirect_uri().is_none());
    assert!(resolved.post_logout_redirect_uri().is_none());
}

#[test]
fn test_explicit_values_are_kept() {
    let settings = minimal()
        .with_client_secret("s3cret")
        .with_prompt("login")
        .with_display("popup")
        .with_max_age(60)
        .with_ui_locales("fr-FR en")
        .with_acr_values("urn:mace:incommon:iap:silver")
        .with_resource("https://api.example")
        .with_response_mode(ResponseMode::Fragment)
        .with_filter_protocol_claims(false)
        .with_load_user_info(true)
        .with_merge_claims(true)
        .with_stale_state_age(60)
        .with_clock_skew(0)
        .with_user_info_jwt_issuer("ANY")
        .with_scope("openid profile")
        .with_client_authentication(ClientAuthentication::ClientSecretBasic);

    let resolved = headless(settings);

    assert_eq!(resolved.client_secret(), Some("s3cret"));
    assert_eq!(resolved.prompt(), Some("login"));
    assert_eq!(resolved.display(), Some("popup"));
    assert_eq!(resolved.max_age(), Some(60));
    assert_eq!(resolved.ui_locales(), Some("fr-FR en"));
    assert_eq!(resolved.acr_values(), Some("urn:mace:incommon:iap:silver"));
    assert_eq!(resolved.resource(), Some("https://api.example"));
    assert_eq!(resolved.response_mode(), ResponseMode::Fragment);
    assert!(!resolved.filter_protocol_claims());
    assert!(resolved.load_user_info());
    assert!(resolved.merge_claims());
    assert_eq!(resolved.stale_state_age_in_seconds(), 60);
    assert_eq!(resolved.clock_skew_in_seconds(), 0);
    assert_eq!(resolved.user_info_jwt_issuer(), &UserInfoJwtIssuer::Any);
    assert_eq!(resolved.scope(), "openid profile");
    assert_eq!(
        resolved.client_authentication(),
        ClientAuthentication::ClientSecretBasic
    );
}

#[test]
fn test_authority_and_client_id_pass_through_unvalidated() {
    let resolved = headless(ClientSettings::new("not a url", ""));
    assert_eq!(resolved.authority(), "not a url");
    assert_eq!(resolved.client_id(), "");
}

#[test]
fn test_truthy_non_boolean_flags_become_true() {
    let resolved = headless(
        minimal()
            .with_load_user_info("yes")
            .with_merge_claims(1)
            .with_filter_protocol_claims("false"),
    );
    assert!(resolved.load_user_info());
    assert!(resolved.merge_claims());
    // Any non-empty string is truthy, including "false".
    assert!(resolved.filter_protocol_claims());
}

#[test]
fn test_falsy_non_boolean_flags_become_false() {
    let resolved = headless(
        minimal()
            .with_filter_protocol_claims(0)
            .with_load_user_info("")
            .with_merge_claims(SettingValue::Null),
    );
    assert!(!resolved.filter_protocol_claims());
    assert!(!resolved.load_user_info());
    assert!(!resolved.merge_claims());
}

#[test]
fn test_explicit_null_is_not_omission() {
    // Default applies only to an omitted flag; a supplied null is falsy.
    let mut settings = minimal();
    settings.filter_protocol_claims = Some(SettingValue::Null);
    assert!(!headless(settings).filter_protocol_claims());
}

#[test]
fn test_arbitrary_issuer_is_preserved() {
    let resolved = headless(minimal().with_user_info_jwt_issuer("https://other.example"));
    assert_eq!(
        resolved.user_info_jwt_issuer(),
        &UserInfoJwtIssuer::Issuer("https://other.example".into())
    );
    assert_eq!(resolved.user_info_jwt_issuer().as_str(), "https://other.example");
}

#[test]
fn test_extra_params_are_kept() {
    let resolved = headless(
        minimal()
            .with_extra_query_param("resource", "some_identifier")
            .with_extra_query_param("retry", 2i64)
            .with_extra_query_param("debug", true)
            .with_extra_token_param("audience", json!(["a", "b"])),
    );

    let query = resolved.extra_query_params();
    assert_eq!(query.len(), 3);
    assert_eq!(query["resource"], QueryParamValue::from("some_identifier"));
    assert_eq!(query["retry"].to_string(), "2");
    assert_eq!(query["debug"].to_string(), "true");
    assert_eq!(resolved.extra_token_params()["audience"], json!(["a", "b"]));
}

#[test]
fn test_supplied_store_is_used_verbatim() {
    let store: Arc<dyn StateStore> = Arc::new(WebStorageStateStore::new(InMemoryWebStorage::new()));
    let resolved = headless(minimal().with_state_store(store.clone()));

    assert!(Arc::ptr_eq(resolved.state_store(), &store));
    assert_eq!(resolved.state_store_origin(), StateStoreOrigin::Supplied);
}

struct FailingProvider;

impl StorageProvider for FailingProvider {
    type Error = String;

    fn probe(&self) -> Result<Option<Arc<dyn Storage>>, String> {
        Err("storage lookup failed".into())
    }
}

#[test]
fn test_provider_error_propagates() {
    let err = SettingsResolver::with_provider(FailingProvider)
        .resolve(minimal())
        .unwrap_err();
    assert_eq!(err, "storage lookup failed");
}

#[test]
fn test_supplied_store_skips_provider() {
    let store: Arc<dyn StateStore> = Arc::new(WebStorageStateStore::new(InMemoryWebStorage::new()));
    let resolved = SettingsResolver::with_provider(FailingProvider)
        .resolve(minimal().with_state_store(store.clone()))
        .unwrap();
    assert!(Arc::ptr_eq(resolved.state_store(), &store));
}

#[tokio::test]
async fn test_headless_fallback_is_fresh_per_resolution() {
    let first = headless(minimal());
    let second = headless(minimal());

    assert_eq!(first.state_store_origin(), StateStoreOrigin::Ephemeral);
    assert_eq!(second.state_store_origin(), StateStoreOrigin::Ephemeral);
    assert!(!Arc::ptr_eq(first.state_store(), second.state_store()));

    first.state_store().set("state-1", "payload".into()).await;
    assert_eq!(
        first.state_store().get("state-1").await,
        Some("payload".to_string())
    );
    assert_eq!(second.state_store().get("state-1").await, None);
}

#[tokio::test]
async fn test_durable_storage_is_wrapped() {
    let storage = InMemoryWebStorage::new();
    let provider = FixedStorage(Arc::new(storage.clone()));

    let resolved = SettingsResolver::with_provider(provider)
        .resolve(minimal())
        .unwrap();
    assert_eq!(resolved.state_store_origin(), StateStoreOrigin::Durable);

    resolved.state_store().set("state-1", "payload".into()).await;
    assert_eq!(storage.get_item("oidc.state-1"), Some("payload".to_string()));
}

#[test]
fn test_resolution_is_idempotent() {
    let first = headless(
        minimal()
            .with_load_user_info("yes")
            .with_prompt("none")
            .with_extra_query_param("resource", "x"),
    );
    let second = headless(ClientSettings::from(&first));

    assert_eq!(first, second);
    assert_eq!(second.state_store_origin(), StateStoreOrigin::Supplied);
}

#[test]
fn test_resolution_is_idempotent_with_nan_query_param() {
    let first = headless(minimal().with_extra_query_param("ratio", f64::NAN));
    let second = headless(ClientSettings::from(&first));

    assert_eq!(first, first.clone());
    assert_eq!(first, second);
}

#[test]
fn test_separate_resolutions_are_not_equal() {
    // Each headless resolution owns a different store.
    assert_ne!(headless(minimal()), headless(minimal()));
}

#[test]
fn test_discovery_url() {
    let resolved = headless(minimal());
    assert_eq!(
        resolved.discovery_url(),
        "https://issuer.example/.well-known/openid-configuration"
    );
    assert!(resolved.metadata_url().is_none());

    let trailing = headless(ClientSettings::new("https://issuer.example/realm/", "abc"));
    assert_eq!(
        trailing.discovery_url(),
        "https://issuer.example/realm/.well-known/openid-configuration"
    );

    let explicit = headless(minimal().with_metadata_url("https://meta.example/config"));
    assert_eq!(explicit.discovery_url(), "https://meta.example/config");
}

#[test]
fn test_resolved_settings_are_shareable() {
    fn assert_send_sync<T: Send + Sync + Clone>() {}
    assert_send_sync::<ResolvedSettings>();

    let resolved = Arc::new(headless(minimal()));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let resolved = resolved.clone();
            std::thread::spawn(move || resolved.clock_skew_in_seconds())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 300);
    }
}

#[test]
fn test_debug_redacts_secret() {
    let resolved = headless(minimal().with_client_secret("s3cret"));
    let rendered = format!("{resolved:?}");
    assert!(!rendered.contains("s3cret"));
    assert!(rendered.contains("<redacted>"));
}
