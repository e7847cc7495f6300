use std::fmt;
use std::sync::Arc;

use oidc_client_store::StateStore;

use crate::resolver::SettingsResolver;
use crate::settings::ClientSettings;
use crate::types::{
    ClientAuthentication, ExtraQueryParams, ExtraTokenParams, OidcMetadata, ResponseMode,
    SigningKey, UserInfoJwtIssuer,
};
use crate::value::SettingValue;

const DISCOVERY_PATH: &str = ".well-known/openid-configuration";

/// Where the resolved state store came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateStoreOrigin {
    /// Supplied by the caller and used verbatim.
    Supplied,
    /// Adapter over durable storage offered by the environment.
    Durable,
    /// Fresh process-local store; contents do not outlive the process.
    Ephemeral,
}

/// Client settings with every default applied.
///
/// Read-only once built: fields are exposed through accessors only. Cheap to
/// clone and safe to share across threads.
#[derive(Clone)]
pub struct ResolvedSettings {
    pub(crate) authority: String,
    pub(crate) metadata_url: Option<String>,
    pub(crate) metadata: Option<OidcMetadata>,
    pub(crate) metadata_seed: Option<OidcMetadata>,
    pub(crate) signing_keys: Option<Vec<SigningKey>>,

    pub(crate) client_id: String,
    pub(crate) client_secret: Option<String>,
    pub(crate) response_type: String,
    pub(crate) scope: String,
    pub(crate) redirect_uri: Option<String>,
    pub(crate) post_logout_redirect_uri: Option<String>,
    pub(crate) client_authentication: ClientAuthentication,

    pub(crate) prompt: Option<String>,
    pub(crate) display: Option<String>,
    pub(crate) max_age: Option<u64>,
    pub(crate) ui_locales: Option<String>,
    pub(crate) acr_values: Option<String>,
    pub(crate) resource: Option<String>,
    pub(crate) response_mode: ResponseMode,

    pub(crate) filter_protocol_claims: bool,
    pub(crate) load_user_info: bool,
    pub(crate) stale_state_age_in_seconds: u64,
    pub(crate) clock_skew_in_seconds: u64,
    pub(crate) user_info_jwt_issuer: UserInfoJwtIssuer,
    pub(crate) merge_claims: bool,

    pub(crate) state_store: Arc<dyn StateStore>,
    pub(crate) state_store_origin: StateStoreOrigin,

    pub(crate) extra_query_params: ExtraQueryParams,
    pub(crate) extra_token_params: ExtraTokenParams,
}

impl ResolvedSettings {
    /// Resolve `settings`, probing the process-wide ambient storage for the
    /// state store fallback.
    pub fn new(settings: ClientSettings) -> Self {
        match SettingsResolver::new().resolve(settings) {
            Ok(resolved) => resolved,
            Err(never) => match never {},
        }
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn metadata_url(&self) -> Option<&str> {
        self.metadata_url.as_deref()
    }

    /// URL of the discovery document: `metadata_url` when set, otherwise
    /// derived from `authority`.
    pub fn discovery_url(&self) -> String {
        if let Some(url) = &self.metadata_url {
            return url.clone();
        }
        if self.authority.ends_with('/') {
            format!("{}{DISCOVERY_PATH}", self.authority)
        } else {
            format!("{}/{DISCOVERY_PATH}", self.authority)
        }
    }

    pub fn metadata(&self) -> Option<&OidcMetadata> {
        self.metadata.as_ref()
    }

    pub fn metadata_seed(&self) -> Option<&OidcMetadata> {
        self.metadata_seed.as_ref()
    }

    pub fn signing_keys(&self) -> Option<&[SigningKey]> {
        self.signing_keys.as_deref()
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }

    pub fn response_type(&self) -> &str {
        &self.response_type
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }

    pub fn post_logout_redirect_uri(&self) -> Option<&str> {
        self.post_logout_redirect_uri.as_deref()
    }

    pub fn client_authentication(&self) -> ClientAuthentication {
        self.client_authentication
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    pub fn max_age(&self) -> Option<u64> {
        self.max_age
    }

    pub fn ui_locales(&self) -> Option<&str> {
        self.ui_locales.as_deref()
    }

    pub fn acr_values(&self) -> Option<&str> {
        self.acr_values.as_deref()
    }

    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    pub fn response_mode(&self) -> ResponseMode {
        self.response_mode
    }

    pub fn filter_protocol_claims(&self) -> bool {
        self.filter_protocol_claims
    }

    pub fn load_user_info(&self) -> bool {
        self.load_user_info
    }

    pub fn stale_state_age_in_seconds(&self) -> u64 {
        self.stale_state_age_in_seconds
    }

    pub fn clock_skew_in_seconds(&self) -> u64 {
        self.clock_skew_in_seconds
    }

    pub fn user_info_jwt_issuer(&self) -> &UserInfoJwtIssuer {
        &self.user_info_jwt_issuer
    }

    pub fn merge_claims(&self) -> bool {
        self.merge_claims
    }

    pub fn state_store(&self) -> &Arc<dyn StateStore> {
        &self.state_store
    }

    pub fn state_store_origin(&self) -> StateStoreOrigin {
        self.state_store_origin
    }

    pub fn extra_query_params(&self) -> &ExtraQueryParams {
        &self.extra_query_params
    }

    pub fn extra_token_params(&self) -> &ExtraTokenParams {
        &self.extra_token_params
    }
}

/// Turn resolved settings back into raw input. Resolving the result yields a
/// record equal to `resolved`, sharing the same state store.
impl From<&ResolvedSettings> for ClientSettings {
    fn from(resolved: &ResolvedSettings) -> Self {
        ClientSettings {
            authority: resolved.authority.clone(),
            metadata_url: resolved.metadata_url.clone(),
            metadata: resolved.metadata.clone(),
            metadata_seed: resolved.metadata_seed.clone(),
            signing_keys: resolved.signing_keys.clone(),
            client_id: resolved.client_id.clone(),
            client_secret: resolved.client_secret.clone(),
            response_type: Some(resolved.response_type.clone()),
            scope: Some(resolved.scope.clone()),
            redirect_uri: resolved.redirect_uri.clone(),
            post_logout_redirect_uri: resolved.post_logout_redirect_uri.clone(),
            client_authentication: Some(resolved.client_authentication),
            prompt: resolved.prompt.clone(),
            display: resolved.display.clone(),
            max_age: resolved.max_age,
            ui_locales: resolved.ui_locales.clone(),
            acr_values: resolved.acr_values.clone(),
            resource: resolved.resource.clone(),
            response_mode: Some(resolved.response_mode),
            filter_protocol_claims: Some(SettingValue::Bool(resolved.filter_protocol_claims)),
            load_user_info: Some(SettingValue::Bool(resolved.load_user_info)),
            stale_state_age_in_seconds: Some(resolved.stale_state_age_in_seconds),
            clock_skew_in_seconds: Some(resolved.clock_skew_in_seconds),
            user_info_jwt_issuer: Some(resolved.user_info_jwt_issuer.clone()),
            merge_claims: Some(SettingValue::Bool(resolved.merge_claims)),
            state_store: Some(resolved.state_store.clone()),
            extra_query_params: Some(resolved.extra_query_params.clone()),
            extra_token_params: Some(resolved.extra_token_params.clone()),
        }
    }
}

/// Compares every setting and the identity of the state store.
/// `state_store_origin` is ignored: it records how the store was obtained,
/// not what it is.
impl PartialEq for ResolvedSettings {
    fn eq(&self, other: &Self) -> bool {
        self.authority == other.authority
            && self.metadata_url == other.metadata_url
            && self.metadata == other.metadata
            && self.metadata_seed == other.metadata_seed
            && self.signing_keys == other.signing_keys
            && self.client_id == other.client_id
            && self.client_secret == other.client_secret
            && self.response_type == other.response_type
            && self.scope == other.scope
            && self.redirect_uri == other.redirect_uri
            && self.post_logout_redirect_uri == other.post_logout_redirect_uri
            && self.client_authentication == other.client_authentication
            && self.prompt == other.prompt
            && self.display == other.display
            && self.max_age == other.max_age
            && self.ui_locales == other.ui_locales
            && self.acr_values == other.acr_values
            && self.resource == other.resource
            && self.response_mode == other.response_mode
            && self.filter_protocol_claims == other.filter_protocol_claims
            && self.load_user_info == other.load_user_info
            && self.stale_state_age_in_seconds == other.stale_state_age_in_seconds
            && self.clock_skew_in_seconds == other.clock_skew_in_seconds
            && self.user_info_jwt_issuer == other.user_info_jwt_issuer
            && self.merge_claims == other.merge_claims
            && Arc::ptr_eq(&self.state_store, &other.state_store)
            && self.extra_query_params == other.extra_query_params
            && self.extra_token_params == other.extra_token_params
    }
}

impl fmt::Debug for ResolvedSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedSettings")
            .field("authority", &self.authority)
            .field("metadata_url", &self.metadata_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("response_type", &self.response_type)
            .field("scope", &self.scope)
            .field("redirect_uri", &self.redirect_uri)
            .field("client_authentication", &self.client_authentication)
            .field("response_mode", &self.response_mode)
            .field("filter_protocol_claims", &self.filter_protocol_claims)
            .field("load_user_info", &self.load_user_info)
            .field("stale_state_age_in_seconds", &self.stale_state_age_in_seconds)
            .field("clock_skew_in_seconds", &self.clock_skew_in_seconds)
            .field("user_info_jwt_issuer", &self.user_info_jwt_issuer)
            .field("merge_claims", &self.merge_claims)
            .field("state_store_origin", &self.state_store_origin)
            .field("extra_query_params", &self.extra_query_params)
            .field("extra_token_params", &self.extra_token_params)
            .finish_non_exhaustive()
    }
}
