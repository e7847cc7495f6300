use std::fmt;
use std::sync::Arc;

use oidc_client_store::StateStore;

use crate::types::{
    ClientAuthentication, ExtraQueryParams, ExtraTokenParams, OidcMetadata, QueryParamValue,
    ResponseMode, SigningKey, UserInfoJwtIssuer,
};
use crate::value::SettingValue;

/// Caller-supplied client configuration.
///
/// Only `authority` and `client_id` are required. Every other field may be
/// left as `None` and is either defaulted or left unset by
/// [`SettingsResolver`](crate::SettingsResolver).
#[derive(Clone)]
pub struct ClientSettings {
    /// Issuer identifier of the OIDC/OAuth2 provider.
    pub authority: String,
    /// URL of the discovery document. Derived from `authority` when unset.
    pub metadata_url: Option<String>,
    /// Provider metadata that replaces discovery.
    pub metadata: Option<OidcMetadata>,
    /// Provider metadata merged over the discovered document.
    pub metadata_seed: Option<OidcMetadata>,
    /// Signing keys used instead of fetching `jwks_uri`.
    pub signing_keys: Option<Vec<SigningKey>>,

    /// Client identifier registered with the provider.
    pub client_id: String,
    pub client_secret: Option<String>,
    /// Response type (default: `code`).
    pub response_type: Option<String>,
    /// Requested scope (default: `openid`).
    pub scope: Option<String>,
    pub redirect_uri: Option<String>,
    pub post_logout_redirect_uri: Option<String>,
    /// Token endpoint authentication method (default: `client_secret_post`).
    pub client_authentication: Option<ClientAuthentication>,

    pub prompt: Option<String>,
    pub display: Option<String>,
    pub max_age: Option<u64>,
    pub ui_locales: Option<String>,
    pub acr_values: Option<String>,
    pub resource: Option<String>,
    /// Response mode (default: `query`).
    pub response_mode: Option<ResponseMode>,

    /// Remove protocol claims from the profile (default: true).
    pub filter_protocol_claims: Option<SettingValue>,
    /// Load the user's profile from the user info endpoint (default: false).
    pub load_user_info: Option<SettingValue>,
    /// Age in seconds after which an unfinished interaction-state entry is
    /// considered abandoned (default: 900).
    pub stale_state_age_in_seconds: Option<u64>,
    /// Tolerance in seconds when checking `iat`, `nbf` and `exp` (default: 300).
    pub clock_skew_in_seconds: Option<u64>,
    /// Expected issuer of signed user info responses (default: `OP`).
    pub user_info_jwt_issuer: Option<UserInfoJwtIssuer>,
    /// Merge object-valued user info claims into the id token claims instead
    /// of collecting them in a list (default: false).
    pub merge_claims: Option<SettingValue>,

    /// Persistence for interaction state (default: ambient durable storage,
    /// else an in-memory store).
    pub state_store: Option<Arc<dyn StateStore>>,

    /// Additional authorization request parameters (default: empty).
    pub extra_query_params: Option<ExtraQueryParams>,
    /// Additional token request parameters (default: empty).
    pub extra_token_params: Option<ExtraTokenParams>,
}

impl ClientSettings {
    pub fn new(authority: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            metadata_url: None,
            metadata: None,
            metadata_seed: None,
            signing_keys: None,
            client_id: client_id.into(),
            client_secret: None,
            response_type: None,
            scope: None,
            redirect_uri: None,
            post_logout_redirect_uri: None,
            client_authentication: None,
            prompt: None,
            display: None,
            max_age: None,
            ui_locales: None,
            acr_values: None,
            resource: None,
            response_mode: None,
            filter_protocol_claims: None,
            load_user_info: None,
            stale_state_age_in_seconds: None,
            clock_skew_in_seconds: None,
            user_info_jwt_issuer: None,
            merge_claims: None,
            state_store: None,
            extra_query_params: None,
            extra_token_params: None,
        }
    }

    pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    pub fn with_metadata_url(mut self, url: impl Into<String>) -> Self {
        self.metadata_url = Some(url.into());
        self
    }

    pub fn with_metadata(mut self, metadata: OidcMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_metadata_seed(mut self, seed: OidcMetadata) -> Self {
        self.metadata_seed = Some(seed);
        self
    }

    pub fn with_signing_keys(mut self, keys: impl IntoIterator<Item = SigningKey>) -> Self {
        self.signing_keys = Some(keys.into_iter().collect());
        self
    }

    pub fn with_response_type(mut self, response_type: impl Into<String>) -> Self {
        self.response_type = Some(response_type.into());
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(uri.into());
        self
    }

    pub fn with_post_logout_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.post_logout_redirect_uri = Some(uri.into());
        self
    }

    pub fn with_client_authentication(mut self, method: ClientAuthentication) -> Self {
        self.client_authentication = Some(method);
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn with_max_age(mut self, secs: u64) -> Self {
        self.max_age = Some(secs);
        self
    }

    pub fn with_ui_locales(mut self, locales: impl Into<String>) -> Self {
        self.ui_locales = Some(locales.into());
        self
    }

    pub fn with_acr_values(mut self, acr_values: impl Into<String>) -> Self {
        self.acr_values = Some(acr_values.into());
        self
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn with_response_mode(mut self, mode: ResponseMode) -> Self {
        self.response_mode = Some(mode);
        self
    }

    /// Accepts any value; it is coerced by truthiness at resolution.
    pub fn with_filter_protocol_claims(mut self, value: impl Into<SettingValue>) -> Self {
        self.filter_protocol_claims = Some(value.into());
        self
    }

    /// Accepts any value; it is coerced by truthiness at resolution.
    pub fn with_load_user_info(mut self, value: impl Into<SettingValue>) -> Self {
        self.load_user_info = Some(value.into());
        self
    }

    /// Accepts any value; it is coerced by truthiness at resolution.
    pub fn with_merge_claims(mut self, value: impl Into<SettingValue>) -> Self {
        self.merge_claims = Some(value.into());
        self
    }

    pub fn with_stale_state_age(mut self, secs: u64) -> Self {
        self.stale_state_age_in_seconds = Some(secs);
        self
    }

    pub fn with_clock_skew(mut self, secs: u64) -> Self {
        self.clock_skew_in_seconds = Some(secs);
        self
    }

    pub fn with_user_info_jwt_issuer(mut self, issuer: impl Into<UserInfoJwtIssuer>) -> Self {
        self.user_info_jwt_issuer = Some(issuer.into());
        self
    }

    /// Use this store verbatim instead of the runtime-selected default.
    pub fn with_state_store(mut self, store: Arc<dyn StateStore>) -> Self {
        self.state_store = Some(store);
        self
    }

    /// Add one extra authorization request parameter.
    pub fn with_extra_query_param(
        mut self,
        name: impl Into<String>,
        value: impl Into<QueryParamValue>,
    ) -> Self {
        self.extra_query_params
            .get_or_insert_with(ExtraQueryParams::new)
            .insert(name.into(), value.into());
        self
    }

    /// Add one extra token request parameter.
    pub fn with_extra_token_param(
        mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.extra_token_params
            .get_or_insert_with(ExtraTokenParams::new)
            .insert(name.into(), value.into());
        self
    }
}

impl fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSettings")
            .field("authority", &self.authority)
            .field("metadata_url", &self.metadata_url)
            .field("metadata", &self.metadata)
            .field("metadata_seed", &self.metadata_seed)
            .field("signing_keys", &self.signing_keys)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("response_type", &self.response_type)
            .field("scope", &self.scope)
            .field("redirect_uri", &self.redirect_uri)
            .field("post_logout_redirect_uri", &self.post_logout_redirect_uri)
            .field("client_authentication", &self.client_authentication)
            .field("prompt", &self.prompt)
            .field("display", &self.display)
            .field("max_age", &self.max_age)
            .field("ui_locales", &self.ui_locales)
            .field("acr_values", &self.acr_values)
            .field("resource", &self.resource)
            .field("response_mode", &self.response_mode)
            .field("filter_protocol_claims", &self.filter_protocol_claims)
            .field("load_user_info", &self.load_user_info)
            .field("stale_state_age_in_seconds", &self.stale_state_age_in_seconds)
            .field("clock_skew_in_seconds", &self.clock_skew_in_seconds)
            .field("user_info_jwt_issuer", &self.user_info_jwt_issuer)
            .field("merge_claims", &self.merge_claims)
            .field("state_store", &self.state_store.as_ref().map(|_| "<supplied>"))
            .field("extra_query_params", &self.extra_query_params)
            .field("extra_token_params", &self.extra_token_params)
            .finish()
    }
}
