use std::sync::Arc;

use oidc_client_store::{
    AmbientStorage, InMemoryWebStorage, StateStore, StorageProvider, WebStorageStateStore,
};
use tracing::debug;

use crate::resolved::{ResolvedSettings, StateStoreOrigin};
use crate::settings::ClientSettings;
use crate::value::SettingValue;

pub const DEFAULT_RESPONSE_TYPE: &str = "code";
pub const DEFAULT_SCOPE: &str = "openid";
pub const DEFAULT_STALE_STATE_AGE_IN_SECONDS: u64 = 60 * 15;
pub const DEFAULT_CLOCK_SKEW_IN_SECONDS: u64 = 60 * 5;
pub const DEFAULT_FILTER_PROTOCOL_CLAIMS: bool = true;
pub const DEFAULT_LOAD_USER_INFO: bool = false;
pub const DEFAULT_MERGE_CLAIMS: bool = false;

/// Applies defaults to [`ClientSettings`] and picks the state store.
///
/// The storage provider is probed at most once per resolution, and only when
/// the caller did not supply a store. Resolution has no error of its own;
/// the only failure is a probe error, returned unchanged.
#[derive(Debug, Clone, Default)]
pub struct SettingsResolver<P = AmbientStorage> {
    provider: P,
}

impl SettingsResolver<AmbientStorage> {
    /// Resolver that probes the process-wide ambient storage.
    pub fn new() -> Self {
        Self {
            provider: AmbientStorage,
        }
    }
}

impl<P: StorageProvider> SettingsResolver<P> {
    pub fn with_provider(provider: P) -> Self {
        Self { provider }
    }

    pub fn resolve(&self, settings: ClientSettings) -> Result<ResolvedSettings, P::Error> {
        let (state_store, state_store_origin) = self.resolve_state_store(settings.state_store)?;

        let resolved = ResolvedSettings {
            authority: settings.authority,
            metadata_url: settings.metadata_url,
            metadata: settings.metadata,
            metadata_seed: settings.metadata_seed,
            signing_keys: settings.signing_keys,

            client_id: settings.client_id,
            client_secret: settings.client_secret,
            response_type: settings
                .response_type
                .unwrap_or_else(|| DEFAULT_RESPONSE_TYPE.to_string()),
            scope: settings.scope.unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            redirect_uri: settings.redirect_uri,
            post_logout_redirect_uri: settings.post_logout_redirect_uri,
            client_authentication: settings.client_authentication.unwrap_or_default(),

            prompt: settings.prompt,
            display: settings.display,
            max_age: settings.max_age,
            ui_locales: settings.ui_locales,
            acr_values: settings.acr_values,
            resource: settings.resource,
            response_mode: settings.response_mode.unwrap_or_default(),

            filter_protocol_claims: flag(
                settings.filter_protocol_claims.as_ref(),
                DEFAULT_FILTER_PROTOCOL_CLAIMS,
            ),
            load_user_info: flag(settings.load_user_info.as_ref(), DEFAULT_LOAD_USER_INFO),
            stale_state_age_in_seconds: settings
                .stale_state_age_in_seconds
                .unwrap_or(DEFAULT_STALE_STATE_AGE_IN_SECONDS),
            clock_skew_in_seconds: settings
                .clock_skew_in_seconds
                .unwrap_or(DEFAULT_CLOCK_SKEW_IN_SECONDS),
            user_info_jwt_issuer: settings.user_info_jwt_issuer.unwrap_or_default(),
            merge_claims: flag(settings.merge_claims.as_ref(), DEFAULT_MERGE_CLAIMS),

            state_store,
            state_store_origin,

            extra_query_params: settings.extra_query_params.unwrap_or_default(),
            extra_token_params: settings.extra_token_params.unwrap_or_default(),
        };

        debug!(
            authority = %resolved.authority,
            client_id = %resolved.client_id,
            response_mode = %resolved.response_mode,
            state_store = ?resolved.state_store_origin,
            "client settings resolved"
        );
        Ok(resolved)
    }

    fn resolve_state_store(
        &self,
        supplied: Option<Arc<dyn StateStore>>,
    ) -> Result<(Arc<dyn StateStore>, StateStoreOrigin), P::Error> {
        if let Some(store) = supplied {
            return Ok((store, StateStoreOrigin::Supplied));
        }

        match self.provider.probe()? {
            Some(storage) => {
                debug!("no state store supplied, using ambient durable storage");
                let store: Arc<dyn StateStore> = Arc::new(WebStorageStateStore::new(storage));
                Ok((store, StateStoreOrigin::Durable))
            }
            None => {
                debug!("no durable storage available, falling back to in-memory state store");
                let store: Arc<dyn StateStore> =
                    Arc::new(WebStorageStateStore::new(InMemoryWebStorage::new()));
                Ok((store, StateStoreOrigin::Ephemeral))
            }
        }
    }
}

/// Strict boolean for a loosely typed flag; `default` only when omitted.
fn flag(value: Option<&SettingValue>, default: bool) -> bool {
    value.map_or(default, SettingValue::is_truthy)
}

impl ClientSettings {
    /// Resolve against the process-wide ambient storage.
    pub fn resolve(self) -> ResolvedSettings {
        ResolvedSettings::new(self)
    }
}
