//! Loading [`ClientSettings`] from YAML and environment variables.
//!
//! Resolution order (lowest to highest priority):
//! 1. the YAML section under the configured prefix (default `oidc`)
//! 2. `.env` file (loaded into the process environment, never overwriting)
//! 3. environment variables named `{ENV_PREFIX}_{FIELD}` (e.g. `OIDC_CLIENT_ID`)
//!
//! Environment values for the flags and the numeric fields are typed the way
//! YAML would type them, so `OIDC_LOAD_USER_INFO=false` is the boolean `false`,
//! not a non-empty string. Every other field takes the raw text unchanged.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::SettingsError;
use crate::settings::ClientSettings;
use crate::types::{
    ClientAuthentication, ExtraQueryParams, ExtraTokenParams, OidcMetadata, ResponseMode,
    SigningKey,
};
use crate::value::{FromSettingValue, SettingValue};

pub const DEFAULT_PREFIX: &str = "oidc";
pub const DEFAULT_ENV_PREFIX: &str = "OIDC";

/// Recognised keys, with the camelCase spelling also accepted in YAML.
const KNOWN_KEYS: &[(&str, &str)] = &[
    ("authority", "authority"),
    ("metadata_url", "metadataUrl"),
    ("metadata", "metadata"),
    ("metadata_seed", "metadataSeed"),
    ("signing_keys", "signingKeys"),
    ("client_id", "clientId"),
    ("client_secret", "clientSecret"),
    ("response_type", "responseType"),
    ("scope", "scope"),
    ("redirect_uri", "redirectUri"),
    ("post_logout_redirect_uri", "postLogoutRedirectUri"),
    ("client_authentication", "clientAuthentication"),
    ("prompt", "prompt"),
    ("display", "display"),
    ("max_age", "maxAge"),
    ("ui_locales", "uiLocales"),
    ("acr_values", "acrValues"),
    ("resource", "resource"),
    ("response_mode", "responseMode"),
    ("filter_protocol_claims", "filterProtocolClaims"),
    ("load_user_info", "loadUserInfo"),
    ("stale_state_age_in_seconds", "staleStateAgeInSeconds"),
    ("clock_skew_in_seconds", "clockSkewInSeconds"),
    ("user_info_jwt_issuer", "userInfoJwtIssuer"),
    ("merge_claims", "mergeClaims"),
    ("extra_query_params", "extraQueryParams"),
    ("extra_token_params", "extraTokenParams"),
];

/// Keys whose environment values are scalar-typed before use.
const TYPED_ENV_KEYS: &[&str] = &[
    "filter_protocol_claims",
    "load_user_info",
    "merge_claims",
    "max_age",
    "stale_state_age_in_seconds",
    "clock_skew_in_seconds",
];

/// Builder for loading [`ClientSettings`].
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    prefix: String,
    env_prefix: Option<String>,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsLoader {
    /// Loader reading the `oidc` section, without environment overrides.
    pub fn new() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            env_prefix: None,
        }
    }

    /// Dot-separated path of the YAML section holding the settings.
    /// An empty prefix reads the document root.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Enable `.env` loading and `{env_prefix}_{FIELD}` overrides.
    pub fn with_env(mut self, env_prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(env_prefix.into());
        self
    }

    /// Load from a YAML string.
    pub fn load_str(&self, yaml: &str) -> Result<ClientSettings, SettingsError> {
        let doc: serde_yaml::Value =
            serde_yaml::from_str(yaml).map_err(|e| SettingsError::Load(e.to_string()))?;
        self.load_value(&doc)
    }

    /// Load from a YAML file. A missing file contributes nothing, so the
    /// settings may come entirely from the environment.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<ClientSettings, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "settings file not found, skipping");
            return self.load_value(&serde_yaml::Value::Null);
        }
        debug!(path = %path.display(), "loading client settings");
        let content =
            std::fs::read_to_string(path).map_err(|e| SettingsError::Load(e.to_string()))?;
        self.load_str(&content)
    }

    fn load_value(&self, doc: &serde_yaml::Value) -> Result<ClientSettings, SettingsError> {
        let mut values = self.section(doc);

        if let Some(env_prefix) = &self.env_prefix {
            let _ = dotenvy::dotenv();
            overlay_env(env_prefix, &mut values)?;
        }

        build(&self.prefix, &values)
    }

    /// Extract the section under `prefix`, normalising keys to snake_case.
    fn section(&self, doc: &serde_yaml::Value) -> BTreeMap<String, SettingValue> {
        let mut current = doc;
        for part in self.prefix.split('.').filter(|p| !p.is_empty()) {
            match current.get(part) {
                Some(v) => current = v,
                None => return BTreeMap::new(),
            }
        }

        let mut values = BTreeMap::new();
        if let SettingValue::Map(map) = SettingValue::from_yaml(current) {
            for (key, value) in map {
                match canonical_key(&key) {
                    Some(canonical) => {
                        values.insert(canonical.to_string(), value);
                    }
                    None => warn!(
                        key = %self.full_key(&key),
                        kind = value.type_name(),
                        "ignoring unknown client settings key"
                    ),
                }
            }
        }
        values
    }

    fn full_key(&self, key: &str) -> String {
        full_key(&self.prefix, key)
    }
}

impl ClientSettings {
    /// Load the section under `prefix` of a YAML string.
    pub fn from_yaml_str(yaml: &str, prefix: &str) -> Result<Self, SettingsError> {
        SettingsLoader::new().prefix(prefix).load_str(yaml)
    }

    /// Load the section under `prefix` of a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>, prefix: &str) -> Result<Self, SettingsError> {
        SettingsLoader::new().prefix(prefix).load_file(path)
    }
}

fn canonical_key(key: &str) -> Option<&'static str> {
    KNOWN_KEYS
        .iter()
        .find(|(snake, camel)| *snake == key || *camel == key)
        .map(|(snake, _)| *snake)
}

fn full_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn overlay_env(
    env_prefix: &str,
    values: &mut BTreeMap<String, SettingValue>,
) -> Result<(), SettingsError> {
    let var_prefix = format!("{env_prefix}_");
    for (name, raw) in std::env::vars_os() {
        let Some(name) = name.to_str() else {
            continue;
        };
        let Some(rest) = name.strip_prefix(&var_prefix) else {
            continue;
        };
        let key = rest.to_lowercase();
        let Some(canonical) = canonical_key(&key) else {
            debug!(var = %name, "ignoring unrelated environment variable");
            continue;
        };
        let raw = raw.into_string().map_err(|_| {
            SettingsError::Load(format!("environment variable {name} is not valid UTF-8"))
        })?;
        debug!(var = %name, "client setting overridden from environment");
        let value = if TYPED_ENV_KEYS.contains(&canonical) {
            infer_scalar(&raw)
        } else {
            SettingValue::String(raw)
        };
        values.insert(canonical.to_string(), value);
    }
    Ok(())
}

/// Type an environment value the way YAML types a scalar. Anything that does
/// not parse to a scalar stays a string.
fn infer_scalar(raw: &str) -> SettingValue {
    if raw.is_empty() {
        return SettingValue::String(String::new());
    }
    match serde_yaml::from_str::<serde_yaml::Value>(raw) {
        Ok(v @ (serde_yaml::Value::Bool(_) | serde_yaml::Value::Number(_))) => {
            SettingValue::from_yaml(&v)
        }
        _ => SettingValue::String(raw.to_string()),
    }
}

fn build(
    prefix: &str,
    values: &BTreeMap<String, SettingValue>,
) -> Result<ClientSettings, SettingsError> {
    let authority: String = required(prefix, values, "authority")?;
    let client_id: String = required(prefix, values, "client_id")?;

    let mut settings = ClientSettings::new(authority, client_id);

    settings.metadata_url = optional(prefix, values, "metadata_url")?;
    settings.metadata = json_field::<OidcMetadata>(prefix, values, "metadata")?;
    settings.metadata_seed = json_field::<OidcMetadata>(prefix, values, "metadata_seed")?;
    settings.signing_keys = json_field::<Vec<SigningKey>>(prefix, values, "signing_keys")?;

    settings.client_secret = optional(prefix, values, "client_secret")?;
    settings.response_type = optional(prefix, values, "response_type")?;
    settings.scope = optional(prefix, values, "scope")?;
    settings.redirect_uri = optional(prefix, values, "redirect_uri")?;
    settings.post_logout_redirect_uri = optional(prefix, values, "post_logout_redirect_uri")?;
    settings.client_authentication = optional::<String>(prefix, values, "client_authentication")?
        .map(|s| s.parse::<ClientAuthentication>())
        .transpose()?;

    settings.prompt = optional(prefix, values, "prompt")?;
    settings.display = optional(prefix, values, "display")?;
    settings.max_age = optional(prefix, values, "max_age")?;
    settings.ui_locales = optional(prefix, values, "ui_locales")?;
    settings.acr_values = optional(prefix, values, "acr_values")?;
    settings.resource = optional(prefix, values, "resource")?;
    settings.response_mode = optional::<String>(prefix, values, "response_mode")?
        .map(|s| s.parse::<ResponseMode>())
        .transpose()?;

    settings.filter_protocol_claims = values.get("filter_protocol_claims").cloned();
    settings.load_user_info = values.get("load_user_info").cloned();
    settings.stale_state_age_in_seconds =
        optional(prefix, values, "stale_state_age_in_seconds")?;
    settings.clock_skew_in_seconds = optional(prefix, values, "clock_skew_in_seconds")?;
    settings.user_info_jwt_issuer =
        optional::<String>(prefix, values, "user_info_jwt_issuer")?.map(Into::into);
    settings.merge_claims = values.get("merge_claims").cloned();

    settings.extra_query_params =
        optional::<ExtraQueryParams>(prefix, values, "extra_query_params")?;
    settings.extra_token_params =
        optional::<ExtraTokenParams>(prefix, values, "extra_token_params")?;

    Ok(settings)
}

fn required<T: FromSettingValue>(
    prefix: &str,
    values: &BTreeMap<String, SettingValue>,
    key: &'static str,
) -> Result<T, SettingsError> {
    optional(prefix, values, key)?.ok_or_else(|| SettingsError::MissingField(full_key(prefix, key)))
}

fn optional<T: FromSettingValue>(
    prefix: &str,
    values: &BTreeMap<String, SettingValue>,
    key: &'static str,
) -> Result<Option<T>, SettingsError> {
    match values.get(key) {
        Some(value) => Option::<T>::from_setting_value(value, &full_key(prefix, key)),
        None => Ok(None),
    }
}

/// Structured fields go through serde so their shape is checked in one place.
fn json_field<T: serde::de::DeserializeOwned>(
    prefix: &str,
    values: &BTreeMap<String, SettingValue>,
    key: &'static str,
) -> Result<Option<T>, SettingsError> {
    match values.get(key) {
        None | Some(SettingValue::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.to_json())
            .map(Some)
            .map_err(|_| SettingsError::TypeMismatch {
                key: full_key(prefix, key),
                expected: std::any::type_name::<T>(),
            }),
    }
}
