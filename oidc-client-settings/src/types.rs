use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Extra query string parameters added to the authorization request.
pub type ExtraQueryParams = BTreeMap<String, QueryParamValue>;

/// Extra parameters added to the token request.
pub type ExtraTokenParams = BTreeMap<String, serde_json::Value>;

/// A public signing key in JWK form (`kty`, `n`, `e`, `x5c`, ...).
pub type SigningKey = BTreeMap<String, KeyParam>;

/// How the authorization response is returned to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    #[default]
    Query,
    Fragment,
}

impl ResponseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseMode::Query => "query",
            ResponseMode::Fragment => "fragment",
        }
    }
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseMode {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "query" => Ok(ResponseMode::Query),
            "fragment" => Ok(ResponseMode::Fragment),
            other => Err(SettingsError::InvalidResponseMode(other.to_string())),
        }
    }
}

/// Client authentication method used at the token endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthentication {
    #[default]
    ClientSecretPost,
    ClientSecretBasic,
}

impl ClientAuthentication {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientAuthentication::ClientSecretPost => "client_secret_post",
            ClientAuthentication::ClientSecretBasic => "client_secret_basic",
        }
    }
}

impl fmt::Display for ClientAuthentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientAuthentication {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client_secret_post" => Ok(ClientAuthentication::ClientSecretPost),
            "client_secret_basic" => Ok(ClientAuthentication::ClientSecretBasic),
            other => Err(SettingsError::InvalidClientAuthentication(other.to_string())),
        }
    }
}

/// Which issuer a signed user-info response must come from.
///
/// `ANY` accepts any issuer, `OP` requires the provider's own issuer, and
/// any other string names the exact issuer expected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum UserInfoJwtIssuer {
    Any,
    #[default]
    Op,
    Issuer(String),
}

impl UserInfoJwtIssuer {
    pub fn as_str(&self) -> &str {
        match self {
            UserInfoJwtIssuer::Any => "ANY",
            UserInfoJwtIssuer::Op => "OP",
            UserInfoJwtIssuer::Issuer(issuer) => issuer,
        }
    }
}

impl From<&str> for UserInfoJwtIssuer {
    fn from(value: &str) -> Self {
        match value {
            "ANY" => UserInfoJwtIssuer::Any,
            "OP" => UserInfoJwtIssuer::Op,
            issuer => UserInfoJwtIssuer::Issuer(issuer.to_string()),
        }
    }
}

impl From<String> for UserInfoJwtIssuer {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ANY" => UserInfoJwtIssuer::Any,
            "OP" => UserInfoJwtIssuer::Op,
            _ => UserInfoJwtIssuer::Issuer(value),
        }
    }
}

impl fmt::Display for UserInfoJwtIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar value of an extra query parameter.
///
/// Floats compare by bit pattern, so a `NaN` parameter equals itself and a
/// settings record holding one still equals its own re-resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryParamValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl PartialEq for QueryParamValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (QueryParamValue::Bool(a), QueryParamValue::Bool(b)) => a == b,
            (QueryParamValue::Integer(a), QueryParamValue::Integer(b)) => a == b,
            (QueryParamValue::Float(a), QueryParamValue::Float(b)) => a.to_bits() == b.to_bits(),
            (QueryParamValue::String(a), QueryParamValue::String(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for QueryParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryParamValue::Bool(b) => write!(f, "{b}"),
            QueryParamValue::Integer(i) => write!(f, "{i}"),
            QueryParamValue::Float(x) => write!(f, "{x}"),
            QueryParamValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for QueryParamValue {
    fn from(value: &str) -> Self {
        QueryParamValue::String(value.to_string())
    }
}

impl From<String> for QueryParamValue {
    fn from(value: String) -> Self {
        QueryParamValue::String(value)
    }
}

impl From<bool> for QueryParamValue {
    fn from(value: bool) -> Self {
        QueryParamValue::Bool(value)
    }
}

impl From<i64> for QueryParamValue {
    fn from(value: i64) -> Self {
        QueryParamValue::Integer(value)
    }
}

impl From<f64> for QueryParamValue {
    fn from(value: f64) -> Self {
        QueryParamValue::Float(value)
    }
}

/// A single member of a [`SigningKey`]: either one string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyParam {
    One(String),
    Many(Vec<String>),
}

/// Provider metadata, as published in the discovery document.
///
/// Every member is optional: callers may supply a partial document to skip
/// or seed discovery.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OidcMetadata {
    pub issuer: Option<String>,
    pub authorization_endpoint: Option<String>,
    pub token_endpoint: Option<String>,
    pub userinfo_endpoint: Option<String>,
    pub jwks_uri: Option<String>,
    pub end_session_endpoint: Option<String>,
    pub check_session_iframe: Option<String>,
    pub revocation_endpoint: Option<String>,
    pub introspection_endpoint: Option<String>,
    pub registration_endpoint: Option<String>,
    pub scopes_supported: Option<Vec<String>>,
    pub response_types_supported: Option<Vec<String>>,
    pub response_modes_supported: Option<Vec<String>>,
    pub grant_types_supported: Option<Vec<String>>,
    pub subject_types_supported: Option<Vec<String>>,
    pub id_token_signing_alg_values_supported: Option<Vec<String>>,
    pub token_endpoint_auth_methods_supported: Option<Vec<String>>,
    pub claims_supported: Option<Vec<String>>,
    pub code_challenge_methods_supported: Option<Vec<String>>,
}
