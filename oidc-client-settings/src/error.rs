/// Errors raised while turning textual input (YAML, environment variables,
/// strings) into [`ClientSettings`](crate::ClientSettings).
///
/// Resolution itself never produces one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    /// An I/O or YAML parsing error occurred while loading settings.
    Load(String),
    /// A required field (`authority`, `client_id`) is absent.
    MissingField(String),
    /// The value could not be converted to the field's type.
    TypeMismatch { key: String, expected: &'static str },
    /// `response_mode` is neither `query` nor `fragment`.
    InvalidResponseMode(String),
    /// `client_authentication` is not a supported method.
    InvalidClientAuthentication(String),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Load(msg) => write!(f, "Settings load error: {msg}"),
            SettingsError::MissingField(key) => write!(f, "Missing required setting: {key}"),
            SettingsError::TypeMismatch { key, expected } => {
                write!(f, "Setting type mismatch for '{key}': expected {expected}")
            }
            SettingsError::InvalidResponseMode(value) => write!(
                f,
                "Invalid response_mode '{value}': expected 'query' or 'fragment'"
            ),
            SettingsError::InvalidClientAuthentication(value) => write!(
                f,
                "Invalid client_authentication '{value}': expected 'client_secret_post' or 'client_secret_basic'"
            ),
        }
    }
}

impl std::error::Error for SettingsError {}
