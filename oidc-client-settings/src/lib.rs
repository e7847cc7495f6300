//! Settings for an OIDC/OAuth2 client.
//!
//! [`ClientSettings`] is what the caller provides: only `authority` and
//! `client_id` are required. [`SettingsResolver`] turns it into
//! [`ResolvedSettings`], an immutable record with every default applied and
//! exactly one [`StateStore`](oidc_client_store::StateStore) chosen for the
//! lifetime of the client.
//!
//! # Example
//!
//! ```ignore
//! use oidc_client_settings::{ClientSettings, ResponseMode};
//!
//! let settings = ClientSettings::new("https://issuer.example", "my-client")
//!     .with_response_mode(ResponseMode::Fragment)
//!     .with_load_user_info(true)
//!     .resolve();
//!
//! assert_eq!(settings.clock_skew_in_seconds(), 300);
//! ```
//!
//! Settings can also be read from YAML, with environment overrides:
//!
//! ```ignore
//! let settings = SettingsLoader::new()
//!     .with_env("OIDC")
//!     .load_file("application.yaml")?
//!     .resolve();
//! ```

pub mod error;
pub mod loader;
pub mod logging;
pub mod resolved;
pub mod resolver;
pub mod settings;
pub mod types;
pub mod value;

pub use error::SettingsError;
pub use loader::SettingsLoader;
pub use logging::init_tracing;
pub use resolved::{ResolvedSettings, StateStoreOrigin};
pub use resolver::{
    SettingsResolver, DEFAULT_CLOCK_SKEW_IN_SECONDS, DEFAULT_RESPONSE_TYPE, DEFAULT_SCOPE,
    DEFAULT_STALE_STATE_AGE_IN_SECONDS,
};
pub use settings::ClientSettings;
pub use types::{
    ClientAuthentication, ExtraQueryParams, ExtraTokenParams, KeyParam, OidcMetadata,
    QueryParamValue, ResponseMode, SigningKey, UserInfoJwtIssuer,
};
pub use value::{FromSettingValue, SettingValue};

pub use oidc_client_store;

pub mod prelude {
    //! Re-exports of the most commonly used settings types.
    pub use crate::{
        ClientSettings, ResolvedSettings, ResponseMode, SettingValue, SettingsLoader,
        SettingsResolver, UserInfoJwtIssuer,
    };
    pub use oidc_client_store::prelude::*;
}
