//! Managed backend configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::environment::Environment;
use super::error::ValidationError;

/// Connection settings for the managed backend
///
/// The anon key is the public client key the backend issues per project;
/// it is still kept behind `SecretString` so it never lands in logs.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Project URL of the managed backend
    pub url: String,

    /// Publishable client key
    pub anon_key: SecretString,
}

impl GatewayConfig {
    /// Validate gateway configuration
    ///
    /// In production, requires HTTPS for the project URL.
    /// In development, allows localhost with HTTP/HTTPS.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("GATEWAY_URL"));
        }
        if self.anon_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("GATEWAY_ANON_KEY"));
        }

        if *environment == Environment::Production && !self.url.starts_with("https://") {
            return Err(ValidationError::GatewayMustBeHttps);
        }

        Ok(())
    }
}
