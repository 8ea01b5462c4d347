//! Route guard path configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::routing::RouteGuard;

/// Paths the route guard redirects to
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RoutesConfig {
    /// Where unauthenticated visitors are sent to sign in
    #[serde(default = "default_auth_entry_path")]
    pub auth_entry_path: String,

    /// Default landing view for signed-in users
    #[serde(default = "default_home_path")]
    pub home_path: String,
}

impl RoutesConfig {
    /// Builds the route guard these paths describe.
    pub fn guard(&self) -> RouteGuard {
        RouteGuard::new(&self.auth_entry_path, &self.home_path)
    }

    /// Validate route configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        for path in [&self.auth_entry_path, &self.home_path] {
            if !path.starts_with('/') {
                return Err(ValidationError::RouteMustBeAbsolute(path.clone()));
            }
        }
        Ok(())
    }
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            auth_entry_path: default_auth_entry_path(),
            home_path: default_home_path(),
        }
    }
}

fn default_auth_entry_path() -> String {
    "/auth".to_string()
}

fn default_home_path() -> String {
    "/my-applications".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_the_app_routes() {
        let config = RoutesConfig::default();
        assert_eq!(config.auth_entry_path, "/auth");
        assert_eq!(config.home_path, "/my-applications");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_relative_paths_are_rejected() {
        let config = RoutesConfig {
            auth_entry_path: "auth".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_guard_uses_configured_paths() {
        let config = RoutesConfig {
            auth_entry_path: "/login".to_string(),
            home_path: "/dashboard".to_string(),
        };
        let guard = config.guard();
        assert_eq!(guard.auth_entry_path(), "/login");
        assert_eq!(guard.home_path(), "/dashboard");
    }
}
