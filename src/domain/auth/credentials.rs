//! Credential payloads for the sign-in and sign-up forms.
//!
//! Validation happens here, at construction - a `Credentials` or
//! `SignUpRequest` that exists has already passed the local schema checks,
//! so invalid input never reaches the session store or the gateway.

use secrecy::SecretString;
use serde::Deserialize;

use super::profile::UserRole;
use crate::domain::foundation::ValidationError;

/// Minimum password length accepted by the gateway.
const MIN_PASSWORD_LEN: usize = 6;

/// Validated email/password pair for sign-in.
///
/// The password is held as a `SecretString` so it is redacted from `Debug`
/// output and never logged.
#[derive(Debug, Clone)]
pub struct Credentials {
    email: String,
    password: SecretString,
}

impl Credentials {
    /// Creates credentials, validating the email shape and password length.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let email = email.into();
        let password = password.into();
        validate_email(&email)?;
        validate_password(&password)?;
        Ok(Self {
            email,
            password: SecretString::new(password),
        })
    }

    /// Returns the email address.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the password secret.
    pub fn password(&self) -> &SecretString {
        &self.password
    }
}

/// Validated sign-up payload: credentials plus the profile seed.
#[derive(Debug, Clone)]
pub struct SignUpRequest {
    email: String,
    password: SecretString,
    full_name: String,
    user_type: UserRole,
}

impl SignUpRequest {
    /// Creates a sign-up request, validating every field locally.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        full_name: impl Into<String>,
        user_type: UserRole,
    ) -> Result<Self, ValidationError> {
        let email = email.into();
        let password = password.into();
        let full_name = full_name.into();
        validate_email(&email)?;
        validate_password(&password)?;
        if full_name.trim().is_empty() {
            return Err(ValidationError::empty_field("full_name"));
        }
        Ok(Self {
            email,
            password: SecretString::new(password),
            full_name,
            user_type,
        })
    }

    /// Returns the email address.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the password secret.
    pub fn password(&self) -> &SecretString {
        &self.password
    }

    /// Returns the display name to seed the profile with.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Returns the requested account role.
    pub fn user_type(&self) -> UserRole {
        self.user_type
    }
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::empty_field("email"));
    }
    // The gateway performs full address verification; this only catches
    // obvious form typos before a round-trip.
    if !email.contains('@') {
        return Err(ValidationError::invalid_format("email", "missing @ symbol"));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ValidationError::invalid_format(
            "password",
            format!("must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }
    Ok(())
}

/// Unvalidated sign-up payload as a form submits it.
///
/// Deserialize this at the form boundary, then `try_into()` a
/// `SignUpRequest` to run the local schema checks.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSignUp {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub user_type: UserRole,
}

impl TryFrom<RawSignUp> for SignUpRequest {
    type Error = ValidationError;

    fn try_from(raw: RawSignUp) -> Result<Self, Self::Error> {
        SignUpRequest::new(raw.email, raw.password, raw.full_name, raw.user_type)
    }
}
