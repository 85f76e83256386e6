//! Request DTOs for the API.

use serde::Deserialize;
use validator::{Validate, ValidationError};

use super::validation::{no_control_chars, uuid_format};

/// User registration request.
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "passwords_match"))]
pub struct RegisterRequest {
    /// Email address (becomes the login key).
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    /// Password.
    #[validate(length(
        min = 8,
        max = 128,
        message = "Password must be between 8 and 128 characters"
    ))]
    pub password: String,
    /// Password confirmation; must match `password`.
    pub password_confirm: String,
    /// First name (optional).
    #[serde(default)]
    #[validate(length(max = 150, message = "First name is too long"), custom(function = "no_control_chars"))]
    pub first_name: String,
    /// Last name (optional).
    #[serde(default)]
    #[validate(length(max = 150, message = "Last name is too long"), custom(function = "no_control_chars"))]
    pub last_name: String,
}

/// Cross-field check shared by registration and password reset.
fn passwords_match<T: PasswordPair>(req: &T) -> Result<(), ValidationError> {
    if req.password() != req.password_confirm() {
        return Err(
            ValidationError::new("password_mismatch").with_message("Passwords don't match".into())
        );
    }
    Ok(())
}

/// Access to the password/confirmation pair for cross-field validation.
trait PasswordPair {
    fn password(&self) -> &str;
    fn password_confirm(&self) -> &str;
}

// The derive hands the schema function a reference
impl<T: PasswordPair> PasswordPair for &T {
    fn password(&self) -> &str {
        (**self).password()
    }
    fn password_confirm(&self) -> &str {
        (**self).password_confirm()
    }
}

impl PasswordPair for RegisterRequest {
    fn password(&self) -> &str {
        &self.password
    }
    fn password_confirm(&self) -> &str {
        &self.password_confirm
    }
}

impl PasswordPair for ResetPasswordRequest {
    fn password(&self) -> &str {
        &self.password
    }
    fn password_confirm(&self) -> &str {
        &self.password_confirm
    }
}

/// Login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Email verification request.
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    /// Verification token value.
    #[validate(custom(function = "uuid_format"))]
    pub token: String,
}

/// Resend-verification request.
#[derive(Debug, Deserialize, Validate)]
pub struct ResendVerificationRequest {
    /// Email address of the account to re-verify.
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
}

/// Forgot-password request.
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    /// Email address of the account.
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
}

/// Reset-password request.
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "passwords_match"))]
pub struct ResetPasswordRequest {
    /// Reset token value.
    #[validate(custom(function = "uuid_format"))]
    pub token: String,
    /// New password.
    #[validate(length(
        min = 8,
        max = 128,
        message = "Password must be between 8 and 128 characters"
    ))]
    pub password: String,
    /// Password confirmation; must match `password`.
    pub password_confirm: String,
}

/// Profile update request.
///
/// Only the name fields are writable. Any other fields in the payload
/// (email, username, is_email_verified, ...) are ignored by
/// deserialization rather than rejected.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New first name.
    #[validate(length(max = 150, message = "First name is too long"), custom(function = "no_control_chars"))]
    pub first_name: Option<String>,
    /// New last name.
    #[validate(length(max = 150, message = "Last name is too long"), custom(function = "no_control_chars"))]
    pub last_name: Option<String>,
}

/// Logout request. The refresh token is optional; logging out without
/// one is a no-op.
#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    /// Refresh token to revoke.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn register_request(password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            email: "a@example.com".to_string(),
            password: password.to_string(),
            password_confirm: confirm.to_string(),
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    #[test]
    fn test_register_valid() {
        assert!(register_request("password123", "password123")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_register_password_mismatch() {
        let errors = register_request("password123", "different")
            .validate()
            .unwrap_err();
        assert!(errors.field_errors().contains_key("__all__"));
    }

    #[test]
    fn test_register_bad_email() {
        let mut req = register_request("password123", "password123");
        req.email = "not-an-email".to_string();

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_register_short_password() {
        let errors = register_request("short", "short").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_verify_email_token_format() {
        let valid = VerifyEmailRequest {
            token: uuid::Uuid::new_v4().to_string(),
        };
        assert!(valid.validate().is_ok());

        let invalid = VerifyEmailRequest {
            token: "garbage".to_string(),
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_reset_password_mismatch() {
        let req = ResetPasswordRequest {
            token: uuid::Uuid::new_v4().to_string(),
            password: "password123".to_string(),
            password_confirm: "password456".to_string(),
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("__all__"));
    }

    #[test]
    fn test_update_profile_all_optional() {
        let req = UpdateProfileRequest {
            first_name: None,
            last_name: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_profile_long_name() {
        let req = UpdateProfileRequest {
            first_name: Some("x".repeat(151)),
            last_name: None,
        };
        assert!(req.validate().is_err());
    }
}
