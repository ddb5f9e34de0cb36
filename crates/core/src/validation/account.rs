//! Account schemas: sign in and password reset.

use serde::{Deserialize, Serialize};

use super::registration::{MIN_PASSWORD_LENGTH, validate_email};
use super::{FieldErrors, Validate, fields};
use crate::types::Email;

/// Minimum length of a password chosen through the reset flow.
pub const MIN_RESET_PASSWORD_LENGTH: usize = 8;

/// Sign-in form as typed.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Validated sign-in credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginDraft {
    pub email: Email,
    pub password: String,
}

impl Validate for LoginInput {
    type Output = LoginDraft;

    fn validate(&self) -> Result<LoginDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let email = validate_email(&mut errors, &self.email, "Enter your email");
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.add(fields::PASSWORD, "Minimum of 6 characters");
        }

        match email {
            Some(email) if errors.is_empty() => Ok(LoginDraft {
                email,
                password: self.password.clone(),
            }),
            _ => Err(errors),
        }
    }
}

/// "Forgot password" form as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgotPasswordInput {
    pub email: String,
}

/// Validated reset-link request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForgotPasswordDraft {
    pub email: Email,
}

impl Validate for ForgotPasswordInput {
    type Output = ForgotPasswordDraft;

    fn validate(&self) -> Result<ForgotPasswordDraft, FieldErrors> {
        let mut errors = FieldErrors::new();
        match validate_email(&mut errors, &self.email, "Enter your email") {
            Some(email) => Ok(ForgotPasswordDraft { email }),
            None => Err(errors),
        }
    }
}

/// New-password form as typed.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResetPasswordInput {
    pub password: String,
    pub password_confirmation: String,
}

/// Validated new password.
#[derive(Clone, PartialEq, Eq)]
pub struct ResetPasswordDraft {
    pub password: String,
}

impl Validate for ResetPasswordInput {
    type Output = ResetPasswordDraft;

    fn validate(&self) -> Result<ResetPasswordDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.password.chars().count() < MIN_RESET_PASSWORD_LENGTH {
            errors.add(
                fields::PASSWORD,
                "Password must be at least 8 characters",
            );
        }
        if self.password_confirmation.chars().count() < MIN_RESET_PASSWORD_LENGTH {
            errors.add(
                fields::PASSWORD_CONFIRMATION,
                "Password confirmation is required",
            );
        }
        if errors.is_empty() && self.password != self.password_confirmation {
            errors.add(fields::PASSWORD_CONFIRMATION, "Passwords do not match");
        }

        if errors.is_empty() {
            Ok(ResetPasswordDraft {
                password: self.password.clone(),
            })
        } else {
            Err(errors)
        }
    }
}

macro_rules! redacted_debug {
    ($name:ident { $($field:ident),* } secret $secret:ident) => {
        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    $(.field(stringify!($field), &self.$field))*
                    .field(stringify!($secret), &"[REDACTED]")
                    .finish()
            }
        }
    };
}

redacted_debug!(LoginInput { email } secret password);
redacted_debug!(LoginDraft { email } secret password);
redacted_debug!(ResetPasswordInput { } secret password);
redacted_debug!(ResetPasswordDraft { } secret password);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_login_requires_email_and_password() {
        let errors = LoginInput::default().validate().unwrap_err();
        assert_eq!(errors.get("email"), Some("Enter your email"));
        assert_eq!(errors.get("password"), Some("Minimum of 6 characters"));
    }

    #[test]
    fn test_login_valid() {
        let input = LoginInput {
            email: " ana@x.com ".to_owned(),
            password: "abcdef".to_owned(),
        };
        let draft = input.validate().unwrap();
        assert_eq!(draft.email.as_str(), "ana@x.com");
    }

    #[test]
    fn test_forgot_password_email_shape() {
        let input = ForgotPasswordInput {
            email: "ana".to_owned(),
        };
        assert_eq!(
            input.validate().unwrap_err().get("email"),
            Some("Invalid email")
        );
    }

    #[test]
    fn test_reset_mismatch_on_confirmation_field() {
        let input = ResetPasswordInput {
            password: "abcdefgh".to_owned(),
            password_confirmation: "abcdefgi".to_owned(),
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get("passwordConfirmation"),
            Some("Passwords do not match")
        );
    }

    #[test]
    fn test_reset_short_password() {
        let input = ResetPasswordInput {
            password: "abc".to_owned(),
            password_confirmation: "abc".to_owned(),
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.contains("password"));
        assert_eq!(
            errors.get("passwordConfirmation"),
            Some("Password confirmation is required")
        );
    }

    #[test]
    fn test_login_debug_redacts_password() {
        let input = LoginInput {
            email: "ana@x.com".to_owned(),
            password: "hunter22".to_owned(),
        };
        assert!(!format!("{input:?}").contains("hunter22"));
    }
}
