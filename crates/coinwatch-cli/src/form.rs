//! Sign-up form checks run before credentials reach the controller.

use coinwatch_core::auth::is_valid_email;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("invalid email format")]
    InvalidEmail,
    #[error("password cannot be empty")]
    EmptyPassword,
    #[error("passwords do not match")]
    PasswordMismatch,
}

#[derive(Debug, Clone, Copy)]
pub struct SignupForm<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub confirm: &'a str,
}

impl SignupForm<'_> {
    pub fn validate(&self) -> Result<(), FormError> {
        if !is_valid_email(self.email) {
            return Err(FormError::InvalidEmail);
        }
        if self.password.is_empty() {
            return Err(FormError::EmptyPassword);
        }
        if self.password != self.confirm {
            return Err(FormError::PasswordMismatch);
        }
        Ok(())
    }
}
