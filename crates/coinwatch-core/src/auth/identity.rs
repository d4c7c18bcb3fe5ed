use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by identity-service calls.
pub type IdentityFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, AuthError>> + Send + 'a>>;

/// External system of record for credentials and sessions.
///
/// The controller forwards raw credentials and reports whatever comes back;
/// validation and transport belong to the implementation.
pub trait IdentityService: Send + Sync {
    fn sign_in<'a>(&'a self, email: &'a str, password: &'a str) -> IdentityFuture<'a, String>;

    fn sign_up<'a>(&'a self, email: &'a str, password: &'a str) -> IdentityFuture<'a, String>;

    fn sign_out(&self) -> IdentityFuture<'_, ()>;

    /// User id of the session already held by the service, if any.
    fn current_session(&self) -> IdentityFuture<'_, Option<String>>;
}

/// Identity-service failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    InvalidCredentials,
    InvalidEmail,
    WeakPassword,
    AccountExists,
    Unavailable,
    Internal,
}

/// Failure reported by an identity service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthError {
    kind: AuthErrorKind,
    message: String,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_credentials() -> Self {
        Self::new(
            AuthErrorKind::InvalidCredentials,
            "the supplied email or password is incorrect",
        )
    }

    pub fn invalid_email(email: &str) -> Self {
        Self::new(
            AuthErrorKind::InvalidEmail,
            format!("the email address '{email}' is badly formatted"),
        )
    }

    pub fn weak_password(min_len: usize) -> Self {
        Self::new(
            AuthErrorKind::WeakPassword,
            format!("password should be at least {min_len} characters"),
        )
    }

    pub fn account_exists() -> Self {
        Self::new(
            AuthErrorKind::AccountExists,
            "the email address is already in use by another account",
        )
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::Unavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::Internal, message)
    }

    pub const fn kind(&self) -> AuthErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            AuthErrorKind::InvalidCredentials => "auth.invalid_credentials",
            AuthErrorKind::InvalidEmail => "auth.invalid_email",
            AuthErrorKind::WeakPassword => "auth.weak_password",
            AuthErrorKind::AccountExists => "auth.account_exists",
            AuthErrorKind::Unavailable => "auth.unavailable",
            AuthErrorKind::Internal => "auth.internal",
        }
    }
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for AuthError {}
