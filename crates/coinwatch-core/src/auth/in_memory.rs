use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use super::identity::{AuthError, IdentityFuture, IdentityService};

/// Shortest password accepted on sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
struct Account {
    user_id: String,
    password: String,
}

#[derive(Debug, Default)]
struct Directory {
    accounts: HashMap<String, Account>,
    current: Option<String>,
}

/// Process-local identity service.
///
/// Accounts live for the lifetime of the value. Emails are matched
/// case-insensitively; user ids are `uid-<n>` in creation order.
#[derive(Debug, Default)]
pub struct InMemoryIdentityService {
    directory: Mutex<Directory>,
    next_id: AtomicU64,
}

impl InMemoryIdentityService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account without signing it in.
    pub fn with_account(self, email: &str, password: &str) -> Result<Self, AuthError> {
        self.register(email, password)?;
        Ok(self)
    }

    pub fn account_count(&self) -> usize {
        self.lock().accounts.len()
    }

    fn register(&self, email: &str, password: &str) -> Result<String, AuthError> {
        validate_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::weak_password(MIN_PASSWORD_LEN));
        }

        let mut directory = self.lock();
        let key = email.trim().to_ascii_lowercase();
        if directory.accounts.contains_key(&key) {
            return Err(AuthError::account_exists());
        }

        let user_id = format!("uid-{}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        directory.accounts.insert(
            key,
            Account {
                user_id: user_id.clone(),
                password: password.to_owned(),
            },
        );
        debug!(%user_id, "account registered");
        Ok(user_id)
    }

    fn lock(&self) -> MutexGuard<'_, Directory> {
        self.directory.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl IdentityService for InMemoryIdentityService {
    fn sign_in<'a>(&'a self, email: &'a str, password: &'a str) -> IdentityFuture<'a, String> {
        Box::pin(async move {
            validate_email(email)?;
            let mut directory = self.lock();
            let key = email.trim().to_ascii_lowercase();
            let user_id = match directory.accounts.get(&key) {
                Some(account) if account.password == password => account.user_id.clone(),
                _ => return Err(AuthError::invalid_credentials()),
            };
            directory.current = Some(user_id.clone());
            Ok(user_id)
        })
    }

    fn sign_up<'a>(&'a self, email: &'a str, password: &'a str) -> IdentityFuture<'a, String> {
        Box::pin(async move {
            let user_id = self.register(email, password)?;
            self.lock().current = Some(user_id.clone());
            Ok(user_id)
        })
    }

    fn sign_out(&self) -> IdentityFuture<'_, ()> {
        Box::pin(async move {
            self.lock().current = None;
            Ok(())
        })
    }

    fn current_session(&self) -> IdentityFuture<'_, Option<String>> {
        Box::pin(async move { Ok(self.lock().current.clone()) })
    }
}

/// Loose shape check: `local@domain.tld`, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

fn validate_email(email: &str) -> Result<(), AuthError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(AuthError::invalid_email(email))
    }
}
