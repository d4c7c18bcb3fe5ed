use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::identity::{AuthError, IdentityService};
use crate::observable::{StateChannel, Transitions};
use crate::AuthSession;

/// Commands accepted by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthCommand {
    SignIn,
    SignUp,
    SignOut,
}

impl AuthCommand {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SignIn => "sign_in",
            Self::SignUp => "sign_up",
            Self::SignOut => "sign_out",
        }
    }

    /// Whether the command may start from `session`.
    pub fn accepts(self, session: &AuthSession) -> bool {
        match self {
            Self::SignIn | Self::SignUp => matches!(
                session,
                AuthSession::Unauthenticated | AuthSession::Error { .. }
            ),
            Self::SignOut => matches!(session, AuthSession::Authenticated { .. }),
        }
    }
}

impl Display for AuthCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command refused before reaching the identity service.
///
/// Identity failures are never returned this way; they become
/// [`AuthSession::Error`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthCommandError {
    #[error("cannot {command} while {state}")]
    InvalidState {
        command: AuthCommand,
        state: &'static str,
    },
}

/// Single source of truth for the signed-in user.
///
/// Cloning yields another handle to the same controller.
#[derive(Clone)]
pub struct AuthSessionController {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    identity: Arc<dyn IdentityService>,
    state: StateChannel<AuthSession>,
    // Serializes the check-then-enter-Loading step of each command.
    admission: Mutex<()>,
}

impl AuthSessionController {
    /// Build the controller, resuming any session the identity service holds.
    pub async fn restore(identity: Arc<dyn IdentityService>) -> Self {
        let initial = match identity.current_session().await {
            Ok(Some(user_id)) => {
                info!(%user_id, "restored existing session");
                AuthSession::Authenticated { user_id }
            }
            Ok(None) => AuthSession::Unauthenticated,
            Err(error) => {
                warn!(code = error.code(), %error, "session lookup failed; starting signed out");
                AuthSession::Unauthenticated
            }
        };

        Self {
            inner: Arc::new(ControllerInner {
                identity,
                state: StateChannel::new(initial),
                admission: Mutex::new(()),
            }),
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthCommandError> {
        self.enter(AuthCommand::SignIn)?;
        let (email, password) = (email.to_owned(), password.to_owned());
        let inner = Arc::clone(&self.inner);
        let call = async move {
            let user_id = inner.identity.sign_in(&email, &password).await?;
            Ok::<_, AuthError>(AuthSession::Authenticated { user_id })
        };
        self.settle(AuthCommand::SignIn, call).await;
        Ok(())
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<(), AuthCommandError> {
        self.enter(AuthCommand::SignUp)?;
        let (email, password) = (email.to_owned(), password.to_owned());
        let inner = Arc::clone(&self.inner);
        let call = async move {
            let user_id = inner.identity.sign_up(&email, &password).await?;
            Ok::<_, AuthError>(AuthSession::Authenticated { user_id })
        };
        self.settle(AuthCommand::SignUp, call).await;
        Ok(())
    }

    pub async fn sign_out(&self) -> Result<(), AuthCommandError> {
        self.enter(AuthCommand::SignOut)?;
        let inner = Arc::clone(&self.inner);
        let call = async move {
            inner.identity.sign_out().await?;
            Ok::<_, AuthError>(AuthSession::Unauthenticated)
        };
        self.settle(AuthCommand::SignOut, call).await;
        Ok(())
    }

    /// Current session.
    pub fn session(&self) -> AuthSession {
        self.inner.state.current()
    }

    /// Receiver that always holds the latest session.
    pub fn observe(&self) -> watch::Receiver<AuthSession> {
        self.inner.state.watch()
    }

    /// Current session plus every transition after it, in order.
    pub fn transitions(&self) -> (AuthSession, Transitions<AuthSession>) {
        self.inner.state.transitions()
    }

    fn enter(&self, command: AuthCommand) -> Result<(), AuthCommandError> {
        let _admission = self.lock_admission();
        let current = self.inner.state.current();
        if !command.accepts(&current) {
            debug!(%command, state = current.as_str(), "command rejected");
            return Err(AuthCommandError::InvalidState {
                command,
                state: current.as_str(),
            });
        }
        debug!(%command, from = current.as_str(), "command admitted");
        self.inner.state.replace(AuthSession::Loading);
        Ok(())
    }

    /// Run the identity call on its own task and publish the state it ends in.
    ///
    /// The outcome is applied by a detached task, so the session leaves
    /// `Loading` even when the caller stops waiting or the service panics.
    async fn settle<F>(&self, command: AuthCommand, call: F)
    where
        F: Future<Output = Result<AuthSession, AuthError>> + Send + 'static,
    {
        let call = tokio::spawn(call);
        let inner = Arc::clone(&self.inner);
        let applier = tokio::spawn(async move {
            let outcome = match call.await {
                Ok(outcome) => outcome,
                Err(error) => Err(AuthError::internal(format!("unexpected failure: {error}"))),
            };
            let next = match outcome {
                Ok(session) => {
                    info!(%command, %session, "command settled");
                    session
                }
                Err(error) => {
                    warn!(%command, code = error.code(), %error, "command failed");
                    AuthSession::Error {
                        message: error.to_string(),
                    }
                }
            };
            inner.state.replace(next);
        });

        if let Err(error) = applier.await {
            warn!(%command, %error, "session update task ended abnormally");
        }
    }

    fn lock_admission(&self) -> MutexGuard<'_, ()> {
        self.inner
            .admission
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
