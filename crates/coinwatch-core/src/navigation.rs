//! Navigation as a pure function of the session.
//!
//! The core never drives a UI. Presentation code feeds each observed
//! [`AuthSession`] through a [`NavigationGuard`] and navigates when it gets a
//! route back.

use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::AuthSession;

/// Screens the session can force the user onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Login,
    Home,
}

impl Route {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Home => "home",
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a session belongs. `None` means stay on the current screen.
pub fn route_for(session: &AuthSession) -> Option<Route> {
    match session {
        AuthSession::Unauthenticated => Some(Route::Login),
        AuthSession::Authenticated { .. } => Some(Route::Home),
        AuthSession::Loading | AuthSession::Error { .. } => None,
    }
}

/// Turns a stream of sessions into redirects, emitting each target once.
#[derive(Debug, Clone, Default)]
pub struct NavigationGuard {
    current: Option<Route>,
}

impl NavigationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Guard that considers the user already on `route`.
    pub fn starting_at(route: Route) -> Self {
        Self {
            current: Some(route),
        }
    }

    pub fn current(&self) -> Option<Route> {
        self.current
    }

    /// Redirect to perform for `session`, if it differs from where we are.
    pub fn observe(&mut self, session: &AuthSession) -> Option<Route> {
        let target = route_for(session)?;
        if self.current == Some(target) {
            return None;
        }
        self.current = Some(target);
        Some(target)
    }
}
