use std::sync::Arc;

use coinwatch_core::{
    AuthSession, AuthSessionController, InMemoryIdentityService, NavigationGuard, Route,
    Transitions,
};
use serde::Serialize;

use crate::cli::SessionArgs;
use crate::error::CliError;
use crate::form::SignupForm;

use super::CommandResult;

/// Account seeded by `--mock`.
pub const DEMO_EMAIL: &str = "demo@coinwatch.dev";
pub const DEMO_PASSWORD: &str = "demo-password";

const HEADER: [&str; 3] = ["STEP", "SESSION", "NAVIGATE"];

#[derive(Debug, Serialize)]
struct SessionEvent {
    session: AuthSession,
    redirect: Option<Route>,
}

#[derive(Debug, Serialize)]
struct SessionResponseData {
    events: Vec<SessionEvent>,
    final_session: AuthSession,
}

/// Records every observed session together with the redirect it triggers.
struct Recorder {
    guard: NavigationGuard,
    events: Vec<SessionEvent>,
}

impl Recorder {
    fn new(initial: AuthSession) -> Self {
        let mut recorder = Self {
            guard: NavigationGuard::new(),
            events: Vec::new(),
        };
        recorder.record(initial);
        recorder
    }

    fn record(&mut self, session: AuthSession) {
        let redirect = self.guard.observe(&session);
        self.events.push(SessionEvent { session, redirect });
    }

    fn drain(&mut self, transitions: &mut Transitions<AuthSession>) {
        for session in transitions.drain() {
            self.record(session);
        }
    }
}

pub async fn run(args: &SessionArgs, mock: bool) -> Result<CommandResult, CliError> {
    if args.sign_up {
        SignupForm {
            email: &args.email,
            password: &args.password,
            confirm: args.confirm.as_deref().unwrap_or_default(),
        }
        .validate()?;
    }

    let identity = if mock {
        InMemoryIdentityService::new().with_account(DEMO_EMAIL, DEMO_PASSWORD)?
    } else {
        InMemoryIdentityService::new()
    };
    let controller = AuthSessionController::restore(Arc::new(identity)).await;
    let (initial, mut transitions) = controller.transitions();
    let mut recorder = Recorder::new(initial);

    if args.sign_up {
        controller.sign_up(&args.email, &args.password).await?;
    } else {
        controller.sign_in(&args.email, &args.password).await?;
    }
    recorder.drain(&mut transitions);

    if args.sign_out && controller.session().user_id().is_some() {
        controller.sign_out().await?;
        recorder.drain(&mut transitions);
    }

    let final_session = controller.session();
    let rows = recorder
        .events
        .iter()
        .enumerate()
        .map(|(index, event)| {
            vec![
                index.to_string(),
                event.session.to_string(),
                event
                    .redirect
                    .map(|route| format!("-> {route}"))
                    .unwrap_or_default(),
            ]
        })
        .collect();

    let data = serde_json::to_value(SessionResponseData {
        events: recorder.events,
        final_session: final_session.clone(),
    })?;

    let mut result = CommandResult::new(data, HEADER.to_vec()).with_rows(rows);
    if let Some(message) = final_session.error_message() {
        result = result.with_error(message);
    }
    Ok(result)
}
