use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Current authentication status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AuthSession {
    #[default]
    Unauthenticated,
    Loading,
    Authenticated { user_id: String },
    Error { message: String },
}

impl AuthSession {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Loading => "loading",
            Self::Authenticated { .. } => "authenticated",
            Self::Error { .. } => "error",
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::Authenticated { user_id } => Some(user_id),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { message } => Some(message),
            _ => None,
        }
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

impl Display for AuthSession {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Authenticated { user_id } => write!(f, "authenticated({user_id})"),
            Self::Error { message } => write!(f, "error({message})"),
            other => f.write_str(other.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_session_is_unauthenticated() {
        assert_eq!(AuthSession::default(), AuthSession::Unauthenticated);
    }

    #[test]
    fn serializes_with_state_tag() {
        let session = AuthSession::Authenticated {
            user_id: String::from("uid-1"),
        };
        let json = serde_json::to_value(&session).expect("encodes");

        assert_eq!(json["state"], "authenticated");
        assert_eq!(json["user_id"], "uid-1");
    }
}
