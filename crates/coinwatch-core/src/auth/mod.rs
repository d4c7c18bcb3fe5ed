//! Authentication session state machine and the identity-service seam.
//!
//! | from | command | success | failure |
//! |------|---------|---------|---------|
//! | Unauthenticated / Error | `sign_in` | Authenticated | Error |
//! | Unauthenticated / Error | `sign_up` | Authenticated | Error |
//! | Authenticated | `sign_out` | Unauthenticated | Error |
//!
//! Each command passes through `Loading`. Commands issued from any other state
//! are rejected with [`AuthCommandError`] and leave the session untouched.

mod controller;
mod identity;
mod in_memory;

pub use controller::{AuthCommand, AuthCommandError, AuthSessionController};
pub use identity::{AuthError, AuthErrorKind, IdentityFuture, IdentityService};
pub use in_memory::{is_valid_email, InMemoryIdentityService, MIN_PASSWORD_LEN};
