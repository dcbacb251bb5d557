//! The portal login flow: state machine, HTML helpers, and orchestration.

mod challenge;
mod client;
mod error;
mod form;
mod machine;
mod orchestrator;
mod otp;

pub use challenge::{classify, strip_scripts, ChallengeBranch, GRID_AUTH_OPTION};
pub use client::{PageResponse, PortalClient};
pub use error::AuthError;
pub use form::{extract_inputs, FormFields};
pub use machine::{transition, AuthEvent, AuthState, FailureKind};
pub use orchestrator::{LoginOrchestrator, LoginOutcome};
pub use otp::resolve_answers;
