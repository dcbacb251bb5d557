//! Pure state machine for one login attempt.
//!
//! The transition function knows nothing about HTTP or storage; the
//! orchestrator performs the effect for the current state and feeds the
//! resulting event back in. Terminal states absorb every further event.

/// States of one login attempt. `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Idle,
    /// Reading the stored account and matrix; no network traffic yet.
    LoadingConfig,
    /// Fetching the login form and POSTing credentials.
    SubmittingAccount,
    /// Deciding between the method-selection page and the direct challenge.
    ClassifyingChallenge,
    /// POSTing the forced-select form that picks grid authentication.
    SubmittingOtpSelection,
    /// Resolving coordinates and POSTing the answers.
    SubmittingOtpAnswer {
        /// Set when the selection page was traversed; the final POST then
        /// also carries the "no other option chosen" marker field.
        via_selection: bool,
    },
    Completed,
    Failed(FailureKind),
}

impl AuthState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed(_))
    }
}

/// Failure categories, mirroring [`AuthError`](super::AuthError) without
/// carrying sources so states stay `Copy` and comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    AccountNotSet,
    MatrixNotSet,
    LoadFailure,
    InvalidStatusCode,
    ChallengeUnavailable,
    Unexpected,
}

/// Events produced by the effect executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    Start,
    ConfigLoaded,
    AccountSubmitted,
    SelectionPageDetected,
    DirectChallengeDetected,
    SelectionSubmitted,
    AnswerAccepted,
    Failed(FailureKind),
}

/// Advance the attempt by one event.
///
/// A failure event moves any in-flight state to `Failed`; an event that does
/// not belong to the current state is itself an unexpected failure.
pub fn transition(state: AuthState, event: AuthEvent) -> AuthState {
    if state.is_terminal() {
        return state;
    }
    match (state, event) {
        (_, AuthEvent::Failed(kind)) => AuthState::Failed(kind),
        (AuthState::Idle, AuthEvent::Start) => AuthState::LoadingConfig,
        (AuthState::LoadingConfig, AuthEvent::ConfigLoaded) => AuthState::SubmittingAccount,
        (AuthState::SubmittingAccount, AuthEvent::AccountSubmitted) => {
            AuthState::ClassifyingChallenge
        }
        (AuthState::ClassifyingChallenge, AuthEvent::SelectionPageDetected) => {
            AuthState::SubmittingOtpSelection
        }
        (AuthState::ClassifyingChallenge, AuthEvent::DirectChallengeDetected) => {
            AuthState::SubmittingOtpAnswer {
                via_selection: false,
            }
        }
        (AuthState::SubmittingOtpSelection, AuthEvent::SelectionSubmitted) => {
            AuthState::SubmittingOtpAnswer {
                via_selection: true,
            }
        }
        (AuthState::SubmittingOtpAnswer { .. }, AuthEvent::AnswerAccepted) => AuthState::Completed,
        _ => AuthState::Failed(FailureKind::Unexpected),
    }
}
