//! Error taxonomy for the login flow.

use reqwest::StatusCode;
use thiserror::Error;

use super::machine::FailureKind;

/// Terminal failure of one login attempt. Nothing is retried.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The stored account is missing or has an empty id/password.
    #[error("account id or password is not configured")]
    AccountNotSet,

    /// The stored matrix is absent or not 10 columns of 7 single-character cells.
    #[error("answer matrix is not configured or has the wrong shape")]
    MatrixNotSet,

    /// The store itself failed to read.
    #[error("failed to load stored configuration")]
    LoadFailure(#[source] anyhow::Error),

    /// A login step returned a non-success HTTP status.
    #[error("portal returned status {0}")]
    InvalidStatusCode(StatusCode),

    /// The portal's method-selection page does not offer grid authentication.
    /// Not fixable by editing stored settings.
    #[error("the portal did not offer the grid authentication option")]
    ChallengeUnavailable,

    /// Any other failure inside the flow (transport error, non-conforming page).
    #[error("login flow failed unexpectedly")]
    Unexpected(#[source] anyhow::Error),
}

impl AuthError {
    /// Whether editing the stored account/matrix could plausibly fix this.
    ///
    /// Everything except `ChallengeUnavailable` is attributable to stored
    /// configuration; a server that stopped offering the grid method cannot
    /// be fixed client-side.
    pub fn settings_fixable(&self) -> bool {
        !matches!(self, Self::ChallengeUnavailable)
    }

    /// Stable category name, used in log and reporter output.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::AccountNotSet => "ACCOUNT_NOT_SET",
            Self::MatrixNotSet => "MATRIX_NOT_SET",
            Self::LoadFailure(_) => "LOAD_FAILURE",
            Self::InvalidStatusCode(_) => "INVALID_STATUS_CODE",
            Self::ChallengeUnavailable => "CHALLENGE_UNAVAILABLE",
            Self::Unexpected(_) => "UNEXPECTED_FAILURE",
        }
    }

    /// The state-machine failure kind corresponding to this error.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::AccountNotSet => FailureKind::AccountNotSet,
            Self::MatrixNotSet => FailureKind::MatrixNotSet,
            Self::LoadFailure(_) => FailureKind::LoadFailure,
            Self::InvalidStatusCode(_) => FailureKind::InvalidStatusCode,
            Self::ChallengeUnavailable => FailureKind::ChallengeUnavailable,
            Self::Unexpected(_) => FailureKind::Unexpected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_challenge_unavailable_suppresses_settings() {
        assert!(AuthError::AccountNotSet.settings_fixable());
        assert!(AuthError::MatrixNotSet.settings_fixable());
        assert!(AuthError::LoadFailure(anyhow::anyhow!("x")).settings_fixable());
        assert!(AuthError::InvalidStatusCode(StatusCode::FORBIDDEN).settings_fixable());
        assert!(AuthError::Unexpected(anyhow::anyhow!("x")).settings_fixable());
        assert!(!AuthError::ChallengeUnavailable.settings_fixable());
    }
}
