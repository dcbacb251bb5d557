//! Effect executor driving the login state machine.
//!
//! `run()` loops the pure transition function: perform the effect for the
//! current state (store reads, one HTTP step, or a pure classification),
//! feed the resulting event back in, report phase changes, stop on a
//! terminal state. Each `run()` owns its transient working state; nothing
//! survives the attempt.

use std::sync::Arc;

use anyhow::anyhow;
use reqwest::Url;
use scraper::Html;
use secrecy::ExposeSecret;

use crate::models::{Account, Matrix};
use crate::report::{Phase, Reporter};
use crate::storage::{AccountStore, MatrixStore};

use super::challenge::{classify, ChallengeBranch};
use super::client::PortalClient;
use super::error::AuthError;
use super::form::{extract_inputs, FormFields};
use super::machine::{transition, AuthEvent, AuthState, FailureKind};
use super::otp::resolve_answers;

const USERNAME_FIELD: &str = "usr_name";
const PASSWORD_FIELD: &str = "usr_password";

/// Sent with the final POST on the selection path to signal that no other
/// challenge option was chosen.
const MARKER_FIELD: &str = "message6";
const MARKER_VALUE: &str = "NoOtherIGAuthOption";

/// Drives one full login attempt against the portal.
pub struct LoginOrchestrator {
    accounts: Arc<dyn AccountStore>,
    matrices: Arc<dyn MatrixStore>,
    client: PortalClient,
    reporter: Arc<dyn Reporter>,
}

/// Successful outcome: where the user should be taken next.
#[derive(Debug)]
pub struct LoginOutcome {
    pub redirect: String,
}

/// Working state of one attempt, discarded when `run()` returns.
#[derive(Default)]
struct Attempt {
    account: Option<Account>,
    matrix: Option<Matrix>,
    /// Body of the most recent response; after classification (and the
    /// selection POST, when taken) this is the challenge page.
    page_html: Option<String>,
    /// Forced-select form built by the classifier on the selection path.
    selection_form: Option<FormFields>,
    /// URL the most recent response was served from.
    current_url: Option<Url>,
    error: Option<AuthError>,
}

impl LoginOrchestrator {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        matrices: Arc<dyn MatrixStore>,
        client: PortalClient,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            accounts,
            matrices,
            client,
            reporter,
        }
    }

    /// Run one login attempt to a terminal state.
    pub async fn run(&self) -> Result<LoginOutcome, AuthError> {
        let mut attempt = Attempt::default();
        let mut state = transition(AuthState::Idle, AuthEvent::Start);

        while !state.is_terminal() {
            let event = self.perform(state, &mut attempt).await;
            let next = transition(state, event);
            tracing::debug!(?state, ?event, ?next, "login state transition");
            self.report_transition(state, next);
            state = next;
        }

        match state {
            AuthState::Failed(kind) => {
                let error = attempt.error.take().unwrap_or_else(|| fallback_error(kind));
                self.reporter.notify_failure(&error);
                if error.settings_fixable() {
                    self.reporter.offer_settings();
                }
                Err(error)
            }
            _ => {
                let redirect = resolve_redirect(
                    attempt.current_url.as_ref(),
                    self.client.resource_list_url(),
                );
                self.reporter.notify_success(&redirect);
                Ok(LoginOutcome { redirect })
            }
        }
    }

    /// Perform the effect for one in-flight state, translating failures into
    /// failure events while stashing the full error for the terminal report.
    async fn perform(&self, state: AuthState, attempt: &mut Attempt) -> AuthEvent {
        let result = match state {
            AuthState::LoadingConfig => self.load_config(attempt).await,
            AuthState::SubmittingAccount => self.submit_account(attempt).await,
            AuthState::ClassifyingChallenge => self.classify_challenge(attempt),
            AuthState::SubmittingOtpSelection => self.submit_selection(attempt).await,
            AuthState::SubmittingOtpAnswer { via_selection } => {
                self.submit_answers(attempt, via_selection).await
            }
            AuthState::Idle | AuthState::Completed | AuthState::Failed(_) => {
                Err(AuthError::Unexpected(anyhow!(
                    "no effect defined for state {state:?}"
                )))
            }
        };

        match result {
            Ok(event) => event,
            Err(error) => {
                let kind = error.failure_kind();
                attempt.error = Some(error);
                AuthEvent::Failed(kind)
            }
        }
    }

    /// Read account and matrix jointly; no network traffic happens before
    /// both have validated.
    async fn load_config(&self, attempt: &mut Attempt) -> Result<AuthEvent, AuthError> {
        let (account, matrix) = tokio::try_join!(self.accounts.get(), self.matrices.get())
            .map_err(AuthError::LoadFailure)?;

        let account = match account {
            Some(account) if account.is_complete() => account,
            _ => return Err(AuthError::AccountNotSet),
        };
        let matrix = match matrix {
            Some(matrix) if matrix.is_complete() => matrix,
            _ => return Err(AuthError::MatrixNotSet),
        };

        attempt.account = Some(account);
        attempt.matrix = Some(matrix);
        Ok(AuthEvent::ConfigLoaded)
    }

    async fn submit_account(&self, attempt: &mut Attempt) -> Result<AuthEvent, AuthError> {
        let body = self.client.fetch_login_form().await?;

        let account = attempt
            .account
            .as_ref()
            .ok_or_else(|| AuthError::Unexpected(anyhow!("account not loaded")))?;

        let mut fields = extract_inputs(&Html::parse_document(&body));
        fields.insert(USERNAME_FIELD, account.id.clone());
        fields.insert(PASSWORD_FIELD, account.password.expose_secret());

        let response = self.client.submit_login_form(&fields).await?;
        attempt.page_html = Some(response.body);
        attempt.current_url = Some(response.url);
        Ok(AuthEvent::AccountSubmitted)
    }

    fn classify_challenge(&self, attempt: &mut Attempt) -> Result<AuthEvent, AuthError> {
        let body = attempt
            .page_html
            .as_ref()
            .ok_or_else(|| AuthError::Unexpected(anyhow!("no page to classify")))?;

        match classify(body)? {
            ChallengeBranch::SelectMethod(fields) => {
                attempt.selection_form = Some(fields);
                Ok(AuthEvent::SelectionPageDetected)
            }
            ChallengeBranch::Direct => Ok(AuthEvent::DirectChallengeDetected),
        }
    }

    async fn submit_selection(&self, attempt: &mut Attempt) -> Result<AuthEvent, AuthError> {
        let fields = attempt
            .selection_form
            .take()
            .ok_or_else(|| AuthError::Unexpected(anyhow!("selection form not built")))?;

        let response = self.client.submit_login_form(&fields).await?;
        attempt.page_html = Some(response.body);
        attempt.current_url = Some(response.url);
        Ok(AuthEvent::SelectionSubmitted)
    }

    async fn submit_answers(
        &self,
        attempt: &mut Attempt,
        via_selection: bool,
    ) -> Result<AuthEvent, AuthError> {
        let body = attempt
            .page_html
            .as_ref()
            .ok_or_else(|| AuthError::Unexpected(anyhow!("no challenge page")))?;
        let matrix = attempt
            .matrix
            .as_ref()
            .ok_or_else(|| AuthError::Unexpected(anyhow!("matrix not loaded")))?;

        let mut fields = extract_inputs(&Html::parse_document(body));
        for (name, value) in resolve_answers(body, matrix).map_err(AuthError::Unexpected)? {
            fields.insert(name, value);
        }
        if via_selection {
            fields.insert(MARKER_FIELD, MARKER_VALUE);
        }

        let response = self.client.submit_login_form(&fields).await?;
        attempt.current_url = Some(response.url);
        Ok(AuthEvent::AnswerAccepted)
    }

    fn report_transition(&self, previous: AuthState, next: AuthState) {
        match (previous, next) {
            (AuthState::LoadingConfig, AuthState::SubmittingAccount) => {
                self.reporter.notify_phase(Phase::Account);
            }
            (AuthState::ClassifyingChallenge, AuthState::SubmittingOtpSelection)
            | (AuthState::ClassifyingChallenge, AuthState::SubmittingOtpAnswer { .. }) => {
                self.reporter.notify_phase(Phase::Challenge);
            }
            _ => {}
        }
    }
}

/// Where to send the user after a completed login: the `URI` query parameter
/// of the final URL, then `GAURI`, then the portal's resource list.
fn resolve_redirect(current_url: Option<&Url>, resource_list: &Url) -> String {
    if let Some(url) = current_url {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        for key in ["URI", "GAURI"] {
            if let Some((_, value)) = pairs.iter().find(|(k, _)| k == key) {
                return value.clone();
            }
        }
    }
    resource_list.to_string()
}

/// Stand-in error when a failure state was reached without a stashed error
/// (only possible through an out-of-order transition).
fn fallback_error(kind: FailureKind) -> AuthError {
    match kind {
        FailureKind::AccountNotSet => AuthError::AccountNotSet,
        FailureKind::MatrixNotSet => AuthError::MatrixNotSet,
        FailureKind::LoadFailure => AuthError::LoadFailure(anyhow!("store read failed")),
        FailureKind::InvalidStatusCode => {
            AuthError::Unexpected(anyhow!("non-success status without recorded code"))
        }
        FailureKind::ChallengeUnavailable => AuthError::ChallengeUnavailable,
        FailureKind::Unexpected => AuthError::Unexpected(anyhow!("login attempt failed")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        s.parse().expect("test URL")
    }

    #[test]
    fn redirect_prefers_uri_parameter() {
        let current = url("https://portal.example/GetAccess/Login?URI=https://example/resource&GAURI=https://other");
        let fallback = url("https://portal.example/GetAccess/ResourceList");
        assert_eq!(
            resolve_redirect(Some(&current), &fallback),
            "https://example/resource"
        );
    }

    #[test]
    fn redirect_falls_back_to_gauri() {
        let current = url("https://portal.example/GetAccess/Login?GAURI=https://other");
        let fallback = url("https://portal.example/GetAccess/ResourceList");
        assert_eq!(resolve_redirect(Some(&current), &fallback), "https://other");
    }

    #[test]
    fn redirect_defaults_to_resource_list() {
        let current = url("https://portal.example/GetAccess/Login?other=1");
        let fallback = url("https://portal.example/GetAccess/ResourceList");
        assert_eq!(
            resolve_redirect(Some(&current), &fallback),
            "https://portal.example/GetAccess/ResourceList"
        );
        assert_eq!(
            resolve_redirect(None, &fallback),
            "https://portal.example/GetAccess/ResourceList"
        );
    }
}
