//! Progress and outcome reporting for a login attempt.
//!
//! The orchestrator is the only writer; implementations decide how to show
//! phases and failures (terminal output here, toasts in a GUI host).

use crate::auth::AuthError;

/// The two user-visible phases of an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Submitting the username/password form.
    Account,
    /// Answering the matrix challenge.
    Challenge,
}

/// Sink for login progress and outcomes.
pub trait Reporter: Send + Sync {
    fn notify_phase(&self, phase: Phase);

    fn notify_success(&self, redirect: &str);

    fn notify_failure(&self, error: &AuthError);

    /// Invoked after `notify_failure` for failures a user can fix by editing
    /// the stored account/matrix. Never invoked for server-side failures.
    fn offer_settings(&self);
}

/// Terminal reporter for the CLI.
pub struct CliReporter;

impl Reporter for CliReporter {
    fn notify_phase(&self, phase: Phase) {
        match phase {
            Phase::Account => println!("Authenticating account..."),
            Phase::Challenge => {
                println!("Account accepted.");
                println!("Answering matrix challenge...");
            }
        }
    }

    fn notify_success(&self, redirect: &str) {
        println!("Login succeeded.");
        println!("Continue at: {redirect}");
    }

    fn notify_failure(&self, error: &AuthError) {
        eprintln!("Login failed ({}): {error}", error.kind_name());
    }

    fn offer_settings(&self) {
        eprintln!("Run `gridlogin configure` to update the stored account and matrix.");
    }
}

/// Reporter that discards everything, for tests and embedding.
pub struct NullReporter;

impl Reporter for NullReporter {
    fn notify_phase(&self, _phase: Phase) {}
    fn notify_success(&self, _redirect: &str) {}
    fn notify_failure(&self, _error: &AuthError) {}
    fn offer_settings(&self) {}
}
