#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use gridlogin::auth::{AuthError, LoginOrchestrator, PortalClient};
use gridlogin::models::{Account, Matrix, MATRIX_COLUMNS, MATRIX_ROWS};
use gridlogin::report::{Phase, Reporter};
use gridlogin::storage::MemoryStore;

pub const LOGIN_PATH: &str = "/GetAccess/Login";

/// The username/password form as the portal renders it.
pub const LOGIN_FORM_HTML: &str = r#"<html><head><title>Portal</title></head><body>
<form method="POST" action="/GetAccess/Login">
<input type="hidden" name="SMAGENTNAME" value="agent">
<input type="hidden" name="target" value="portal-target">
<input type="text" name="usr_name">
<input type="password" name="usr_password">
</form></body></html>"#;

/// The matrix challenge page, asking for cells C4, E1 and G7.
pub const CHALLENGE_HTML: &str = r#"<html><body>
<p>Enter the matrix characters at [C,4] [E,1] [G,7]</p>
<form method="POST" action="/GetAccess/Login">
<input type="hidden" name="SMAGENTNAME" value="agent">
<input type="hidden" name="AUTHMETHOD" value="IG">
</form></body></html>"#;

/// The OTP method-selection page. The grid option sits in `m1`; `m2` and
/// `m3` have no grid option and keep their defaults.
pub const SELECTION_HTML: &str = r#"<html><body>
<p>Select Label for OTP</p>
<form method="POST" action="/GetAccess/Login">
<input type="hidden" name="SMAGENTNAME" value="agent">
<select name="m1"><option value="PasswordOption">Password<option value="GridAuthOption">Grid<option value="TokenOption">Token</select>
<select name="m2"><option value="OptA">A<option value="OptB">B</select>
<select name="m3"><option value="OptC">C</select>
</form></body></html>"#;

pub fn test_account() -> Account {
    Account::new("u1", "p1")
}

/// Matrix with known values at the cells the fixture challenge asks for:
/// C4 -> "K", E1 -> "M", G7 -> "Z".
pub fn test_matrix() -> Matrix {
    let mut cells: Vec<Vec<String>> = (0..MATRIX_COLUMNS)
        .map(|_| (0..MATRIX_ROWS).map(|_| "x".to_string()).collect())
        .collect();
    cells[2][3] = "K".to_string();
    cells[4][0] = "M".to_string();
    cells[6][6] = "Z".to_string();
    Matrix::new(cells)
}

/// Reporter that records everything it is told, for asserting on the
/// progress/outcome surface.
#[derive(Default)]
pub struct RecordingReporter {
    pub phases: Mutex<Vec<Phase>>,
    pub success: Mutex<Option<String>>,
    pub failures: Mutex<Vec<String>>,
    pub settings_offered: Mutex<bool>,
}

impl Reporter for RecordingReporter {
    fn notify_phase(&self, phase: Phase) {
        self.phases.lock().expect("phases lock").push(phase);
    }

    fn notify_success(&self, redirect: &str) {
        *self.success.lock().expect("success lock") = Some(redirect.to_string());
    }

    fn notify_failure(&self, error: &AuthError) {
        self.failures
            .lock()
            .expect("failures lock")
            .push(error.kind_name().to_string());
    }

    fn offer_settings(&self) {
        *self.settings_offered.lock().expect("settings lock") = true;
    }
}

/// Build an orchestrator against a mock server with the given store.
pub fn orchestrator_for(
    server_uri: &str,
    store: Arc<MemoryStore>,
    reporter: Arc<RecordingReporter>,
) -> LoginOrchestrator {
    let client = PortalClient::with_base_url(server_uri).expect("mock server URL");
    LoginOrchestrator::new(store.clone(), store, client, reporter)
}
