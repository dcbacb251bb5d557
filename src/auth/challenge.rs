//! Classification of the response to the credential submission.
//!
//! After the password POST the portal renders one of two pages: a method
//! selection page (the user must pick an OTP method from one or more
//! `<select>`s) or the matrix challenge itself. The classifier decides which,
//! and on the selection path builds the form that picks grid authentication.

use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::error::AuthError;
use super::form::{extract_inputs, FormFields};

/// Option value identifying the grid (matrix) authentication method.
pub const GRID_AUTH_OPTION: &str = "GridAuthOption";

/// Phrases that mark the method-selection page. Checked against the body with
/// inline scripts removed, since the portal's scripts mention the labels too.
const SELECTION_MARKERS: [&str; 2] = ["Select Label for OTP", "Token Only"];

fn script_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?is)<script.*?>.*?</script>").unwrap())
}

/// Which of the two known server behaviors the response body represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeBranch {
    /// Method-selection page; the contained form picks grid authentication
    /// and must be POSTed to reach the challenge page.
    SelectMethod(FormFields),

    /// The body already is the matrix challenge page.
    Direct,
}

/// Remove inline `<script>` blocks.
pub fn strip_scripts(html: &str) -> String {
    script_pattern().replace_all(html, "").into_owned()
}

/// Classify the post-credential response body.
///
/// Fails with [`AuthError::ChallengeUnavailable`] when the selection page
/// offers no grid authentication option anywhere.
pub fn classify(body: &str) -> Result<ChallengeBranch, AuthError> {
    let stripped = strip_scripts(body);
    if !SELECTION_MARKERS.iter().any(|m| stripped.contains(m)) {
        return Ok(ChallengeBranch::Direct);
    }

    let document = Html::parse_document(body);
    let Ok(option_selector) = Selector::parse("option") else {
        return Ok(ChallengeBranch::Direct);
    };

    let grid_offered = document
        .select(&option_selector)
        .any(|option| option.value().attr("value") == Some(GRID_AUTH_OPTION));
    if !grid_offered {
        return Err(AuthError::ChallengeUnavailable);
    }

    Ok(ChallengeBranch::SelectMethod(build_selection_form(
        &document,
    )))
}

/// Build the selection form: the page's inputs plus one field per named
/// `<select>`, forced to the grid option when that option is among its
/// children and to its first option's value otherwise (an unchanged default
/// selection, as a browser would submit it).
fn build_selection_form(document: &Html) -> FormFields {
    let mut fields = extract_inputs(document);
    let Ok(select_selector) = Selector::parse("select") else {
        return fields;
    };

    for select in document.select(&select_selector) {
        let Some(name) = select.value().attr("name") else {
            continue;
        };

        if child_options(select).any(|o| o.value().attr("value") == Some(GRID_AUTH_OPTION)) {
            fields.insert(name, GRID_AUTH_OPTION);
        } else if let Some(first) = child_options(select).next() {
            fields.insert(name, first.value().attr("value").unwrap_or(""));
        }
    }

    fields
}

fn child_options<'a>(select: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    select
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "option")
}
