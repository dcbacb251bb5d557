//! Resolution of matrix challenge coordinates to answer fields.
//!
//! The challenge page names up to three cells as tokens like `[C,4]`. Each
//! token resolves to one `message{3,4,5}` form field whose value is the
//! matrix cell at (letter - 'A', digit - '1'). The arithmetic lives here as a
//! pure function; off-by-one mistakes in it are invisible at the HTTP layer.

use std::sync::OnceLock;

use anyhow::{anyhow, Result};
use regex::Regex;

use crate::models::{Coordinate, Matrix};

/// The portal always asks for at most three cells, regardless of grid size.
const MAX_ANSWERS: usize = 3;

/// Answer fields are numbered from message3.
const FIRST_FIELD_NUMBER: usize = 3;

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[([A-Z]),([0-9])\]").unwrap())
}

/// Coordinate tokens in the page, left to right, first three only.
fn scan_tokens(challenge_html: &str) -> Vec<(char, char)> {
    token_pattern()
        .captures_iter(challenge_html)
        .take(MAX_ANSWERS)
        .filter_map(|caps| {
            let letter = caps.get(1)?.as_str().chars().next()?;
            let digit = caps.get(2)?.as_str().chars().next()?;
            Some((letter, digit))
        })
        .collect()
}

/// Resolve the challenge page's coordinate tokens against the matrix,
/// producing `(field name, cell value)` pairs in order of appearance.
///
/// Fewer than three tokens produce fewer fields. The token alphabet is wider
/// than the matrix (letters past "J", digits 0/8/9); such a token means the
/// server sent a non-conforming page (the matrix shape was validated before
/// any request), so it is an error rather than a panic.
pub fn resolve_answers(challenge_html: &str, matrix: &Matrix) -> Result<Vec<(String, String)>> {
    scan_tokens(challenge_html)
        .into_iter()
        .enumerate()
        .map(|(i, (letter, digit))| {
            let value = Coordinate::from_token_chars(letter, digit)
                .and_then(|coordinate| matrix.cell(coordinate))
                .ok_or_else(|| {
                    anyhow!("challenge token [{letter},{digit}] is outside the 10x7 matrix")
                })?;
            Ok((
                format!("message{}", i + FIRST_FIELD_NUMBER),
                value.to_string(),
            ))
        })
        .collect()
}
