//! Domain types for the portal login flow.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Number of matrix columns, labelled "A" through "J" by the portal.
pub const MATRIX_COLUMNS: usize = 10;

/// Number of matrix rows, labelled "1" through "7" by the portal.
pub const MATRIX_ROWS: usize = 7;

/// A stored portal account.
///
/// Read-only to the login flow; it is loaded once per attempt and injected
/// into the credential form as `usr_name` / `usr_password`.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: String,
    pub password: SecretString,
}

impl Account {
    pub fn new(id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Whether both fields are present and usable for a login attempt.
    pub fn is_complete(&self) -> bool {
        !self.id.is_empty() && !self.password.expose_secret().is_empty()
    }
}

/// The user's pre-shared answer matrix.
///
/// Stored column-major: `cells[column][row]` with 10 columns of 7
/// single-character cells each. The stored value is not trusted until
/// [`Matrix::is_complete`] has been checked, so malformed data coming out of
/// storage surfaces as a configuration error instead of a panic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Matrix {
    pub cells: Vec<Vec<String>>,
}

impl Matrix {
    pub fn new(cells: Vec<Vec<String>>) -> Self {
        Self { cells }
    }

    /// Whether the matrix has the exact 10x7 single-character shape.
    pub fn is_complete(&self) -> bool {
        self.cells.len() == MATRIX_COLUMNS
            && self.cells.iter().all(|column| {
                column.len() == MATRIX_ROWS
                    && column.iter().all(|cell| cell.chars().count() == 1)
            })
    }

    /// Look up a cell, returning `None` when the coordinate falls outside the
    /// stored shape.
    pub fn cell(&self, coordinate: Coordinate) -> Option<&str> {
        self.cells
            .get(coordinate.column)?
            .get(coordinate.row)
            .map(|s| s.as_str())
    }
}

/// A challenge coordinate parsed from a token such as `[C,4]`.
///
/// `column` is zero-based from letter "A", `row` zero-based from digit "1".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coordinate {
    pub column: usize,
    pub row: usize,
}

impl Coordinate {
    /// Build a coordinate from the letter and digit of a challenge token.
    pub fn from_token_chars(letter: char, digit: char) -> Option<Self> {
        if !letter.is_ascii_uppercase() || !digit.is_ascii_digit() {
            return None;
        }
        Some(Self {
            column: (letter as u8 - b'A') as usize,
            row: (digit as u8).checked_sub(b'1')? as usize,
        })
    }

    /// Whether this coordinate addresses a cell of a well-formed 10x7 matrix.
    pub fn in_bounds(&self) -> bool {
        self.column < MATRIX_COLUMNS && self.row < MATRIX_ROWS
    }
}
