//! Name guards for everything that ends up in SQL text or on the filesystem.
//!
//! Values always travel as bound parameters; only identifiers are spliced into
//! statements, and only after passing through this module.

use crate::error::AdminError;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

pub const DATABASE_SUFFIX: &str = ".sqlite";

static IDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex"));

static DATABASE_STEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_-]*$").expect("static regex"));

/// A table or column name that is safe to splice into SQL: either a new name
/// that passed the allow-list, or one read back from SQLite's own catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident(String);

impl Ident {
    /// Validate a name the operator wants to create.
    pub fn parse(raw: &str) -> Result<Self, AdminError> {
        let raw = raw.trim();
        if IDENT_RE.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(AdminError::InvalidName(raw.to_string()))
        }
    }

    /// A name exactly as SQLite stores it. Only ever emitted quoted.
    pub(crate) fn existing(name: String) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn quoted(&self) -> String {
        quote(&self.0)
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Double-quote an identifier, doubling embedded quotes.
///
/// Used directly only for names read back from SQLite's own catalog.
pub fn quote(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Normalize user input to a database file name (`<stem>.sqlite`).
///
/// Accepts the bare stem or the full file name. The stem allow-list keeps the
/// result inside the data directory.
pub fn database_file_name(raw: &str) -> Result<String, AdminError> {
    let raw = raw.trim();
    let stem = raw.strip_suffix(DATABASE_SUFFIX).unwrap_or(raw);
    if DATABASE_STEM_RE.is_match(stem) {
        Ok(format!("{stem}{DATABASE_SUFFIX}"))
    } else {
        Err(AdminError::InvalidName(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_identifiers() {
        for name in ["items", "_private", "Order2", "a_b_c"] {
            assert_eq!(Ident::parse(name).unwrap().as_str(), name);
        }
        assert_eq!(Ident::parse("  padded ").unwrap().as_str(), "padded");
    }

    #[test]
    fn rejects_injection_and_odd_names() {
        for name in [
            "",
            "2fast",
            "x; DROP TABLE y",
            "a\"b",
            "has space",
            "dash-ed",
            "ünï",
        ] {
            assert!(
                matches!(Ident::parse(name), Err(AdminError::InvalidName(_))),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn quoting_doubles_embedded_quotes() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote("we\"ird"), "\"we\"\"ird\"");
        assert_eq!(Ident::parse("items").unwrap().quoted(), "\"items\"");
    }

    #[test]
    fn database_names_normalize_to_sqlite_files() {
        assert_eq!(database_file_name("shop").unwrap(), "shop.sqlite");
        assert_eq!(database_file_name("shop.sqlite").unwrap(), "shop.sqlite");
        assert_eq!(database_file_name("my-db_2").unwrap(), "my-db_2.sqlite");
    }

    #[test]
    fn database_names_cannot_escape_the_data_dir() {
        for name in ["../etc/passwd", "a/b", ".hidden", "", ".sqlite", "..\\x"] {
            assert!(database_file_name(name).is_err(), "{name:?} should be rejected");
        }
    }
}
