//! Diagnostic codes with category prefixes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Compile failures, prefixed with `E`.
    Error,
    /// Skipped targets, prefixed with `W`.
    Warning,
    /// Informational records, prefixed with `N`.
    Note,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
            Category::Note => 'N',
        }
    }
}

/// A diagnostic code: category prefix plus a zero-padded 3-digit number,
/// e.g. `E001`, `W001`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// A target could not be compiled.
    pub const COMPILE_ERROR: Self = Self::new(Category::Error, 1);
    /// A target did not resolve to a readable file.
    pub const NOT_FOUND: Self = Self::new(Category::Warning, 1);
    /// End-of-sweep summary.
    pub const SWEEP_SUMMARY: Self = Self::new(Category::Note, 1);

    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_prefixes() {
        assert_eq!(Category::Error.prefix(), 'E');
        assert_eq!(Category::Warning.prefix(), 'W');
        assert_eq!(Category::Note.prefix(), 'N');
    }

    #[test]
    fn well_known_codes() {
        assert_eq!(DiagnosticCode::COMPILE_ERROR.to_string(), "E001");
        assert_eq!(DiagnosticCode::NOT_FOUND.to_string(), "W001");
        assert_eq!(DiagnosticCode::SWEEP_SUMMARY.to_string(), "N001");
    }

    #[test]
    fn zero_padding() {
        assert_eq!(DiagnosticCode::new(Category::Warning, 42).to_string(), "W042");
        assert_eq!(DiagnosticCode::new(Category::Error, 120).to_string(), "E120");
    }
}
