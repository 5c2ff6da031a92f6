//! Human-readable diagnostic rendering.

use crate::diagnostic::Diagnostic;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// warning[W001]: file not found
///   --> /var/www/site/wp-includes/wp-db.php
///    = note: ...
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, text: &str, ansi: &str) -> String {
        if self.color {
            format!("\x1b[{ansi}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let ansi = match diag.severity {
            crate::Severity::Error => "1;31",
            crate::Severity::Warning => "1;33",
            crate::Severity::Note => "1;36",
        };
        let header = format!("{}[{}]", diag.severity, diag.code);

        let mut out = format!("{}: {}", self.paint(&header, ansi), diag.message);
        if let Some(path) = &diag.path {
            out.push_str(&format!("\n  --> {}", path.display()));
        }
        for note in &diag.notes {
            out.push_str(&format!("\n   = note: {note}"));
        }
        out
    }
}
