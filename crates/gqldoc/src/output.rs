//! Colored terminal output, kept separate from `tracing` diagnostics.

use console::{Style, Term};

/// Terminal output formatter for user-facing run summaries.
pub(crate) struct Output {
    term: Term,
    blue: Style,
    green: Style,
    red: Style,
    blue_bold: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            blue: Style::new().blue(),
            green: Style::new().green(),
            red: Style::new().red(),
            blue_bold: Style::new().blue().bold(),
        }
    }

    /// Print an informational message (blue).
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(&self.blue.apply_to(msg).to_string());
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print a highlighted reminder (blue bold).
    pub(crate) fn highlight(&self, msg: &str) {
        let _ = self
            .term
            .write_line(&self.blue_bold.apply_to(msg).to_string());
    }
}
