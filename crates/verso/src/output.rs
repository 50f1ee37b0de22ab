//! Colored terminal output utilities.

use console::{Style, Term};

/// Width of the right-aligned status label.
const LABEL_WIDTH: usize = 10;

/// Status line formatter.
///
/// Everything goes to stderr so stdout carries only command results.
pub(crate) struct Output {
    term: Term,
    label: Style,
    yellow: Style,
    red: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            label: Style::new().green().bold(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
        }
    }

    /// Print a status line: `  Resolved 4 locale entries`.
    pub(crate) fn status(&self, label: &str, msg: &str) {
        let label = format!("{label:>LABEL_WIDTH$}");
        let _ = self
            .term
            .write_line(&format!("{} {msg}", self.label.apply_to(label)));
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }
}
