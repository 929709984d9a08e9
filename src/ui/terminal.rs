//! Terminal UI.

use console::Term;
use std::io::Write;

use super::{OutputMode, UserInterface, VouchTheme};

/// Terminal UI implementation.
///
/// Status lines go to stdout, errors to stderr.
pub struct TerminalUI {
    term: Term,
    err: Term,
    theme: VouchTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    ///
    /// `no_color` forces the plain theme even on a TTY.
    pub fn new(mode: OutputMode, no_color: bool) -> Self {
        let theme = if no_color {
            VouchTheme::plain()
        } else {
            VouchTheme::detect()
        };
        Self {
            term: Term::stdout(),
            err: Term::stderr(),
            theme,
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_warning(msg)).ok();
        }
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn detail(&mut self, msg: &str) {
        if self.mode.shows_details() {
            writeln!(self.term, "{}", self.theme.format_detail(msg)).ok();
        }
    }

    fn raw(&mut self, text: &str) {
        writeln!(self.term, "{}", text).ok();
    }
}
