//! Styled terminal output.
//!
//! Grounded on `raya-cli::output::StyledOutput`: a thin `termcolor` wrapper
//! with one helper per message kind. The teacher's CLI never pulls in a
//! logging framework, so neither does this one — everything here goes
//! straight to stdout/stderr.

use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Styled writer for CLI status messages.
pub struct StyledOutput {
    stdout: StandardStream,
    stderr: StandardStream,
}

impl StyledOutput {
    /// Build an output writer, honoring `NO_COLOR` the way `raya-cli` does.
    pub fn new() -> Self {
        let choice = resolve_color_choice();
        Self {
            stdout: StandardStream::stdout(choice),
            stderr: StandardStream::stderr(choice),
        }
    }

    /// Print a success line in bold green to stdout.
    pub fn success(&mut self, message: &str) {
        let _ = self.write_colored(Stream::Stdout, Some(Color::Green), true, message);
    }

    /// Print an error line in bold red to stderr.
    pub fn error(&mut self, message: &str) {
        let _ = self.write_colored(Stream::Stderr, Some(Color::Red), true, message);
    }

    /// Print a warning line in yellow to stderr.
    pub fn warning(&mut self, message: &str) {
        let _ = self.write_colored(Stream::Stderr, Some(Color::Yellow), false, message);
    }

    /// Print an informational line, uncolored, to stdout.
    pub fn info(&mut self, message: &str) {
        let _ = writeln!(self.stdout, "{message}");
    }

    fn write_colored(
        &mut self,
        stream: Stream,
        color: Option<Color>,
        bold: bool,
        message: &str,
    ) -> std::io::Result<()> {
        let target = match stream {
            Stream::Stdout => &mut self.stdout,
            Stream::Stderr => &mut self.stderr,
        };
        let mut spec = ColorSpec::new();
        spec.set_fg(color).set_bold(bold);
        target.set_color(&spec)?;
        writeln!(target, "{message}")?;
        target.reset()
    }
}

impl Default for StyledOutput {
    fn default() -> Self {
        Self::new()
    }
}

enum Stream {
    Stdout,
    Stderr,
}

fn resolve_color_choice() -> ColorChoice {
    if std::env::var_os("NO_COLOR").is_some() {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    }
}
