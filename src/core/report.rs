// ─── Operator Reporting ───
// Leveled, colored status lines shown while the pipeline advances.
// Diagnostics go through `tracing`; this is what the operator reads.

use std::io::{self, Write};

use console::{style, Color, Term};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Error,
}

impl Level {
    fn label(self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Success => "success",
            Level::Error => "error",
        }
    }

    fn color(self) -> Color {
        match self {
            Level::Info => Color::Cyan,
            Level::Success => Color::Green,
            Level::Error => Color::Red,
        }
    }
}

/// Capability handed to every component that talks to the operator.
pub trait Reporter: Send + Sync {
    fn report(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.report(Level::Info, message);
    }

    fn success(&self, message: &str) {
        self.report(Level::Success, message);
    }

    fn error(&self, message: &str) {
        self.report(Level::Error, message);
    }
}

/// Writes labeled lines to stderr, styled only when stderr is a terminal.
pub struct ConsoleReporter {
    is_tty: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self {
            is_tty: Term::stderr().is_term(),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, level: Level, message: &str) {
        let _ = write_line(&mut io::stderr(), level, message, self.is_tty);
    }
}

fn write_line(w: &mut dyn Write, level: Level, message: &str, is_tty: bool) -> io::Result<()> {
    if !is_tty {
        return writeln!(w, "{} {}", level.label(), message);
    }

    let label = style(level.label()).for_stderr().bold().fg(level.color());
    match level {
        Level::Error => writeln!(
            w,
            "{} {}",
            label,
            style(message).for_stderr().bold().fg(Color::Red)
        ),
        _ => writeln!(
            w,
            "{} {}",
            label,
            style(message).for_stderr().fg(level.color())
        ),
    }
}

/// Records every line in memory.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryReporter {
    lines: std::sync::Mutex<Vec<(Level, String)>>,
}

#[cfg(test)]
impl MemoryReporter {
    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn messages(&self, level: Level) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }
}

#[cfg(test)]
impl Reporter for MemoryReporter {
    fn report(&self, level: Level, message: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((level, message.to_string()));
        }
    }
}
