//! Colored terminal output for pipeline commands

use std::io::Write;
use std::path::Path;
use termcolor::{Buffer, BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Output manager for consistent colored terminal output.
///
/// Progress goes to stdout and is suppressed in quiet mode. Errors always go
/// to stderr.
#[derive(Debug)]
pub struct OutputManager {
    stdout: BufferWriter,
    quiet: bool,
    /// Artifact paths are shown relative to this directory when possible
    base_dir: Option<std::path::PathBuf>,
}

impl Clone for OutputManager {
    fn clone(&self) -> Self {
        let mut output = Self::new(self.quiet);
        output.base_dir = self.base_dir.clone();
        output
    }
}

/// Write `marker` in `color`, then the message
fn marked_line(buffer: &mut Buffer, marker: &str, color: Color, message: &str) -> std::io::Result<()> {
    buffer.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(buffer, "{marker}")?;
    buffer.reset()?;
    writeln!(buffer, " {message}")
}

impl OutputManager {
    /// Create a new output manager
    pub fn new(quiet: bool) -> Self {
        Self {
            stdout: BufferWriter::stdout(ColorChoice::Auto),
            quiet,
            base_dir: None,
        }
    }

    /// Show artifact paths relative to `dir`
    pub fn with_base_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    fn print(&self, fill: impl FnOnce(&mut Buffer) -> std::io::Result<()>) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut buffer = self.stdout.buffer();
        fill(&mut buffer)?;
        self.stdout.print(&buffer)
    }

    /// Print a success message
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.print(|b| marked_line(b, "✓", Color::Green, message))
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.print(|b| marked_line(b, "⚠", Color::Yellow, message))
    }

    /// Print a stage header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        self.print(|b| {
            writeln!(b)?;
            b.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
            writeln!(b, "═══ {title} ═══")?;
            b.reset()
        })
    }

    /// Print indented text (for sub-items)
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.print(|b| writeln!(b, "    {message}"))
    }

    /// Print a produced file as an indented sub-item
    pub fn artifact(&self, path: &Path) -> std::io::Result<()> {
        let shown = self
            .base_dir
            .as_deref()
            .and_then(|base| path.strip_prefix(base).ok())
            .unwrap_or(path);
        self.indent(&shown.display().to_string())
    }

    /// Print an error message to stderr (always shown)
    pub fn error(&self, message: &str) {
        let stderr = BufferWriter::stderr(ColorChoice::Auto);
        let mut buffer = stderr.buffer();
        let printed = marked_line(&mut buffer, "✗", Color::Red, message)
            .and_then(|()| stderr.print(&buffer));
        if printed.is_err() {
            eprintln!("✗ {message}");
        }
    }

    /// Print a plain message to stderr (always shown)
    pub fn eprintln(&self, message: &str) {
        let stderr = BufferWriter::stderr(ColorChoice::Auto);
        let mut buffer = stderr.buffer();
        if writeln!(buffer, "{message}").is_ok() {
            let _ = stderr.print(&buffer);
        }
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_suppresses_progress() {
        let output = OutputManager::new(true);
        assert!(output.is_quiet());
        assert!(output.success("done").is_ok());
        assert!(output.section("Archive").is_ok());
    }

    #[test]
    fn clone_keeps_base_dir() {
        let output = OutputManager::new(false).with_base_dir("/tmp/project");
        let cloned = output.clone();
        assert_eq!(cloned.base_dir.as_deref(), Some(Path::new("/tmp/project")));
        assert!(!cloned.is_quiet());
    }
}
