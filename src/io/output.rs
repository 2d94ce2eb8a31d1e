//! Output management for CLI commands.
//!
//! Handles formatting and display for different output formats,
//! providing a unified interface for text and JSON output.

use crate::error::DocError;
use crate::io::exit_code::ExitCode;
use crate::io::format::{JsonResponse, OutputFormat};
use crate::types::Diagnostic;
use console::style;
use serde::Serialize;
use std::fmt::Display;
use std::io::{self, Write};

/// Manages output formatting and display.
pub struct OutputManager {
    format: OutputFormat,
    stdout: Box<dyn Write>,
    stderr: Box<dyn Write>,
}

impl OutputManager {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            stdout: Box::new(io::stdout()),
            stderr: Box::new(io::stderr()),
        }
    }

    /// Create an output manager with custom writers.
    pub fn new_with_writers(
        format: OutputFormat,
        stdout: Box<dyn Write>,
        stderr: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            stdout,
            stderr,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Output a successful result.
    ///
    /// In JSON mode, wraps the data in a success response.
    /// In text mode, displays the data using its Display implementation.
    pub fn success<T>(&mut self, data: T) -> io::Result<ExitCode>
    where
        T: Serialize + Display,
    {
        match self.format {
            OutputFormat::Json => {
                let response = JsonResponse::success(&data);
                writeln!(self.stdout, "{}", serde_json::to_string_pretty(&response)?)?;
            }
            OutputFormat::Text => {
                writeln!(self.stdout, "{data}")?;
            }
        }
        Ok(ExitCode::Success)
    }

    /// Output generated documentation and the warnings raised on the way.
    ///
    /// JSON mode wraps both in one response. Text mode prints the data as
    /// JSON on stdout and the warnings on stderr, so stdout stays
    /// machine readable.
    pub fn documents<T>(&mut self, data: &T, warnings: &[Diagnostic], code: ExitCode) -> io::Result<ExitCode>
    where
        T: Serialize,
    {
        match self.format {
            OutputFormat::Json => {
                let response = JsonResponse::success(data)
                    .with_warnings(warnings.to_vec())
                    .with_exit_code(code);
                writeln!(self.stdout, "{}", serde_json::to_string_pretty(&response)?)?;
            }
            OutputFormat::Text => {
                writeln!(self.stdout, "{}", serde_json::to_string_pretty(data)?)?;
                self.warnings(warnings)?;
            }
        }
        Ok(code)
    }

    /// Print warnings to stderr (text mode only).
    pub fn warnings(&mut self, warnings: &[Diagnostic]) -> io::Result<()> {
        if self.format.is_json() {
            return Ok(());
        }
        for warning in warnings {
            writeln!(self.stderr, "{} {warning}", style("warning:").yellow().bold())?;
        }
        Ok(())
    }

    /// Output a collection with proper formatting.
    pub fn collection<T, I>(&mut self, items: I, entity_name: &str) -> io::Result<ExitCode>
    where
        T: Serialize + Display,
        I: IntoIterator<Item = T>,
    {
        let items: Vec<T> = items.into_iter().collect();

        match self.format {
            OutputFormat::Json => {
                let response = JsonResponse::success(&items);
                writeln!(self.stdout, "{}", serde_json::to_string_pretty(&response)?)?;
            }
            OutputFormat::Text => {
                writeln!(self.stdout, "Found {} {entity_name}:", items.len())?;
                writeln!(self.stdout, "{}", "=".repeat(40))?;
                for item in items {
                    writeln!(self.stdout, "{item}")?;
                }
            }
        }
        Ok(ExitCode::Success)
    }

    /// Output an error with suggestions.
    pub fn error(&mut self, error: &DocError) -> io::Result<ExitCode> {
        match self.format {
            OutputFormat::Json => {
                let response = JsonResponse::from_error(error);
                writeln!(self.stderr, "{}", serde_json::to_string_pretty(&response)?)?;
            }
            OutputFormat::Text => {
                writeln!(self.stderr, "{} {error}", style("Error:").red().bold())?;
                for suggestion in error.recovery_suggestions() {
                    writeln!(self.stderr, "  Suggestion: {suggestion}")?;
                }
            }
        }
        Ok(ExitCode::from_error(error))
    }

    /// Output progress information (text mode only).
    ///
    /// In JSON mode, progress messages are suppressed to avoid
    /// polluting the JSON output.
    pub fn progress(&mut self, message: &str) -> io::Result<()> {
        if matches!(self.format, OutputFormat::Text) {
            writeln!(self.stderr, "{message}")?;
        }
        Ok(())
    }
}
