//! Output formatting and writing utilities
//!
//! This module formats decode reports and shape summaries as JSON, YAML
//! or human-readable text, and writes them to stdout or a custom writer.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::summary::ShapeSummary;
use colored::Colorize;
use schemaweave_codec::{Decoded, RawObject, UnionValue};
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};
use tracing::{debug, trace};

/// Trait for formatting output with specialized support for codec types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a decode result, section by section in human mode
    fn format_decoded(&self, decoded: &Decoded) -> Result<String>;

    /// Format a shape summary
    fn format_summary(&self, summary: &ShapeSummary) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            // Human mode falls back to pretty JSON for arbitrary values
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_decoded(&self, decoded: &Decoded) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_decoded_human(decoded)),
            _ => self.format(decoded),
        }
    }

    fn format_summary(&self, summary: &ShapeSummary) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(summary.render()),
            _ => self.format(summary),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    verbose: u8,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, verbose: u8) -> Self {
        Self::with_writer(format, use_color, quiet, verbose, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        verbose: u8,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            verbose,
            writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write an error message
    pub fn error(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.red().to_string())
        } else {
            self.writeln(&format!("ERROR: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!(bytes = formatted.len(), "Outputting data");

        if self.format == OutputFormat::Human {
            self.writeln(&formatted)
        } else {
            // Machine formats are written as-is; YAML already ends in a newline
            self.write(&formatted)?;
            if !formatted.ends_with('\n') {
                self.writeln("")?;
            }
            Ok(())
        }
    }

    /// Write a decode result
    pub fn decoded(&mut self, decoded: &Decoded) -> Result<()> {
        let formatted = self.format.format_decoded(decoded)?;
        self.write(&formatted)?;
        if !formatted.ends_with('\n') {
            self.writeln("")?;
        }
        Ok(())
    }

    /// Write a shape summary
    pub fn summary(&mut self, summary: &ShapeSummary) -> Result<()> {
        let formatted = self.format.format_summary(summary)?;
        self.write(&formatted)?;
        if !formatted.ends_with('\n') {
            self.writeln("")?;
        }
        Ok(())
    }

    /// Check if verbose output should be shown
    pub fn is_verbose(&self) -> bool {
        self.verbose > 0
    }

    /// Write debug information if verbose mode is enabled
    pub fn debug(&mut self, message: &str) -> Result<()> {
        if self.verbose > 0 && self.format == OutputFormat::Human {
            if self.use_color {
                self.writeln(&format!("{} {}", "DEBUG:".dimmed(), message.dimmed()))
            } else {
                self.writeln(&format!("DEBUG: {}", message))
            }
        } else {
            Ok(())
        }
    }

    /// Write a table (for human format)
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }

        let header_row = headers
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
            .collect::<Vec<_>>()
            .join(" │ ");

        if self.use_color {
            self.writeln(&header_row.bold().to_string())?;
        } else {
            self.writeln(&header_row)?;
        }

        let separator = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        self.writeln(&separator)?;

        for row in rows {
            let row_str = row
                .iter()
                .enumerate()
                .map(|(i, cell)| match widths.get(i).copied() {
                    Some(width) => format!("{:width$}", cell, width = width),
                    None => cell.clone(),
                })
                .collect::<Vec<_>>()
                .join(" │ ");
            self.writeln(row_str.trim_end())?;
        }

        Ok(())
    }
}

/// Format a decode result for human reading
fn format_decoded_human(decoded: &Decoded) -> String {
    let mut output = String::new();
    push_decoded(&mut output, decoded, 0);
    output
}

fn push_decoded(out: &mut String, decoded: &Decoded, depth: usize) {
    let pad = "  ".repeat(depth);
    match decoded {
        Decoded::Plain { value } => {
            out.push_str(&format!("{}Value: {}\n", pad, format_value_compact(value)));
        }
        Decoded::Object { routed, union } => {
            push_entries(out, &pad, "Known", &routed.known);
            push_entries(out, &pad, "Constants", &routed.constants);
            for (name, bucket) in routed.buckets.iter() {
                push_entries(out, &pad, &format!("Bucket {}", name), bucket);
            }
            push_entries(out, &pad, "Additional", &routed.additional);
            if let Some(union) = union {
                push_union(out, union, depth);
            }
        }
        Decoded::Union(union) => push_union(out, union, depth),
    }
}

fn push_entries(out: &mut String, pad: &str, title: &str, entries: &RawObject) {
    if entries.is_empty() {
        return;
    }
    out.push_str(&format!("{}{} ({}):\n", pad, title, entries.len()));
    for (key, value) in entries.iter() {
        out.push_str(&format!("{}  {}: {}\n", pad, key, format_value_compact(value)));
    }
}

fn push_union(out: &mut String, union: &UnionValue<Decoded>, depth: usize) {
    let pad = "  ".repeat(depth);
    out.push_str(&format!(
        "{}{} matched: {}\n",
        pad,
        union.kind(),
        union.matched().join(", ")
    ));
    for member in union.members() {
        out.push_str(&format!("{}- {}\n", pad, member.variant));
        push_decoded(out, &member.value, depth + 1);
    }
}

/// Format a JSON value in a compact, human-readable way
fn format_value_compact(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            if arr.len() <= 3 {
                format!(
                    "[{}]",
                    arr.iter().map(format_value_compact).collect::<Vec<_>>().join(", ")
                )
            } else {
                format!("[{} items]", arr.len())
            }
        }
        Value::Object(obj) => {
            if obj.len() <= 2 {
                let items: Vec<String> = obj
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, format_value_compact(v)))
                    .collect();
                format!("{{{}}}", items.join(", "))
            } else {
                format!("{{{} fields}}", obj.len())
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::cell::RefCell;
    use std::io::{self, Write};
    use std::rc::Rc;

    /// Writer that keeps everything in a buffer the test can read back
    #[derive(Clone, Default)]
    pub(crate) struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }
}
