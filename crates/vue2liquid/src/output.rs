//! Output formatting for conversion reports.

use crate::cli::OutputFormat;
use crate::orchestrator::{FileReport, Outcome, RunSummary};

/// Formatter for the per-file report and summary.
pub struct OutputFormatter {
    format: OutputFormat,
    /// Report on stderr because stdout carries the converted templates.
    to_stderr: bool,
}

impl OutputFormatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, to_stderr: bool) -> Self {
        Self { format, to_stderr }
    }

    /// Print the result for one file.
    pub fn print_file(&self, report: &FileReport) {
        if let (OutputFormat::Human, Err(e)) = (self.format, &report.result) {
            eprintln!("{:?}", e);
            return;
        }
        if let Some(line) = self.render_file(report) {
            self.emit(&line);
        }
    }

    /// Print the summary.
    pub fn print_summary(&self, summary: &RunSummary) {
        let text = self.render_summary(summary);
        self.emit(&text);
    }

    fn emit(&self, text: &str) {
        if self.to_stderr {
            eprintln!("{}", text);
        } else {
            println!("{}", text);
        }
    }

    fn render_file(&self, report: &FileReport) -> Option<String> {
        match self.format {
            OutputFormat::Human => render_file_human(report),
            OutputFormat::Json => Some(render_file_json(report)),
        }
    }

    fn render_summary(&self, summary: &RunSummary) -> String {
        match self.format {
            OutputFormat::Human => render_summary_human(summary),
            OutputFormat::Json => render_summary_json(summary),
        }
    }
}

// Human format

fn render_file_human(report: &FileReport) -> Option<String> {
    match &report.result {
        Ok(Outcome::Written(output)) => Some(format!(
            "\x1b[32m✓\x1b[0m {} → {}",
            report.path.display(),
            output.display()
        )),
        Ok(Outcome::Skipped(reason)) => Some(format!(
            "\x1b[33mskipped\x1b[0m {}: {}",
            report.path.display(),
            reason
        )),
        Ok(Outcome::Printed(_)) | Err(_) => None,
    }
}

fn render_summary_human(summary: &RunSummary) -> String {
    let mut text = String::from("\n");
    if summary.failed == 0 {
        text.push_str(&format!(
            "\x1b[32m✓\x1b[0m Converted {} of {} file{} ({}ms)",
            summary.converted,
            summary.file_count,
            plural(summary.file_count),
            summary.duration_ms
        ));
    } else {
        text.push_str(&format!(
            "\x1b[31m✗\x1b[0m {} file{} failed, {} converted",
            summary.failed,
            plural(summary.failed),
            summary.converted
        ));
    }
    if summary.skipped > 0 {
        text.push_str(&format!(
            "\n\x1b[33m⚠\x1b[0m Skipped {} file{} without a template",
            summary.skipped,
            plural(summary.skipped)
        ));
    }
    text
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

// JSON format

fn render_file_json(report: &FileReport) -> String {
    let file = report.path.to_string_lossy();
    let json = match &report.result {
        Ok(Outcome::Written(output)) => serde_json::json!({
            "type": "file",
            "file": file,
            "status": "converted",
            "output": output.to_string_lossy(),
        }),
        Ok(Outcome::Printed(_)) => serde_json::json!({
            "type": "file",
            "file": file,
            "status": "converted",
        }),
        Ok(Outcome::Skipped(reason)) => serde_json::json!({
            "type": "file",
            "file": file,
            "status": "skipped",
            "reason": reason,
        }),
        Err(e) => serde_json::json!({
            "type": "file",
            "file": file,
            "status": "failed",
            "error": e.chain().map(ToString::to_string).collect::<Vec<_>>().join(": "),
        }),
    };
    json.to_string()
}

fn render_summary_json(summary: &RunSummary) -> String {
    serde_json::json!({
        "type": "summary",
        "files": summary.file_count,
        "converted": summary.converted,
        "skipped": summary.skipped,
        "failed": summary.failed,
        "duration_ms": summary.duration_ms
    })
    .to_string()
}
