// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes.

use serde::Serialize;
use std::time::Instant;

use crate::classify::LogMatchedError;
use crate::diagnostics::Warning;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Response body plus progress and warnings
    Normal,
    /// Response body only
    Quiet,
    /// One JSON document per command for scripting
    Json,
}

/// Everything the CLI reports about a finished request.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<&'a str>,
    pub body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "no_findings")]
    pub findings: &'a [LogMatchedError],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<&'a str>,
}

impl<'a> Report<'a> {
    pub fn new(status: u16, body: &'a str) -> Self {
        Self {
            status,
            correlation_id: None,
            body,
            error: None,
            findings: &[],
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: &'a [Warning]) -> Self {
        self.warnings = warnings.iter().map(|w| w.message.as_str()).collect();
        self
    }
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            eprintln!("{message}");
        }
    }

    /// Print the response of a deploy or state request.
    ///
    /// The body always goes to stdout. Normal mode adds a status line and
    /// warnings on stderr.
    pub fn report(&self, report: &Report<'_>) {
        match self.mode {
            OutputMode::Normal => {
                print!("{}", report.body);
                for warning in &report.warnings {
                    eprintln!("Warning: {warning}");
                }
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    eprintln!("Status {} ({:.1}s)", report.status, elapsed);
                } else {
                    eprintln!("Status {}", report.status);
                }
            }
            OutputMode::Quiet => print!("{}", report.body),
            OutputMode::Json => {
                let event = JsonReport {
                    report,
                    duration_secs: self.start_time.map(|_| self.elapsed_secs()),
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    println!("{json}");
                }
            }
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => println!("{message}"),
            OutputMode::Json => {
                let event = JsonEvent {
                    event: "success",
                    message,
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    println!("{json}");
                }
            }
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => {
                let event = JsonEvent {
                    event: "error",
                    message,
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    eprintln!("{json}");
                }
            }
        }
    }
}

fn no_findings(findings: &&[LogMatchedError]) -> bool {
    findings.is_empty()
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
}

#[derive(Serialize)]
struct JsonReport<'a, 'b> {
    #[serde(flatten)]
    report: &'b Report<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_json_omits_empty_fields() {
        let report = Report::new(200, "pushed\n");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], 200);
        assert_eq!(json["body"], "pushed\n");
        assert!(json.get("error").is_none());
        assert!(json.get("findings").is_none());
        assert!(json.get("warnings").is_none());
    }

    #[test]
    fn report_carries_warning_messages() {
        let warnings = vec![Warning::silent_deploy("silent deployment failed")];
        let report = Report::new(200, "").with_warnings(&warnings);
        assert_eq!(report.warnings, vec!["silent deployment failed"]);
    }
}
