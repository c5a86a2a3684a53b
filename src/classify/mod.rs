// ABOUTME: Log-based error classification for failed pushes.
// ABOUTME: Turns raw push output into remediation hints for the response body.

mod finder;
mod matcher;

pub use finder::{ErrorFinder, builtin_matchers};
pub use matcher::{ErrorMatcher, LogMatchedError};

use std::fmt::Write;

/// Render findings as the human-readable block appended to failed responses.
pub fn format_findings(findings: &[LogMatchedError]) -> String {
    let mut out = String::new();

    for finding in findings {
        let _ = writeln!(
            out,
            "The following error was found in the above logs: {}",
            finding.description
        );
        for detail in &finding.details {
            let _ = writeln!(out, "Error: {detail}");
        }
        let _ = writeln!(out, "Potential solution: {}", finding.solution);
        out.push('\n');
    }

    out
}
