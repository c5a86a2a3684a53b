// ABOUTME: A single known failure signature and the diagnostic it produces.
// ABOUTME: Matches push output with a regex and reports the offending lines.

use regex::Regex;
use serde::Serialize;

/// A structured diagnostic derived from push output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogMatchedError {
    pub description: String,
    /// Distinct output lines that matched, in order of appearance.
    pub details: Vec<String>,
    pub solution: String,
    pub code: String,
}

/// A registered failure signature.
#[derive(Debug, Clone)]
pub struct ErrorMatcher {
    description: String,
    pattern: Regex,
    solution: String,
    code: String,
}

impl ErrorMatcher {
    pub fn new(
        description: &str,
        pattern: &str,
        solution: &str,
        code: &str,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            description: description.to_string(),
            pattern: Regex::new(pattern)?,
            solution: solution.to_string(),
            code: code.to_string(),
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Match against `text`, returning the byte offset of the first match
    /// alongside the diagnostic.
    pub fn find(&self, text: &str) -> Option<(usize, LogMatchedError)> {
        let mut first = None;
        let mut details: Vec<String> = Vec::new();

        for m in self.pattern.find_iter(text) {
            first.get_or_insert(m.start());
            let line = containing_line(text, m.start(), m.end());
            if !details.iter().any(|d| d == line) {
                details.push(line.to_string());
            }
        }

        first.map(|position| {
            (
                position,
                LogMatchedError {
                    description: self.description.clone(),
                    details,
                    solution: self.solution.clone(),
                    code: self.code.clone(),
                },
            )
        })
    }
}

/// The full line(s) around a match, trimmed.
fn containing_line(text: &str, start: usize, end: usize) -> &str {
    let line_start = text[..start].rfind('\n').map_or(0, |i| i + 1);
    let line_end = text[end..].find('\n').map_or(text.len(), |i| end + i);
    text[line_start..line_end].trim()
}
