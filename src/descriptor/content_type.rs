// ABOUTME: Supported request payload kinds.
// ABOUTME: JSON bodies reference a remote artifact; ZIP bodies carry the artifact itself.

use serde::Serialize;
use std::fmt;

const ZIP_MEDIA_TYPES: &[&str] = &[
    "application/zip",
    "application/x-zip-compressed",
    "application/octet-stream",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContentType {
    Json,
    Zip,
}

impl ContentType {
    /// Parse a `Content-Type` header value, ignoring parameters and case.
    pub fn parse(raw: &str) -> Option<Self> {
        let media_type = raw.split(';').next().unwrap_or_default().trim();

        if media_type.eq_ignore_ascii_case("application/json") {
            Some(ContentType::Json)
        } else if ZIP_MEDIA_TYPES
            .iter()
            .any(|zip| media_type.eq_ignore_ascii_case(zip))
        {
            Some(ContentType::Zip)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Json => "JSON",
            ContentType::Zip => "ZIP",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
