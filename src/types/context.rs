// ABOUTME: Application coordinates and resolved credentials for a deployment.
// ABOUTME: CfContext names the target app; Authorization holds basic-auth credentials.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use std::fmt;

/// Path-style coordinates of the application being deployed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CfContext {
    pub environment: String,
    pub organization: String,
    pub space: String,
    pub application: String,
}

impl CfContext {
    pub fn new(
        environment: impl Into<String>,
        organization: impl Into<String>,
        space: impl Into<String>,
        application: impl Into<String>,
    ) -> Self {
        Self {
            environment: environment.into(),
            organization: organization.into(),
            space: space.into(),
            application: application.into(),
        }
    }
}

/// Username/password pair used against every foundation of an environment.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Authorization {
    pub username: String,
    pub password: String,
}

impl Authorization {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Decode an HTTP `Authorization: Basic <base64>` header value.
    ///
    /// Returns `None` for anything that is not a well-formed basic credential.
    pub fn from_basic_header(header: &str) -> Option<Self> {
        let (scheme, encoded) = header.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }

        let decoded = STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (username, password) = decoded.split_once(':')?;
        Some(Self::new(username, password))
    }

    /// Both fields empty means no credentials were supplied.
    pub fn is_empty(&self) -> bool {
        self.username.is_empty() && self.password.is_empty()
    }
}

impl fmt::Debug for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authorization")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
