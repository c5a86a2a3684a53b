// ABOUTME: Scans push output against the registry of known failure signatures.
// ABOUTME: Pure function over text; ships built-in platform signatures.

use super::{ErrorMatcher, LogMatchedError};

/// (description, pattern, solution, code)
const BUILTIN_SIGNATURES: &[(&str, &str, &str, &str)] = &[
    (
        "The foundation does not have enough resources to place the application",
        r"(?i)insufficient resources",
        "Lower the memory or disk quota in the manifest, run fewer instances, or ask the platform team for more capacity.",
        "insufficient-resources",
    ),
    (
        "The organization memory quota has been exceeded",
        r"(?i)exceeded your organization's memory limit",
        "Scale down other applications in the organization or request a larger memory quota.",
        "org-memory-quota",
    ),
    (
        "The requested route is already bound to another application",
        r"(?i)(the route \S+ is already in use|the host is taken)",
        "Choose a different host name or remove the route from the application that holds it.",
        "route-taken",
    ),
    (
        "The application failed to stage",
        r"(?i)(staging error|stagingerror|failed to stage)",
        "Check the staging logs above for dependency or compilation errors.",
        "staging-failed",
    ),
    (
        "No buildpack recognized the application",
        r"(?i)(none of the buildpacks detected a compatible application|unable to detect buildpack|noappdetectederror)",
        "Specify a buildpack in the manifest or make sure the artifact has the expected layout.",
        "buildpack-detection",
    ),
    (
        "The application did not start",
        r"(?i)(start unsuccessful|instances? failed to start|start app timeout|app instance exited)",
        "Make sure the application binds to $PORT and its health check passes within the start timeout.",
        "start-failed",
    ),
    (
        "The target organization or space does not exist",
        r"(?i)\b(organization|space) '[^']*' not found",
        "Verify the organization and space in the request path, or create them on every foundation.",
        "target-not-found",
    ),
    (
        "The foundation rejected the deployment credentials",
        r"(?i)(credentials were rejected|authentication failed|invalid_grant)",
        "Check the username and password sent with the request or configured as defaults.",
        "credentials-rejected",
    ),
];

/// Registry of failure signatures.
#[derive(Debug, Clone)]
pub struct ErrorFinder {
    matchers: Vec<ErrorMatcher>,
}

impl ErrorFinder {
    /// Finder with exactly the given matchers.
    pub fn new(matchers: Vec<ErrorMatcher>) -> Self {
        Self { matchers }
    }

    /// Built-in signatures followed by `extra`.
    pub fn with_builtins(extra: impl IntoIterator<Item = ErrorMatcher>) -> Self {
        let mut matchers = builtin_matchers();
        matchers.extend(extra);
        Self { matchers }
    }

    pub fn matchers(&self) -> &[ErrorMatcher] {
        &self.matchers
    }

    /// Every matching signature, ordered by first occurrence in `output`.
    pub fn find_errors(&self, output: &str) -> Vec<LogMatchedError> {
        let mut found: Vec<(usize, LogMatchedError)> = self
            .matchers
            .iter()
            .filter_map(|matcher| matcher.find(output))
            .collect();

        // Stable: ties keep registration order.
        found.sort_by_key(|(position, _)| *position);
        found.into_iter().map(|(_, error)| error).collect()
    }
}

impl Default for ErrorFinder {
    fn default() -> Self {
        Self::with_builtins(Vec::new())
    }
}

/// Compiled built-in signatures.
pub fn builtin_matchers() -> Vec<ErrorMatcher> {
    BUILTIN_SIGNATURES
        .iter()
        .filter_map(|(description, pattern, solution, code)| {
            ErrorMatcher::new(description, pattern, solution, code)
                .inspect_err(|e| tracing::error!("built-in matcher {} is invalid: {}", code, e))
                .ok()
        })
        .collect()
}
