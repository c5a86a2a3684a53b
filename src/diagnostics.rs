// ABOUTME: Diagnostics accumulator for non-fatal warnings during deployment.
// ABOUTME: Collects failures that must not change the outcome but should be reported.

/// Collects non-fatal warnings during deployment operations.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Move all warnings out of `other` into this accumulator, without re-logging.
    pub fn absorb(&mut self, other: Vec<Warning>) {
        self.warnings.extend(other);
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

/// A non-fatal warning collected during deployment.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// Create a silent deployment warning.
    pub fn silent_deploy(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::SilentDeploy,
            message: message.into(),
        }
    }

    /// Create an event handler warning.
    pub fn event_handler(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::EventHandler,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// The mirrored push to the silent endpoint failed.
    SilentDeploy,
    /// A success or failure event handler failed after the push finished.
    EventHandler,
}
