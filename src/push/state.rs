// ABOUTME: Rollout state marker types for the type state pattern.
// ABOUTME: Zero-sized types restrict which blue-green step can run next.

/// Nothing pushed yet.
/// Available actions: `stage()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Pending;

/// New version running on green instances of every foundation.
/// Available actions: `commit()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Staged;

/// At least one foundation failed to stage.
/// Available actions: `rollback()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Failed;

/// Decision applied; the environment is either fully updated or restored.
/// Available actions: `into_outcome()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Finished;
