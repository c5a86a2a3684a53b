// ABOUTME: Library root for greenlight - exposes the deployment core for embedding and testing.
// ABOUTME: The main binary is in main.rs.

pub mod classify;
pub mod config;
pub mod descriptor;
pub mod diagnostics;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod orchestrator;
pub mod output;
pub mod push;
pub mod response;
pub mod types;
