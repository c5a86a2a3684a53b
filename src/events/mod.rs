// ABOUTME: Lifecycle event types, subscriber traits, and the event bus.
// ABOUTME: Supports typed emission with positional results and named emission that fails fast.

mod bus;
mod error;
mod event;
mod kind;
mod logging;
mod named;

pub use bus::{EventBus, EventHandler, NamedEventHandler};
pub use error::{EventError, HandlerError};
pub use event::{DeployFailure, DeployFinish, DeployStart, DeploySuccess, LifecycleEvent};
pub use kind::EventKind;
pub use logging::TracingHandler;
pub use named::{
    DeployFailureEvent, DeployFinishedEvent, DeployStartedEvent, DeploySuccessEvent,
    EventContext, NamedEvent,
};
