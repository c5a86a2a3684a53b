// ABOUTME: Synchronous publish/subscribe registry for deployment lifecycle events.
// ABOUTME: Handlers run in registration order; typed emission reports per-handler results.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use super::{EventError, EventKind, HandlerError, LifecycleEvent, NamedEvent};

/// Subscriber for typed lifecycle events.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn on_event(&self, event: &LifecycleEvent) -> Result<(), HandlerError>;
}

/// Subscriber for named events.
#[async_trait]
pub trait NamedEventHandler: Send + Sync {
    async fn on_named_event(&self, event: &NamedEvent) -> Result<(), HandlerError>;
}

/// Registry of handlers keyed by event kind.
///
/// Subscription happens during startup; emission borrows the bus immutably so
/// it can be shared behind an `Arc` by every deployment.
#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<EventKind, Vec<Arc<dyn EventHandler>>>,
    named: HashMap<EventKind, Vec<Arc<dyn NamedEventHandler>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, kind: EventKind, handler: Arc<dyn EventHandler>) {
        self.handlers.entry(kind).or_default().push(handler);
    }

    /// Register one handler for every event kind.
    pub fn subscribe_all(&mut self, handler: Arc<dyn EventHandler>) {
        for kind in EventKind::ALL {
            self.subscribe(kind, Arc::clone(&handler));
        }
    }

    pub fn subscribe_named(&mut self, kind: EventKind, handler: Arc<dyn NamedEventHandler>) {
        self.named.entry(kind).or_default().push(handler);
    }

    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len) + self.named.get(&kind).map_or(0, Vec::len)
    }

    /// Invoke every typed handler for the event's kind.
    ///
    /// The result vector has one slot per handler, in registration order. A
    /// failing handler does not stop the ones after it.
    pub async fn emit(&self, event: &LifecycleEvent) -> Vec<Result<(), HandlerError>> {
        let Some(handlers) = self.handlers.get(&event.kind()) else {
            return Vec::new();
        };

        let mut results = Vec::with_capacity(handlers.len());
        for handler in handlers {
            results.push(handler.on_event(event).await);
        }
        results
    }

    /// Invoke named handlers in order, stopping at the first failure.
    pub async fn emit_event(&self, event: &NamedEvent) -> Result<(), EventError> {
        let Some(handlers) = self.named.get(&event.kind()) else {
            return Ok(());
        };

        for (index, handler) in handlers.iter().enumerate() {
            handler
                .on_named_event(event)
                .await
                .map_err(|source| EventError::Named {
                    name: event.name(),
                    index,
                    source,
                })?;
        }
        Ok(())
    }
}
