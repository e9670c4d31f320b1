//! Event bus.
//!
//! `publish` snapshots the handler list for the event's kind and then calls
//! each handler in subscription order, on the caller's thread. Nothing is
//! queued: with no subscribers the event is dropped. A handler that returns
//! an error or panics is logged and skipped; later handlers still run.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tokio::sync::mpsc;

use super::types::{Event, EventKind};

pub type EventHandler = Arc<dyn Fn(&Event) -> anyhow::Result<()> + Send + Sync>;

#[derive(Default)]
struct Registry {
    handlers: HashMap<EventKind, Vec<(u64, EventHandler)>>,
}

/// Cheap to clone; all clones share one registry.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

#[derive(Default)]
struct BusInner {
    registry: RwLock<Registry>,
    next_id: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub delivered: usize,
    pub failed: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> Subscription
    where
        F: Fn(&Event) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .registry
            .write()
            .handlers
            .entry(kind)
            .or_default()
            .push((id, Arc::new(handler)));
        Subscription {
            bus: Arc::downgrade(&self.inner),
            kind,
            id,
        }
    }

    /// Forward events of `kind` into an unbounded channel for async consumers.
    /// The forwarding handler only enqueues, so it never stalls the publisher.
    pub fn subscribe_channel(
        &self,
        kind: EventKind,
    ) -> (Subscription, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sub = self.subscribe(kind, move |event| {
            tx.send(event.clone())
                .map_err(|_| anyhow::anyhow!("event receiver dropped"))
        });
        (sub, rx)
    }

    pub fn publish(&self, event: &Event) -> PublishReport {
        let kind = event.kind();
        let snapshot: Vec<EventHandler> = match self.inner.registry.read().handlers.get(&kind) {
            Some(list) => list.iter().map(|(_, h)| Arc::clone(h)).collect(),
            None => Vec::new(),
        };

        let mut report = PublishReport::default();
        if snapshot.is_empty() {
            tracing::trace!(target: "modegate.bus", kind = %kind, "no subscribers, event dropped");
            return report;
        }

        for handler in snapshot {
            match catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(e)) => {
                    report.failed += 1;
                    tracing::warn!(target: "modegate.bus", kind = %kind, error = %e, "subscriber failed");
                }
                Err(panic) => {
                    report.failed += 1;
                    tracing::warn!(
                        target: "modegate.bus",
                        kind = %kind,
                        panic = %panic_message(panic.as_ref()),
                        "subscriber panicked"
                    );
                }
            }
        }
        report
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.inner
            .registry
            .read()
            .handlers
            .get(&kind)
            .map_or(0, Vec::len)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Handle returned by `subscribe`. Dropping it keeps the handler registered.
#[derive(Debug)]
pub struct Subscription {
    bus: Weak<BusInner>,
    kind: EventKind,
    id: u64,
}

impl Subscription {
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Remove the handler. Safe to call after the bus is gone.
    pub fn unsubscribe(&self) {
        let Some(bus) = self.bus.upgrade() else {
            return;
        };
        let mut registry = bus.registry.write();
        if let Some(list) = registry.handlers.get_mut(&self.kind) {
            list.retain(|(id, _)| *id != self.id);
            if list.is_empty() {
                registry.handlers.remove(&self.kind);
            }
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.inner.registry.read();
        f.debug_struct("EventBus")
            .field(
                "subscribers",
                &registry
                    .handlers
                    .iter()
                    .map(|(k, v)| (*k, v.len()))
                    .collect::<HashMap<_, _>>(),
            )
            .finish()
    }
}
