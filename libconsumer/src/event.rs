//! Advisory reporting.
//!
//! Advisories are Kubernetes-style events attached to the owning
//! StorageCluster.  The [`EventSink`] trait is the delivery seam; the
//! [`EventRecorder`] wraps a sink and suppresses repeats of the advisory
//! already reported for an owner while its condition persists.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Kubernetes event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// Informational, not an error.
    Normal,
    /// Something the operator should act on.
    Warning,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("Normal"),
            Self::Warning => f.write_str("Warning"),
        }
    }
}

/// Identifies the object an event is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub name: String,
    pub namespace: String,
    pub uid: String,
}

/// Destination for advisories.
pub trait EventSink: Send + Sync {
    /// Deliver one event for `object`.
    fn emit(&self, object: &ObjectRef, event_type: EventType, reason: &str, message: &str);
}

/// Sink that writes events to the `tracing` log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, object: &ObjectRef, event_type: EventType, reason: &str, message: &str) {
        match event_type {
            EventType::Normal => {
                info!(name = %object.name, namespace = %object.namespace, %reason, "{message}")
            }
            EventType::Warning => {
                warn!(name = %object.name, namespace = %object.namespace, %reason, "{message}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Reported {
    event_type: EventType,
    reason: String,
    message: String,
}

/// Deduplicating front for an [`EventSink`].
///
/// The last advisory reported per owner (keyed by uid) is remembered; an
/// identical `(type, reason, message)` for the same owner is dropped until
/// either a different advisory is reported or [`EventRecorder::forget`] is
/// called for that owner.
pub struct EventRecorder {
    sink: Arc<dyn EventSink>,
    last: DashMap<String, Reported>,
}

impl EventRecorder {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            last: DashMap::new(),
        }
    }

    /// Emit the event unless it repeats the last one reported for `object`.
    ///
    /// Returns `true` when the event reached the sink.
    pub fn report_if_not_present(
        &self,
        object: &ObjectRef,
        event_type: EventType,
        reason: &str,
        message: &str,
    ) -> bool {
        let reported = Reported {
            event_type,
            reason: reason.to_owned(),
            message: message.to_owned(),
        };
        match self.last.entry(object.uid.clone()) {
            Entry::Occupied(mut last) => {
                if *last.get() == reported {
                    return false;
                }
                last.insert(reported);
            }
            Entry::Vacant(slot) => {
                slot.insert(reported);
            }
        }
        self.sink.emit(object, event_type, reason, message);
        true
    }

    /// Drop the dedup memory for the owner with `uid`, so its next advisory
    /// is delivered even if it repeats an earlier one.
    pub fn forget(&self, uid: &str) {
        self.last.remove(uid);
    }
}

impl fmt::Debug for EventRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRecorder")
            .field("tracked", &self.last.len())
            .finish()
    }
}
