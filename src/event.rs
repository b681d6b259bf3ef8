//! In-process event bus with scoped subscriptions.
//!
//! DESIGN
//! ======
//! The bus keeps one channel sender per live subscriber. `publish` fans an
//! event out to every sender; each [`Subscription`] drains its own receiver
//! when its owner is ready to handle events. Dropping a `Subscription`
//! removes its sender from the bus, so a torn-down canvas can never receive
//! callbacks, whichever way it was torn down.
//!
//! Everything here is single-threaded (`Rc`), matching the one UI thread that
//! owns canvas state.

#[cfg(test)]
#[path = "event_test.rs"]
mod event_test;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::mpsc;

use crate::canvas::CanvasId;
use crate::display::DisplayId;
use crate::tool::Tool;
use crate::view::DataViewId;

/// Identifier for a live subscription.
pub type SubscriberId = u64;

/// Events the display layer publishes to its viewers.
#[derive(Clone)]
pub enum DisplayEvent {
    /// A data view's selection flag flipped on.
    DataViewSelected { display: DisplayId, view: DataViewId },
    /// A data view's selection flag flipped off.
    DataViewDeselected { display: DisplayId, view: DataViewId },
    /// A canvas model changed its pan, zoom, or viewport size.
    PanZoom { canvas: CanvasId },
    /// The canvas model's cursor changed.
    MouseCursor { canvas: CanvasId },
    /// A new tool became active.
    ToolActivated { tool: Rc<dyn Tool> },
    /// A display is being torn down.
    DisplayDeleted { display: DisplayId },
}

impl fmt::Debug for DisplayEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataViewSelected { display, view } => {
                f.debug_struct("DataViewSelected").field("display", display).field("view", view).finish()
            }
            Self::DataViewDeselected { display, view } => {
                f.debug_struct("DataViewDeselected").field("display", display).field("view", view).finish()
            }
            Self::PanZoom { canvas } => f.debug_struct("PanZoom").field("canvas", canvas).finish(),
            Self::MouseCursor { canvas } => f.debug_struct("MouseCursor").field("canvas", canvas).finish(),
            Self::ToolActivated { tool } => f.debug_struct("ToolActivated").field("tool", &tool.name()).finish(),
            Self::DisplayDeleted { display } => f.debug_struct("DisplayDeleted").field("display", display).finish(),
        }
    }
}

type Senders = RefCell<HashMap<SubscriberId, mpsc::Sender<DisplayEvent>>>;

/// Cheaply clonable handle to a shared bus.
#[derive(Clone, Default)]
pub struct EventBus {
    senders: Rc<Senders>,
    next_id: Rc<Cell<SubscriberId>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber. Events published from now on are queued
    /// for it until the returned guard is dropped.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let (tx, rx) = mpsc::channel();
        self.senders.borrow_mut().insert(id, tx);
        Subscription { id, rx, senders: Rc::downgrade(&self.senders) }
    }

    /// Deliver `event` to every live subscriber.
    pub fn publish(&self, event: DisplayEvent) {
        let mut senders = self.senders.borrow_mut();
        let mut dead = Vec::new();
        for (id, tx) in senders.iter() {
            if tx.send(event.clone()).is_err() {
                dead.push(*id);
            }
        }
        for id in dead {
            senders.remove(&id);
        }
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.senders.borrow().len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus").field("subscribers", &self.subscriber_count()).finish()
    }
}

/// A live registration on an [`EventBus`]. Unsubscribes on drop.
pub struct Subscription {
    id: SubscriberId,
    rx: mpsc::Receiver<DisplayEvent>,
    senders: Weak<Senders>,
}

impl Subscription {
    #[must_use]
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Take every event queued since the last drain, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<DisplayEvent> {
        self.rx.try_iter().collect()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(senders) = self.senders.upgrade() {
            senders.borrow_mut().remove(&self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish_non_exhaustive()
    }
}
