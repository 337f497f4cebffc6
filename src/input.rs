//! Pointer input port.
//!
//! Hosts publish viewport-relative events to a [`PointerHub`]; every
//! orchestrator holds its own [`InputSubscription`], which unsubscribes when
//! dropped, so several simulations can share one hub without stepping on
//! each other.

use glam::Vec2;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Positions are normalized to `[-1, 1]` with y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerMove(Vec2),
    PointerLeave,
    TouchStart(Vec2),
    TouchMove(Vec2),
    TouchEnd,
}

pub trait InputSource {
    fn subscribe(&self) -> InputSubscription;
}

#[derive(Debug, Default)]
struct HubInner {
    next_id: u64,
    subscribers: Vec<(u64, Sender<InputEvent>)>,
}

/// In-process broadcaster of pointer events.
#[derive(Debug, Clone, Default)]
pub struct PointerHub {
    inner: Arc<Mutex<HubInner>>,
}

impl PointerHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, event: InputEvent) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner
            .subscribers
            .retain(|(_, sender)| sender.send(event).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .subscribers
            .len()
    }
}

impl InputSource for PointerHub {
    fn subscribe(&self) -> InputSubscription {
        let (sender, receiver) = mpsc::channel();
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push((id, sender));
        log::debug!("input subscription {id} opened");

        InputSubscription {
            id,
            receiver,
            hub: Arc::downgrade(&self.inner),
        }
    }
}

#[derive(Debug)]
pub struct InputSubscription {
    id: u64,
    receiver: Receiver<InputEvent>,
    hub: Weak<Mutex<HubInner>>,
}

impl InputSubscription {
    /// Events published since the last drain, oldest first.
    pub fn drain(&self) -> impl Iterator<Item = InputEvent> + '_ {
        self.receiver.try_iter()
    }
}

impl Drop for InputSubscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            let mut inner = hub.lock().unwrap_or_else(PoisonError::into_inner);
            inner.subscribers.retain(|(id, _)| *id != self.id);
            log::debug!("input subscription {} closed", self.id);
        }
    }
}
