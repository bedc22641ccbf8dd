use super::{DeliveryError, MirrorTarget};
use crate::protocol::DependentMessage;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug)]
struct MirrorState {
    count: Cell<u32>,
    loaded: Cell<bool>,
    writable: Cell<bool>,
    received: RefCell<Vec<DependentMessage>>,
}

/// In-memory dependent context for testing.
///
/// Clones share state, so a test can register one clone with a [`super::Notifier`]
/// and inspect the other.
#[derive(Debug, Clone)]
pub struct MemMirror {
    name: String,
    state: Rc<MirrorState>,
}

impl MemMirror {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Rc::new(MirrorState {
                count: Cell::new(0),
                loaded: Cell::new(true),
                writable: Cell::new(true),
                received: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn count(&self) -> u32 {
        self.state.count.get()
    }

    pub fn set_count(&self, count: u32) {
        self.state.count.set(count);
    }

    /// The dependent counts a reply locally, as the page-side interceptor does.
    pub fn bump(&self) -> u32 {
        let next = self.count().saturating_add(1);
        self.set_count(next);
        next
    }

    /// Unloaded dependents cannot receive messages.
    pub fn set_loaded(&self, loaded: bool) {
        self.state.loaded.set(loaded);
    }

    /// Unwritable dependents reject the direct-write fallback.
    pub fn set_writable(&self, writable: bool) {
        self.state.writable.set(writable);
    }

    pub fn received(&self) -> Vec<DependentMessage> {
        self.state.received.borrow().clone()
    }
}

impl MirrorTarget for MemMirror {
    fn name(&self) -> &str {
        &self.name
    }

    fn deliver(&self, message: &DependentMessage) -> Result<(), DeliveryError> {
        if !self.state.loaded.get() {
            return Err(DeliveryError::NotLoaded(self.name.clone()));
        }
        self.state.received.borrow_mut().push(message.clone());
        match message {
            DependentMessage::ResetLocal => self.set_count(0),
        }
        Ok(())
    }

    fn zero_mirror(&self) -> Result<(), DeliveryError> {
        if !self.state.writable.get() {
            return Err(DeliveryError::Missing(self.name.clone()));
        }
        self.set_count(0);
        Ok(())
    }
}
