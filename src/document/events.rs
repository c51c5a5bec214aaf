//! Change and lifecycle notification.
//!
//! Delivery is message-passing: the document pushes events onto every
//! live [`Subscription`] queue synchronously, before the mutating
//! operation returns, and subscribers drain their queue whenever they
//! like. No document borrow is held during delivery, so a subscriber
//! reacting to an event may call straight back into the document.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

/// A document notification. Carries no payload; subscribers read the
/// document state they care about after draining.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentEvent {
    /// A project was created or loaded into the document.
    Created,
    /// The document was closed.
    Closed,
    /// The tree was structurally changed (one event per logical edit).
    Changed,
}

/// A subscriber's private event queue.
///
/// Dropping the subscription unsubscribes; the notifier prunes dead
/// queues on the next emission.
#[derive(Debug, Clone)]
pub struct Subscription {
    queue: Rc<RefCell<VecDeque<DocumentEvent>>>,
}

impl Subscription {
    /// Take the oldest undelivered event, if any.
    pub fn poll(&self) -> Option<DocumentEvent> {
        self.queue.borrow_mut().pop_front()
    }

    /// Take all undelivered events, oldest first.
    pub fn drain(&self) -> Vec<DocumentEvent> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }
}

/// Fan-out point owned by the document.
///
/// Also owns the edit scope: node-level edits inside one logical edit
/// are batched into a single `Changed` emission at scope exit.
#[derive(Debug, Default)]
pub(crate) struct Notifier {
    subscribers: Vec<Weak<RefCell<VecDeque<DocumentEvent>>>>,
    edit_depth: u32,
    change_pending: bool,
}

impl Notifier {
    pub fn subscribe(&mut self) -> Subscription {
        let queue = Rc::new(RefCell::new(VecDeque::new()));
        self.subscribers.push(Rc::downgrade(&queue));
        Subscription { queue }
    }

    /// Push an event to every live subscriber, pruning dropped ones.
    pub fn emit(&mut self, event: DocumentEvent) {
        self.subscribers.retain(|weak| match weak.upgrade() {
            Some(queue) => {
                queue.borrow_mut().push_back(event);
                true
            }
            None => false,
        });
    }

    // ── Edit scope ──────────────────────────────────────────────────

    /// Enter a logical edit. Scopes nest; only the outermost exit emits.
    pub fn begin_edit(&mut self) {
        self.edit_depth += 1;
    }

    /// Record a structural change inside (or outside) an edit scope.
    pub fn note_change(&mut self) {
        if self.edit_depth > 0 {
            self.change_pending = true;
        } else {
            self.emit(DocumentEvent::Changed);
        }
    }

    /// Leave a logical edit, emitting one `Changed` if anything changed.
    pub fn end_edit(&mut self) {
        debug_assert!(self.edit_depth > 0, "end_edit without begin_edit");
        self.edit_depth = self.edit_depth.saturating_sub(1);
        if self.edit_depth == 0 && self.change_pending {
            self.change_pending = false;
            self.emit(DocumentEvent::Changed);
        }
    }
}
