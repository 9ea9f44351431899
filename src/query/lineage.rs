//! Shared consumption state for a chain of queries.
//!
//! Every query derived from another through an intermediate operation holds
//! the same `Rc<Lineage>`. Consuming any member of the lineage consumes all
//! of them, and close callbacks registered anywhere in the chain run once,
//! in registration order.
//!
//! The lineage also carries a fault slot. Engine errors discovered while a
//! chain is being assembled or pulled are recorded here and reported by the
//! terminal operation, which keeps intermediate operations infallible.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, trace};

use crate::error::QueryError;

type CloseCallback<'a> = Box<dyn FnOnce() + 'a>;

pub(crate) struct Lineage<'a> {
    consumed: Cell<bool>,
    callbacks: RefCell<Vec<CloseCallback<'a>>>,
    fault: RefCell<Option<QueryError>>,
}

impl<'a> Lineage<'a> {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self {
            consumed: Cell::new(false),
            callbacks: RefCell::new(Vec::new()),
            fault: RefCell::new(None),
        })
    }

    pub(crate) fn is_consumed(&self) -> bool {
        self.consumed.get()
    }

    pub(crate) fn ensure_open(&self) -> Result<(), QueryError> {
        if self.is_consumed() {
            Err(QueryError::AlreadyConsumed)
        } else {
            Ok(())
        }
    }

    pub(crate) fn register(&self, callback: CloseCallback<'a>) {
        let mut callbacks = self.callbacks.borrow_mut();
        callbacks.push(callback);
        trace!(registered = callbacks.len(), "close callback registered");
    }

    /// Records `error` unless an earlier fault is already pending.
    pub(crate) fn fail(&self, error: QueryError) {
        let mut fault = self.fault.borrow_mut();
        if fault.is_none() {
            debug!(%error, "query fault recorded");
            *fault = Some(error);
        }
    }

    pub(crate) fn has_fault(&self) -> bool {
        self.fault.borrow().is_some()
    }

    pub(crate) fn take_fault(&self) -> Option<QueryError> {
        self.fault.borrow_mut().take()
    }

    /// Marks the lineage consumed and runs pending callbacks in registration order.
    pub(crate) fn close(&self) {
        self.consumed.set(true);
        let callbacks = std::mem::take(&mut *self.callbacks.borrow_mut());
        debug!(callbacks = callbacks.len(), "closing query lineage");
        for callback in callbacks {
            callback();
        }
    }

    /// Takes over another lineage's pending callbacks and consumes it.
    ///
    /// A lineage that was already consumed cannot be absorbed; the attempt is
    /// recorded as a fault on `self` and `false` is returned.
    pub(crate) fn absorb(&self, other: &Self) -> bool {
        if other.is_consumed() {
            self.fail(QueryError::AlreadyConsumed);
            return false;
        }
        other.consumed.set(true);
        let pending = std::mem::take(&mut *other.callbacks.borrow_mut());
        trace!(callbacks = pending.len(), "absorbing query lineage");
        self.callbacks.borrow_mut().extend(pending);
        true
    }

    /// Moves a pending fault from `other` into `self`.
    pub(crate) fn inherit_fault(&self, other: &Self) {
        if let Some(error) = other.take_fault() {
            self.fail(error);
        }
    }
}

impl Drop for Lineage<'_> {
    fn drop(&mut self) {
        if !self.consumed.get() && !self.callbacks.get_mut().is_empty() {
            debug!("query lineage dropped before consumption");
            self.close();
        }
    }
}
