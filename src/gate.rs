//! One-shot completion latch

use crate::{Reply, Result};

/// Boxed completion callback delivered through the gate.
pub(crate) type Callback = Box<dyn FnOnce(Result<Reply>) + Send + 'static>;

/// One-shot latch around the completion callback.
///
/// Terminal signals (request error, response error, response end, abort) race
/// toward the gate; the first `fire` consumes the callback and every later
/// one is rejected. Only touched from the dispatch task, so a plain `Option`
/// is enough.
pub(crate) struct DeliveryGate {
    callback: Option<Callback>,
}

impl DeliveryGate {
    pub(crate) fn new(callback: Callback) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    /// Deliver `outcome` unless something already has been delivered.
    /// Returns whether this call won the race.
    pub(crate) fn fire(&mut self, outcome: Result<Reply>) -> bool {
        match self.callback.take() {
            Some(callback) => {
                callback(outcome);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn fires_at_most_once() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let mut gate = DeliveryGate::new(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        assert!(gate.fire(Err(Error::EmptyTarget)));
        assert!(!gate.fire(Err(Error::Aborted)));
        assert!(!gate.fire(Err(Error::Aborted)));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
