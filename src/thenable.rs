//! The two-callback protocol: anything that can be handed a resolve handle and
//! a reject handle and eventually calls one of them.
//!
//! Both handles point at the same slot. Whichever is called first takes the
//! producer out of it and settles the promise; later calls find the slot empty
//! and do nothing.
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, PoisonError};

use crate::Promise;

type Slot<P> = Arc<Mutex<Option<P>>>;

fn take<P>(slot: &Slot<P>) -> Option<P> {
    slot.lock().unwrap_or_else(PoisonError::into_inner).take()
}

/// Fulfills the shared promise, unless it was already settled.
pub struct Resolve<P> {
    slot: Slot<P>,
}

/// Rejects the shared promise, unless it was already settled.
pub struct Reject<P> {
    slot: Slot<P>,
}

impl<P: Promise> Resolve<P> {
    pub fn resolve(&self, value: P::Output) {
        match take(&self.slot) {
            Some(producer) => producer.resolve(value),
            None => log::trace!("resolve ignored, promise already settled"),
        }
    }
}

impl<P: Promise> Reject<P> {
    pub fn reject(&self, reason: P::Error) {
        match take(&self.slot) {
            Some(producer) => producer.reject(reason),
            None => log::trace!("reject ignored, promise already settled"),
        }
    }
}

impl<P> Clone for Resolve<P> {
    fn clone(&self) -> Self {
        Self { slot: self.slot.clone() }
    }
}

impl<P> Clone for Reject<P> {
    fn clone(&self) -> Self {
        Self { slot: self.slot.clone() }
    }
}

impl<P> fmt::Debug for Resolve<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolve").finish_non_exhaustive()
    }
}

impl<P> fmt::Debug for Reject<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reject").finish_non_exhaustive()
    }
}

/// Split a producer into its resolve/reject handles.
pub(crate) fn resolvers<P>(producer: P) -> (Resolve<P>, Reject<P>) {
    let slot = Arc::new(Mutex::new(Some(producer)));
    (Resolve { slot: slot.clone() }, Reject { slot })
}

/// A thenable for promise family `P`: a closure that receives the resolve
/// and reject handles. It runs once, when it is coerced into a promise.
///
/// The handles may outlive the closure, e.g. by moving them into a thread.
/// If every handle is dropped without being called, the producer is dropped
/// with them and the family reports
/// [`ProducerDropped`](crate::Error::ProducerDropped).
///
/// # Examples
///
/// ```
/// use promise_settle::{prelude::*, pair::Producer, Error, Outcome};
/// use futures::executor::block_on;
///
/// type Family = Producer<u32, Error>;
/// let thenable = Family::thenable(|resolve, _reject| resolve.resolve(42));
/// assert_eq!(block_on(Family::settle(thenable)), Outcome::Fulfilled { value: 42 });
/// ```
pub struct Thenable<P, F> {
    then: F,
    family: PhantomData<fn() -> P>,
}

impl<P, F> Thenable<P, F>
where
    P: Promise,
    F: FnOnce(Resolve<P>, Reject<P>),
{
    pub fn new(then: F) -> Self {
        Self { then, family: PhantomData }
    }

    /// Hands the handles of `producer` to the closure.
    pub(crate) fn then(self, producer: P) {
        let (resolve, reject) = resolvers(producer);
        (self.then)(resolve, reject)
    }
}

impl<P, F> fmt::Debug for Thenable<P, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thenable").finish_non_exhaustive()
    }
}
