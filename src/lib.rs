//! Observe how a promise ends without ever failing.
//!
//! [`settle`] takes a value, coerces it into a promise of some family and
//! returns a future that always completes with an [`Outcome`]: either
//! `Fulfilled { value }` or `Rejected { reason }`. A rejection of the input is
//! turned into data, so awaiting a [`Settle`] never needs an error path.
//!
//! ```
//! use promise_settle::{prelude::*, pair::Producer, settle, Error, Outcome};
//! use futures::executor::block_on;
//!
//! let (promise, consumer) = Producer::<u32, Error>::new();
//! promise.reject(Error::ProducerDropped);
//! let outcome = block_on(settle(consumer));
//! assert_eq!(outcome, Outcome::Rejected { reason: Error::ProducerDropped });
//! ```
use std::future::Future;

pub mod outcome;
pub mod pair;
pub mod poly;
pub mod settle;
pub mod thenable;

pub use outcome::{Outcome, Status};
pub use settle::{settle, settle_future, Own, Resolvable, Settle, SettleExt, SettleFamily};
pub use thenable::{Reject, Resolve, Thenable};

/// Everything needed for method syntax: `P::settle(..)`, `fut.settle()`,
/// `producer.resolve(..)`.
pub mod prelude {
    pub use crate::settle::{SettleExt, SettleFamily};
    pub use crate::Promise;
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("the producer was dropped before settling its promise")]
    ProducerDropped,
}

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        std::io::Error::new(std::io::ErrorKind::BrokenPipe, err)
    }
}

#[derive(Debug)]
enum WakerState {
    Fresh,
    Tainted,
}

/// A promise family: the capability to build a fresh producer/waiter pair
/// and settle it.
///
/// The producer side is consumed by [`resolve`](Promise::resolve) and
/// [`reject`](Promise::reject), so it can settle at most once.
pub trait Promise {
    type Output;
    type Error;
    type Waiter: Future<Output = Result<Self::Output, Self::Error>>;

    fn new() -> (Self, Self::Waiter)
    where
        Self: Sized;
    fn resolve(self, value: Self::Output);
    fn reject(self, err: Self::Error);
}
