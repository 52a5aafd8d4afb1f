//! Settling: coerce a value into a promise of some family, then turn its
//! `Result` into an [`Outcome`] so the returned future cannot fail.
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use pin_project::pin_project;

use crate::{pair, poly, thenable::Thenable, Error, Outcome, Promise};

/// Values that can be coerced into a waiter of promise family `P`.
///
/// - `Result<T, E>` is an already-known plain value: `Ok` resolves the new
///   promise, `Err` rejects it.
/// - A waiter that already belongs to `P` is returned as is. The built-in
///   families accept their consumers directly; any family accepts its own
///   waiter wrapped in [`Own`].
/// - A [`Thenable`] gets a fresh promise of family `P` and is handed its
///   resolve/reject handles.
pub trait Resolvable<P: Promise> {
    fn into_waiter(self) -> P::Waiter;
}

impl<P: Promise> Resolvable<P> for Result<P::Output, P::Error> {
    fn into_waiter(self) -> P::Waiter {
        let (producer, waiter) = P::new();
        match self {
            Ok(value) => producer.resolve(value),
            Err(reason) => producer.reject(reason),
        }
        waiter
    }
}

impl<T, E: From<Error>> Resolvable<pair::Producer<T, E>> for pair::Consumer<T, E> {
    fn into_waiter(self) -> pair::Consumer<T, E> {
        self
    }
}

impl<T: Clone, E: Clone + From<Error>> Resolvable<poly::Producer<T, E>> for poly::Consumer<T, E> {
    fn into_waiter(self) -> poly::Consumer<T, E> {
        self
    }
}

/// A waiter already of family `P`, passed through coercion untouched.
///
/// # Examples
///
/// ```
/// use promise_settle::{prelude::*, pair::Producer, Error, Outcome, Own};
/// use futures::executor::block_on;
///
/// type Family = Producer<u32, Error>;
/// let waiter = Family::resolve_from(Ok(42));
/// assert_eq!(block_on(Family::settle(Own(waiter))), Outcome::Fulfilled { value: 42 });
/// ```
#[derive(Debug)]
pub struct Own<W>(pub W);

impl<P: Promise> Resolvable<P> for Own<P::Waiter> {
    fn into_waiter(self) -> P::Waiter {
        self.0
    }
}

impl<P, F> Resolvable<P> for Thenable<P, F>
where
    P: Promise,
    F: FnOnce(crate::Resolve<P>, crate::Reject<P>),
{
    fn into_waiter(self) -> P::Waiter {
        let (producer, waiter) = P::new();
        self.then(producer);
        waiter
    }
}

/// Future for [`settle`], [`SettleFamily::settle`] and [`SettleExt::settle`].
///
/// Completes with [`Outcome::Fulfilled`] or [`Outcome::Rejected`] once the
/// inner future completes, and never with anything else. If the inner future
/// never completes, neither does this one.
#[derive(Debug)]
#[must_use = "futures do nothing unless you `.await` or poll them"]
#[pin_project]
pub struct Settle<F> {
    #[pin]
    inner: F,
}

impl<F> Settle<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }

    /// The awaitable being settled, after coercion.
    pub fn get_ref(&self) -> &F {
        &self.inner
    }

    pub fn into_inner(self) -> F {
        self.inner
    }
}

impl<F, T, E> Future for Settle<F>
where
    F: Future<Output = Result<T, E>>,
{
    type Output = Outcome<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.project().inner.poll(cx).map(|result| {
            let outcome = Outcome::from(result);
            log::trace!("settled: {}", outcome.status());
            outcome
        })
    }
}

/// Settle support for every promise family. Blanket-implemented, so any type
/// implementing [`Promise`] has it.
///
/// A family that defines its own inherent `settle` keeps it: inherent
/// associated functions take precedence over this trait's.
///
/// # Examples
///
/// ```
/// use promise_settle::{prelude::*, poly::Producer, Error, Outcome};
/// use futures::executor::block_on;
///
/// type Family = Producer<u32, Error>;
/// let settled = Family::settle(Ok(42));
/// assert_eq!(block_on(settled), Outcome::Fulfilled { value: 42 });
/// ```
pub trait SettleFamily: Promise + Sized {
    /// Coerce `value` into a waiter of this family.
    fn resolve_from<V: Resolvable<Self>>(value: V) -> Self::Waiter {
        value.into_waiter()
    }

    /// Build a thenable bound to this family.
    fn thenable<F>(then: F) -> Thenable<Self, F>
    where
        F: FnOnce(crate::Resolve<Self>, crate::Reject<Self>),
    {
        Thenable::new(then)
    }

    /// Coerce `value` into this family and settle it.
    fn settle<V: Resolvable<Self>>(value: V) -> Settle<Self::Waiter> {
        Settle::new(Self::resolve_from(value))
    }
}

impl<P: Promise> SettleFamily for P {}

/// Settle any future that yields a `Result`.
pub trait SettleExt: Future {
    fn settle(self) -> Settle<Self>
    where
        Self: Sized,
    {
        Settle::new(self)
    }
}

impl<F, T, E> SettleExt for F where F: Future<Output = Result<T, E>> {}

/// Standalone settle through the default [`pair`] family.
///
/// # Examples
///
/// ```
/// use promise_settle::{settle, Error, Outcome};
/// use futures::executor::block_on;
///
/// let outcome = block_on(settle(Ok::<u32, Error>(42)));
/// assert_eq!(outcome, Outcome::Fulfilled { value: 42 });
/// ```
pub fn settle<T, E, V>(value: V) -> Settle<pair::Consumer<T, E>>
where
    E: From<Error>,
    V: Resolvable<pair::Producer<T, E>>,
{
    pair::Producer::<T, E>::settle(value)
}

/// Standalone settle of a foreign future, no coercion needed.
pub fn settle_future<F, T, E>(future: F) -> Settle<F>
where
    F: Future<Output = Result<T, E>>,
{
    Settle::new(future)
}
