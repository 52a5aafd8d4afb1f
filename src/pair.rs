use std::sync::{Arc, Mutex, PoisonError};
use std::{future::Future, task::{Poll, Waker}};
use crate::{Error, Promise, WakerState};

/// This `pair::Producer` promise can only have one consumer. The consumer
/// returns a `Result<T,E>`.
///
/// If the producer is dropped before it settles, the consumer completes with
/// `Err(E::from(Error::ProducerDropped))`.
///
/// # Examples
///
/// ```
/// use promise_settle::{Promise, Error, pair::Producer};
/// use futures::executor::block_on;
/// use std::thread;
/// let (promise, consumer) = Producer::<String, Error>::new();
///
/// let task1 = thread::spawn(move || block_on(async {
///     assert_eq!(consumer.await, Ok("Hi".to_string()));
/// }));
/// promise.resolve("Hi".into());
/// task1.join().expect("The task1 thread has panicked.");
/// ```
#[derive(Debug)]
pub struct Producer<T, E> {
    promise: Arc<Mutex<Inner<T, E>>>,
}

#[derive(Debug)]
pub struct Consumer<T, E> {
    promise: Arc<Mutex<Inner<T, E>>>,
}

#[derive(Debug)]
struct Inner<T, E> {
    value: Option<Result<T, E>>,
    waker: Result<Waker, WakerState>,
}

impl<T, E> Producer<T, E> {
    fn finish(self, value: Result<T, E>) {
        let mut promise = self.promise.lock().unwrap_or_else(PoisonError::into_inner);
        promise.value = Some(value);
        if let Ok(waker) = std::mem::replace(&mut promise.waker, Err(WakerState::Tainted)) {
            waker.wake()
        }
    }
}

impl<T, E: From<Error>> Promise for Producer<T, E> {
    type Output = T;
    type Error = E;
    type Waiter = Consumer<T, E>;

    fn resolve(self, value: T) {
        self.finish(Ok(value))
    }

    fn reject(self, err: E) {
        self.finish(Err(err))
    }

    fn new() -> (Self, Consumer<T, E>) {
        let inner = Arc::new(Mutex::new(Inner {
                value: None,
                waker: Err(WakerState::Fresh),
            }));
        (Self { promise: inner.clone() }, Consumer { promise: inner })
    }
}

impl<T, E> Drop for Producer<T, E> {
    /// If this is an unsettled producer, wake the consumer so it sees the drop.
    fn drop(&mut self) {
        let mut promise = self.promise.lock().unwrap_or_else(PoisonError::into_inner);
        if let Ok(waker) = std::mem::replace(&mut promise.waker, Err(WakerState::Tainted)) {
            log::debug!("pair producer dropped unsettled, waking its consumer");
            waker.wake()
        }
    }
}

impl<T, E: From<Error>> Future for Consumer<T, E> {
    type Output = Result<T, E>;

    fn poll(
        self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Self::Output> {
        let mut promise = self.promise.lock().unwrap_or_else(PoisonError::into_inner);
        match promise.value.take() {
            Some(value) => Poll::Ready(value),
            None => {
                match std::mem::replace(&mut promise.waker, Ok(cx.waker().clone())) {
                    Err(WakerState::Tainted) => {
                        promise.waker = Err(WakerState::Tainted);
                        Poll::Ready(Err(E::from(Error::ProducerDropped)))
                    }
                    _ => Poll::Pending
                }
            }
        }
    }
}
