use std::sync::{Arc, Mutex, PoisonError};
use std::{future::Future, task::{Poll, Waker}};
use crate::{Error, Promise};

/// This `poly::Producer` promise can have many consumers. The consumers may be
/// cloned and every clone sees the same `Result<T,E>`, so both sides must be
/// `Clone`.
///
/// # Examples
///
/// ```
/// use promise_settle::{Promise, Error, poly::Producer};
/// use futures::executor::block_on;
/// use std::thread;
/// let (promise, consumer) = Producer::<String, Error>::new();
/// let consumer2 = consumer.clone();
/// let task1 = thread::spawn(move || block_on(async {
///     assert_eq!(consumer.await, Ok("Hi".to_string()));
/// }));
/// let task2 = thread::spawn(move || block_on(async {
///     assert_eq!(consumer2.await, Ok("Hi".to_string()));
/// }));
/// promise.resolve("Hi".into());
/// task1.join().expect("The task1 thread has panicked.");
/// task2.join().expect("The task2 thread has panicked.");
/// ```
#[derive(Debug)]
pub struct Producer<T, E> {
    promise: Arc<Mutex<Inner<T, E>>>,
}

#[derive(Debug)]
pub struct Consumer<T, E> {
    promise: Arc<Mutex<Inner<T, E>>>,
}

impl<T, E> Clone for Consumer<T, E> {
    fn clone(&self) -> Self {
        Self { promise: self.promise.clone() }
    }
}

#[derive(Debug)]
struct Inner<T, E> {
    value: Option<Arc<Result<T, E>>>,
    dropped: bool,
    waker: Vec<Waker>, // One entry per distinct waiting task, all woken on settle.
}

impl<T, E> Inner<T, E> {
    fn wake_all(&mut self) {
        for waker in self.waker.drain(..) {
            waker.wake()
        }
    }
}

impl<T, E> Producer<T, E> {
    fn finish(self, value: Result<T, E>) {
        let mut promise = self.promise.lock().unwrap_or_else(PoisonError::into_inner);
        promise.value = Some(Arc::new(value));
        promise.wake_all();
    }
}

impl<T: Clone, E: Clone + From<Error>> Promise for Producer<T, E> {
    type Output = T;
    type Error = E;
    type Waiter = Consumer<T, E>;

    fn resolve(self, value: T) {
        self.finish(Ok(value))
    }

    fn reject(self, err: E) {
        self.finish(Err(err))
    }

    /// promise.new
    ///
    /// We're not returning a clone of Self. We're returning a Consumer<T, E>
    /// which you can wait on, and clone as often as you like.
    fn new() -> (Self, Self::Waiter) {
        let producer = Self {
                            promise: Arc::new(Mutex::new(Inner {
                                value: None,
                                dropped: false,
                                waker: vec![],
                            })),
                        };
        let consumer = Consumer { promise: producer.promise.clone() };
        (producer, consumer)
    }
}

impl<T, E> Drop for Producer<T, E> {
    fn drop(&mut self) {
        let mut promise = self.promise.lock().unwrap_or_else(PoisonError::into_inner);
        if promise.value.is_none() {
            if !promise.waker.is_empty() {
                log::debug!("poly producer dropped unsettled, waking {} consumer(s)", promise.waker.len());
            }
            promise.dropped = true;
            promise.wake_all();
        }
    }
}

impl<T: Clone, E: Clone + From<Error>> Future for Consumer<T, E> {
    type Output = Result<T, E>;

    fn poll(
        self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Self::Output> {
        let mut promise = self.promise.lock().unwrap_or_else(PoisonError::into_inner);
        match promise.value {
            Some(ref value) => Poll::Ready((**value).clone()),
            None if promise.dropped => Poll::Ready(Err(E::from(Error::ProducerDropped))),
            None => {
                if !promise.waker.iter().any(|waker| waker.will_wake(cx.waker())) {
                    promise.waker.push(cx.waker().clone());
                }
                Poll::Pending
            }
        }
    }
}
