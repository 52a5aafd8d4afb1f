#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use promise_settle::{
        pair, poly, prelude::*, settle, Error, Outcome, Own, Reject, Resolve, Settle, Status,
    };
    use std::{
        future::Future,
        pin::Pin,
        sync::Arc,
        task::{Context, Poll},
        thread,
        time::Duration,
    };

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// A rejection reason with identity, so tests can check that the very
    /// same instance comes back.
    #[derive(Debug, Clone)]
    struct Oops(Arc<str>);

    impl Oops {
        fn new() -> Self {
            Oops(Arc::from("oops"))
        }

        fn is(&self, other: &Oops) -> bool {
            Arc::ptr_eq(&self.0, &other.0)
        }
    }

    impl From<Error> for Oops {
        fn from(err: Error) -> Self {
            Oops(Arc::from(err.to_string()))
        }
    }

    type Family = pair::Producer<i32, Oops>;

    fn rejected_reason(outcome: Outcome<i32, Oops>) -> Oops {
        assert_eq!(outcome.status(), Status::Rejected);
        outcome.reason().cloned().expect("rejected outcome carries a reason")
    }

    #[test]
    fn test_settle_fulfilled_promise() {
        init_logger();
        let (promise, consumer) = Family::new();
        promise.resolve(42);
        let outcome = block_on(settle(consumer));
        assert_eq!(outcome.value(), Some(&42));
        assert_eq!(outcome.status(), Status::Fulfilled);
    }

    #[test]
    fn test_settle_rejected_promise() {
        init_logger();
        let error = Oops::new();
        let (promise, consumer) = Family::new();
        promise.reject(error.clone());
        let reason = rejected_reason(block_on(settle(consumer)));
        assert!(reason.is(&error));
    }

    #[test]
    fn test_settle_plain_value() {
        init_logger();
        let outcome = block_on(settle(Ok::<i32, Oops>(42)));
        assert_eq!(outcome.value(), Some(&42));
    }

    #[test]
    fn test_thenable_that_fulfills() {
        init_logger();
        let thenable = Family::thenable(|resolve, _reject| resolve.resolve(42));
        let outcome = block_on(settle(thenable));
        assert_eq!(outcome.value(), Some(&42));
    }

    #[test]
    fn test_thenable_that_rejects() {
        init_logger();
        let error = Oops::new();
        let sent = error.clone();
        let thenable = Family::thenable(move |_resolve, reject| reject.reject(sent));
        let reason = rejected_reason(block_on(settle(thenable)));
        assert!(reason.is(&error));
    }

    #[test]
    fn test_thenable_resolving_later_from_a_thread() {
        init_logger();
        let thenable = Family::thenable(|resolve: Resolve<Family>, reject: Reject<Family>| {
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(50));
                resolve.resolve(42);
                reject.reject(Oops::new());
            });
        });
        let outcome = block_on(Family::settle(thenable));
        assert_eq!(outcome.value(), Some(&42));
    }

    #[test]
    fn test_never_rejects() {
        init_logger();
        let (promise, consumer) = Family::new();
        let task = thread::spawn(move || block_on(consumer.settle()));
        promise.reject(Oops::new());
        // The output is an Outcome, there is no error to handle.
        let outcome: Outcome<i32, Oops> = task.join().expect("The task thread has panicked");
        assert!(outcome.is_rejected());
    }

    #[test]
    fn test_poly_consumers_settle_independently() {
        init_logger();
        type Shared = poly::Producer<i32, Oops>;
        let (promise, consumer) = Shared::new();
        let first = Shared::settle(consumer.clone());
        let second = Shared::settle(consumer);
        let task1 = thread::spawn(move || block_on(first));
        let task2 = thread::spawn(move || block_on(second));
        promise.resolve(7);
        for task in [task1, task2] {
            let outcome = task.join().expect("The task thread has panicked");
            assert_eq!(outcome.value(), Some(&7));
        }
    }

    /// A family of its own that reuses `pair` underneath, the way a subtype
    /// reuses its parent.
    struct Counted(pair::Producer<i32, Oops>);

    struct CountedConsumer(pair::Consumer<i32, Oops>);

    impl Future for CountedConsumer {
        type Output = Result<i32, Oops>;

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
            Pin::new(&mut self.0).poll(cx)
        }
    }

    impl Promise for Counted {
        type Output = i32;
        type Error = Oops;
        type Waiter = CountedConsumer;

        fn new() -> (Self, CountedConsumer) {
            let (producer, consumer) = pair::Producer::new();
            (Counted(producer), CountedConsumer(consumer))
        }

        fn resolve(self, value: i32) {
            self.0.resolve(value + 1)
        }

        fn reject(self, err: Oops) {
            self.0.reject(err)
        }
    }

    #[test]
    fn test_settle_through_own_family() {
        init_logger();
        let settled: Settle<CountedConsumer> = Counted::settle(Ok(41));
        assert_eq!(block_on(settled).value(), Some(&42));
        let thenable = Counted::thenable(|resolve, _reject| resolve.resolve(1));
        assert_eq!(block_on(Counted::settle(thenable)).value(), Some(&2));
    }

    #[test]
    fn test_settle_own_family_waiter() {
        init_logger();
        let waiter: CountedConsumer = Counted::resolve_from(Ok(41));
        let settled: Settle<CountedConsumer> = Counted::settle(Own(waiter));
        assert_eq!(block_on(settled).value(), Some(&42));
    }

    #[test]
    fn test_io_error_as_reason() {
        init_logger();
        type Io = pair::Producer<u32, std::io::Error>;
        let (promise, consumer) = Io::new();
        drop(promise);
        let outcome = block_on(Io::settle(consumer));
        let reason = outcome.reason().expect("dropped producer rejects");
        assert_eq!(reason.kind(), std::io::ErrorKind::BrokenPipe);
        assert!(reason.to_string().contains("dropped"));
    }

    /// A family that already has a `settle` of its own.
    struct Preinstalled(pair::Producer<i32, Oops>);

    impl Preinstalled {
        fn settle(_value: Result<i32, Oops>) -> &'static str {
            "preinstalled"
        }
    }

    impl Promise for Preinstalled {
        type Output = i32;
        type Error = Oops;
        type Waiter = pair::Consumer<i32, Oops>;

        fn new() -> (Self, Self::Waiter) {
            let (producer, consumer) = pair::Producer::new();
            (Preinstalled(producer), consumer)
        }

        fn resolve(self, value: i32) {
            self.0.resolve(value)
        }

        fn reject(self, err: Oops) {
            self.0.reject(err)
        }
    }

    #[test]
    fn test_existing_settle_is_left_alone() {
        init_logger();
        assert_eq!(Preinstalled::settle(Ok(1)), "preinstalled");
        let outcome = block_on(<Preinstalled as SettleFamily>::settle(Ok(1)));
        assert_eq!(outcome.value(), Some(&1));
    }

    #[test]
    fn test_outcome_back_to_result() {
        init_logger();
        let result: Result<i32, Oops> = block_on(settle(Ok::<i32, Oops>(5))).into();
        assert_eq!(result.ok(), Some(5));
    }
}
