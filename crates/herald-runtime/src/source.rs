//! Event-source consumption loop.
//!
//! The queue consumer is an external collaborator: it owns the broker
//! connection, message acknowledgment, and redelivery. [`EventSource`] is
//! the narrow boundary Herald needs from it (one decoded event per
//! call), and [`Listener`] is the loop that feeds those events into a
//! [`Dispatcher`].
//!
//! Failure policy of the loop: a dispatch error (malformed event, or a
//! propagated handler failure under a strict [`DispatchPolicy`]) is
//! logged with the failing event and consumption continues; whether the
//! message is redelivered is the queue's contract, not this loop's. A
//! source error ends the run, since it means the collaborator itself
//! broke.
//!
//! [`DispatchPolicy`]: herald_core::DispatchPolicy
//!
//! # Example
//!
//! ```rust,ignore
//! use herald_runtime::source::Listener;
//!
//! let listener = Listener::new(dispatcher);
//! listener.run_until_shutdown(consumer).await?;
//! ```

use async_trait::async_trait;
use tracing::{error, info};

use crate::error::{RuntimeError, RuntimeResult};
use herald_core::{BoxError, Dispatcher, Event};

/// The boundary to the external queue consumer.
#[async_trait]
pub trait EventSource: Send {
    /// Pulls the next decoded event, or `None` when the stream ends.
    async fn next_event(&mut self) -> Result<Option<Event>, BoxError>;
}

/// Drives an [`EventSource`] into a [`Dispatcher`], one event at a time.
pub struct Listener {
    dispatcher: Dispatcher,
}

impl Listener {
    /// Creates a listener around a configured dispatcher.
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Returns the wrapped dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Consumes `source` until it ends or fails.
    pub async fn run<S: EventSource>(&self, mut source: S) -> RuntimeResult<()> {
        info!("starting to consume events");

        loop {
            match source.next_event().await {
                Ok(Some(event)) => {
                    if let Err(err) = self.dispatcher.dispatch(event).await {
                        error!(error = %err, "event dispatch failed");
                    }
                }
                Ok(None) => {
                    info!("event stream ended");
                    return Ok(());
                }
                Err(err) => return Err(RuntimeError::Source(err)),
            }
        }
    }

    /// Runs until the source ends or the process receives Ctrl-C.
    pub async fn run_until_shutdown<S: EventSource>(&self, source: S) -> RuntimeResult<()> {
        tokio::select! {
            result = self.run(source) => result,
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received, stopping consumer");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::{DispatchPolicy, Event, HandlerRegistry, handler};
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Yields a scripted sequence of results, then ends the stream.
    struct Scripted {
        deliveries: Vec<Result<Option<Event>, BoxError>>,
    }

    impl Scripted {
        fn new(mut deliveries: Vec<Result<Option<Event>, BoxError>>) -> Self {
            deliveries.reverse();
            Self { deliveries }
        }
    }

    #[async_trait]
    impl EventSource for Scripted {
        async fn next_event(&mut self) -> Result<Option<Event>, BoxError> {
            self.deliveries.pop().unwrap_or(Ok(None))
        }
    }

    fn listener_recording(policy: DispatchPolicy) -> (Listener, Arc<Mutex<Vec<String>>>) {
        let log: Arc<Mutex<Vec<String>>> = Arc::default();
        let log_clone = Arc::clone(&log);

        let registry = HandlerRegistry::builder()
            .on(
                "order.created",
                handler("record", move |event: Arc<Event>| {
                    let log = Arc::clone(&log_clone);
                    async move {
                        let id = event.get("id").cloned();
                        log.lock().push(format!("{id:?}"));
                    }
                }),
            )
            .build();

        let listener = Listener::new(Dispatcher::new(Arc::new(registry), policy));
        (listener, log)
    }

    #[tokio::test]
    async fn drains_the_source_and_dispatches_every_event() {
        let (listener, log) = listener_recording(DispatchPolicy::LENIENT);
        assert_eq!(listener.dispatcher().policy(), DispatchPolicy::LENIENT);

        let source = Scripted::new(vec![
            Ok(Some(Event::new("order.created").with("id", 1))),
            Ok(Some(Event::new("order.shipped"))),
            Ok(Some(Event::new("order.created").with("id", 2))),
            Ok(None),
        ]);

        listener.run(source).await.unwrap();

        assert_eq!(log.lock().len(), 2);
    }

    #[tokio::test]
    async fn dispatch_failures_do_not_stop_consumption() {
        let (listener, log) = listener_recording(DispatchPolicy::STRICT);

        let source = Scripted::new(vec![
            // Malformed under the strict policy; logged and dropped.
            Ok(Some(Event::untyped().with("payload", "junk"))),
            Ok(Some(Event::new("order.created").with("id", 7))),
            Ok(None),
        ]);

        listener.run(source).await.unwrap();

        assert_eq!(log.lock().len(), 1);
    }

    #[tokio::test]
    async fn source_failure_ends_the_run() {
        let (listener, log) = listener_recording(DispatchPolicy::LENIENT);

        let source = Scripted::new(vec![
            Ok(Some(Event::new("order.created").with("id", 1))),
            Err("connection reset".into()),
        ]);

        let err = listener.run(source).await.unwrap_err();

        assert!(matches!(err, RuntimeError::Source(_)));
        assert_eq!(log.lock().len(), 1);
    }
}
