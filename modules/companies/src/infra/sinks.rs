//! Notification sinks for resource events.

use std::sync::Arc;

use async_trait::async_trait;
use gatekit::{NotificationSink, NotifyError, ResourceEvent};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{info, trace};

/// Writes every event as one JSON line at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingSink;

#[async_trait]
impl<E> NotificationSink<E> for LoggingSink
where
    E: Serialize + Send + Sync,
{
    async fn send(&self, event: &ResourceEvent<E>) -> Result<(), NotifyError> {
        let payload =
            serde_json::to_string(event).map_err(|e| NotifyError::Encode(e.to_string()))?;
        info!(operation = %event.operation, event = %payload, "resource event");
        Ok(())
    }
}

/// In-process fan-out over a `tokio` broadcast channel.
///
/// Sending with no live subscriber succeeds; slow subscribers lag and drop
/// the oldest events rather than blocking the sender.
#[derive(Debug)]
pub struct BroadcastSink<E> {
    tx: broadcast::Sender<ResourceEvent<E>>,
}

impl<E> Clone for BroadcastSink<E> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<E: Clone> BroadcastSink<E> {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ResourceEvent<E>> {
        self.tx.subscribe()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[async_trait]
impl<E> NotificationSink<E> for BroadcastSink<E>
where
    E: Clone + Send + Sync,
{
    async fn send(&self, event: &ResourceEvent<E>) -> Result<(), NotifyError> {
        match self.tx.send(event.clone()) {
            Ok(receivers) => trace!(receivers, "event broadcast"),
            Err(_) => trace!("no subscribers; event dropped"),
        }
        Ok(())
    }
}

/// Delivers to every inner sink in order.
///
/// All sinks are tried even if one fails; the failures are then reported
/// together.
pub struct FanoutSink<E> {
    sinks: Vec<Arc<dyn NotificationSink<E>>>,
}

impl<E> FanoutSink<E> {
    #[must_use]
    pub fn new(sinks: Vec<Arc<dyn NotificationSink<E>>>) -> Self {
        Self { sinks }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

#[async_trait]
impl<E> NotificationSink<E> for FanoutSink<E>
where
    E: Send + Sync,
{
    async fn send(&self, event: &ResourceEvent<E>) -> Result<(), NotifyError> {
        let mut failures = Vec::new();
        for sink in &self.sinks {
            if let Err(e) = sink.send(event).await {
                failures.push(e.to_string());
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(NotifyError::Delivery(failures.join("; ")))
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use gatekit::EventOperation;
    use tracing_test::traced_test;

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl NotificationSink<u32> for Counting {
        async fn send(&self, _event: &ResourceEvent<u32>) -> Result<(), NotifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(NotifyError::Delivery("queue full".to_owned()))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn broadcast_without_subscribers_is_ok() {
        let sink = BroadcastSink::<u32>::new(4);
        assert_eq!(sink.subscriber_count(), 0);
        sink.send(&ResourceEvent::new(EventOperation::Created, 1))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn broadcast_reaches_every_subscriber() {
        let sink = BroadcastSink::<u32>::new(4);
        let mut first = sink.subscribe();
        let mut second = sink.subscribe();

        sink.send(&ResourceEvent::new(EventOperation::Deleted, 7))
            .await
            .unwrap();

        assert_eq!(first.recv().await.unwrap().resource, 7);
        assert_eq!(
            second.recv().await.unwrap().operation,
            EventOperation::Deleted
        );
    }

    #[tokio::test]
    async fn fanout_tries_all_sinks_then_reports_failures() {
        let broken = Arc::new(Counting {
            fail: true,
            ..Counting::default()
        });
        let healthy = Arc::new(Counting::default());
        let fanout = FanoutSink::new(vec![
            Arc::clone(&broken) as Arc<dyn NotificationSink<u32>>,
            Arc::clone(&healthy) as Arc<dyn NotificationSink<u32>>,
        ]);

        let err = fanout
            .send(&ResourceEvent::new(EventOperation::Updated, 3))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("queue full"));
        assert_eq!(broken.calls.load(Ordering::SeqCst), 1);
        assert_eq!(healthy.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    #[traced_test]
    async fn logging_sink_writes_event_json() {
        LoggingSink
            .send(&ResourceEvent::new(EventOperation::Created, 42_u32))
            .await
            .unwrap();
        assert!(logs_contain(r#"{"operation":"created","resource":42}"#));
    }
}
