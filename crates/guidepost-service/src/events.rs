//! Typed change notifications.
//!
//! `ChangeFeed` is an explicit event source: constructed once by the host,
//! handed to the components that publish, and subscribed per listener.
//! There is no process-wide singleton; dropping the feed and all receivers
//! tears the channel down.

use tokio::sync::broadcast;

use guidepost_db::db::enums::BookingChannel;

/// A change the engine wants listeners to know about.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ChangeEvent {
    /// A webhook delivery created or updated a booking.
    BookingUpserted {
        booking_id: uuid::Uuid,
        channel: BookingChannel,
        created: bool,
    },
    /// A booking was transitioned to `cancelled`.
    BookingCancelled { booking_id: uuid::Uuid },
    /// A sync cycle finished.
    SyncCompleted {
        sources_synced: usize,
        sources_failed: usize,
        conflicts: usize,
    },
}

/// Broadcast-backed event source for [`ChangeEvent`]s.
#[derive(Debug)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    /// Creates a feed that buffers up to `capacity` events per receiver.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _initial_receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Registers a new listener. Each receiver sees every event published
    /// after its subscription.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    /// Publishes an event to all current listeners. Publishing with no
    /// listeners is not an error.
    pub fn publish(&self, event: ChangeEvent) {
        match self.sender.send(event) {
            Ok(listeners) => tracing::trace!(listeners, "Change event published"),
            Err(_no_listeners) => tracing::trace!("Change event dropped, no listeners"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let feed = ChangeFeed::new(8);
        let mut receiver = feed.subscribe();

        let event = ChangeEvent::BookingCancelled {
            booking_id: uuid::Uuid::nil(),
        };
        feed.publish(event.clone());

        assert_eq!(receiver.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn publishing_without_listeners_is_silent() {
        let feed = ChangeFeed::new(8);
        feed.publish(ChangeEvent::SyncCompleted {
            sources_synced: 1,
            sources_failed: 0,
            conflicts: 0,
        });
    }

    #[tokio::test]
    async fn each_subscriber_sees_every_event() {
        let feed = ChangeFeed::new(8);
        let mut first = feed.subscribe();
        let mut second = feed.subscribe();

        let event = ChangeEvent::BookingCancelled {
            booking_id: uuid::Uuid::nil(),
        };
        feed.publish(event.clone());

        assert_eq!(first.recv().await.unwrap(), event);
        assert_eq!(second.recv().await.unwrap(), event);
    }
}
