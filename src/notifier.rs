//! Invalidation emitter. After a committed mutation the engine names the
//! read views that went stale; how that reaches clients is up to the sink.

use std::collections::BTreeSet;

use serde::Serialize;
use strum::{Display, EnumString};
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display, EnumString)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum InvalidateKey {
    Projects,
    ProjectStats,
    Notifications,
    Rankings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidationEvent {
    pub tenant_id: uuid::Uuid,
    pub keys: BTreeSet<InvalidateKey>,
}

pub trait InvalidationSink: Send + Sync {
    fn notify(&self, event: InvalidationEvent);
}

/// Fans events out over a tokio broadcast channel. Delivery is best effort:
/// with no subscribers the event is dropped.
#[derive(Clone)]
pub struct BroadcastInvalidationSink {
    sender: broadcast::Sender<InvalidationEvent>,
}

impl BroadcastInvalidationSink {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<InvalidationEvent> {
        self.sender.subscribe()
    }
}

impl InvalidationSink for BroadcastInvalidationSink {
    fn notify(&self, event: InvalidationEvent) {
        let keys: Vec<String> = event.keys.iter().map(ToString::to_string).collect();
        tracing::debug!(tenant_id = %event.tenant_id, keys = ?keys, "Dispatching cache invalidation");
        // Err only means nobody is listening right now.
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_use_client_cache_names() {
        assert_eq!(InvalidateKey::ProjectStats.to_string(), "projectStats");
        assert_eq!("rankings".parse::<InvalidateKey>().unwrap(), InvalidateKey::Rankings);
    }

    #[tokio::test]
    async fn subscribers_receive_events() {
        let sink = BroadcastInvalidationSink::new(8);
        let mut rx = sink.subscribe();
        let event = InvalidationEvent {
            tenant_id: uuid::Uuid::new_v4(),
            keys: BTreeSet::from([InvalidateKey::Projects]),
        };

        sink.notify(event.clone());

        assert_eq!(rx.recv().await.unwrap(), event);
    }
}
