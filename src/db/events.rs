//! Change notification for local store writes.
//!
//! Repositories publish an event after each successful write so that a
//! caller (a UI layer, a status line) can refresh reactively. The sync
//! engine never consumes these; it is driven explicitly.

use chrono::NaiveDate;
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreTable {
    Profiles,
    WeightLogs,
    DailyLogs,
    Routines,
}

#[derive(Debug, Clone)]
pub struct StoreEvent {
    pub table: StoreTable,
    pub user_id: String,
    pub date: Option<NaiveDate>,
}

/// Broadcast fan-out for store events. Cheap to clone; publishing with no
/// subscribers is a no-op.
#[derive(Debug, Clone)]
pub struct StoreEvents {
    tx: broadcast::Sender<StoreEvent>,
}

impl StoreEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }

    pub(crate) fn publish(&self, table: StoreTable, user_id: &str, date: Option<NaiveDate>) {
        // Send only fails when nobody is listening, which is fine.
        let _ = self.tx.send(StoreEvent {
            table,
            user_id: user_id.to_string(),
            date,
        });
    }
}

impl Default for StoreEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_published_event() {
        let events = StoreEvents::new();
        let mut rx = events.subscribe();

        let date = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        events.publish(StoreTable::WeightLogs, "user1", Some(date));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.table, StoreTable::WeightLogs);
        assert_eq!(event.user_id, "user1");
        assert_eq!(event.date, Some(date));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_noop() {
        let events = StoreEvents::new();
        events.publish(StoreTable::Profiles, "user1", None);
    }
}
