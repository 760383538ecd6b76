//! Event ledger.
//!
//! Append-only log of user actions that backs the feed. Writes are
//! best-effort: callers log a failed append and carry on, so a broken ledger
//! never rolls back the rating, review or friendship change that produced it.

use async_trait::async_trait;
use chrono::Utc;
use filmrate_common::{AppResult, IdGenerator};
use filmrate_db::{
    entities::event::{self, EventType, Operation},
    repositories::EventRepository,
};
use sea_orm::Set;
use std::sync::Arc;

/// An event waiting to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    /// Acting user.
    pub user_id: String,
    /// What kind of object changed.
    pub event_type: EventType,
    /// What happened to it.
    pub operation: Operation,
    /// Id of the film, review or friend the action targets.
    pub entity_id: String,
}

impl NewEvent {
    /// Create a new event.
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        event_type: EventType,
        operation: Operation,
        entity_id: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            event_type,
            operation,
            entity_id: entity_id.into(),
        }
    }
}

/// Trait for appending to the action log.
#[async_trait]
pub trait EventLedger: Send + Sync {
    /// Append an event, stamped with the current time.
    async fn append(&self, event: NewEvent) -> AppResult<()>;
}

/// Event ledger backed by the `event` table.
#[derive(Clone)]
pub struct DbEventLedger {
    event_repo: EventRepository,
    id_gen: IdGenerator,
}

impl DbEventLedger {
    /// Create a new database-backed ledger.
    #[must_use]
    pub const fn new(event_repo: EventRepository) -> Self {
        Self {
            event_repo,
            id_gen: IdGenerator::new(),
        }
    }
}

#[async_trait]
impl EventLedger for DbEventLedger {
    async fn append(&self, event: NewEvent) -> AppResult<()> {
        let model = event::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(event.user_id),
            timestamp: Set(Utc::now().timestamp_millis()),
            event_type: Set(event.event_type),
            operation: Set(event.operation),
            entity_id: Set(event.entity_id),
        };

        self.event_repo.create(model).await?;
        Ok(())
    }
}

/// Type alias for a shared event ledger.
pub type EventLedgerService = Arc<dyn EventLedger>;

/// Append an event, logging instead of failing when the ledger is unavailable.
pub(crate) async fn record(events: &EventLedgerService, event: NewEvent) {
    let (event_type, operation) = (event.event_type, event.operation);
    if let Err(e) = events.append(event).await {
        tracing::warn!(
            error = %e,
            event_type = ?event_type,
            operation = ?operation,
            "Failed to append event"
        );
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording ledger shared by service tests.

    use super::*;
    use std::sync::Mutex;

    /// Ledger that keeps every appended event in memory.
    #[derive(Default)]
    pub struct RecordingLedger {
        events: Mutex<Vec<NewEvent>>,
    }

    impl RecordingLedger {
        #[allow(clippy::unwrap_used)]
        pub fn events(&self) -> Vec<NewEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EventLedger for RecordingLedger {
        #[allow(clippy::unwrap_used)]
        async fn append(&self, event: NewEvent) -> AppResult<()> {
            self.events.lock().unwrap().push(event);
            Ok(())
        }
    }

    /// Ledger whose appends always fail.
    pub struct FailingLedger;

    #[async_trait]
    impl EventLedger for FailingLedger {
        async fn append(&self, _event: NewEvent) -> AppResult<()> {
            Err(filmrate_common::AppError::Database("ledger offline".to_string()))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_db_ledger_appends_row() {
        let stored = event::Model {
            id: "e1".to_string(),
            user_id: "u1".to_string(),
            timestamp: 1,
            event_type: EventType::Review,
            operation: Operation::Update,
            entity_id: "r1".to_string(),
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored]])
                .into_connection(),
        );

        let ledger = DbEventLedger::new(EventRepository::new(db));
        let result = ledger
            .append(NewEvent::new("u1", EventType::Review, Operation::Update, "r1"))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_record_swallows_failures() {
        let events: EventLedgerService = Arc::new(testing::FailingLedger);
        record(
            &events,
            NewEvent::new("u1", EventType::Like, Operation::Add, "f1"),
        )
        .await;
    }
}
