//! Aggregation engine — ranked group counts over the persisted stream.
//!
//! [`StatsEngine`] answers the three read operations of the query path:
//! top-N group counts, total counts, and recent-event listings. It holds
//! nothing but a shared store handle; every call is side-effect-free and
//! safe to run concurrently with ingestion and with other queries. The
//! engine observes whatever subset of events is durably persisted at call
//! time — no snapshot isolation across calls.

use std::sync::Arc;

use evewatch_core::event::AlertEvent;
use evewatch_core::store::{EventStore, GroupBucket};

use crate::error::QueryError;

/// Read-only aggregation engine over an [`EventStore`].
#[derive(Debug)]
pub struct StatsEngine<S: EventStore> {
    store: Arc<S>,
}

// Manual impl: derive(Clone) would require S: Clone, but only the handle is cloned.
impl<S: EventStore> Clone for StatsEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: EventStore> StatsEngine<S> {
    /// Create an engine over a shared store handle.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Top `n` groups by count for the dot-notation field `key`.
    ///
    /// Results are strictly descending by count; ties are broken by
    /// ascending key (the store contract). Returns fewer than `n` groups
    /// when fewer distinct keys exist.
    pub async fn group_count_top(
        &self,
        key: &str,
        n: usize,
    ) -> Result<Vec<GroupBucket>, QueryError> {
        if key.is_empty() {
            return Err(QueryError::InvalidParam {
                param: "key".to_owned(),
                reason: "grouping key must not be empty".to_owned(),
            });
        }
        if n == 0 {
            return Err(QueryError::InvalidParam {
                param: "n".to_owned(),
                reason: "must be greater than zero".to_owned(),
            });
        }

        Ok(self.store.group_count(key, n).await?)
    }

    /// Total number of persisted alert events.
    pub async fn count(&self) -> Result<u64, QueryError> {
        Ok(self.store.count_all().await?)
    }

    /// Up to `limit` most recent events, newest first.
    pub async fn recent(&self, limit: usize) -> Result<Vec<AlertEvent>, QueryError> {
        if limit == 0 {
            return Err(QueryError::InvalidParam {
                param: "limit".to_owned(),
                reason: "must be greater than zero".to_owned(),
            });
        }

        Ok(self.store.find_recent(limit).await?)
    }
}
