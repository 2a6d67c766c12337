//! Dashboard query facade — boundary shaping for the external web layer.
//!
//! [`QueryFacade`] translates the four dashboard requests into
//! [`StatsEngine`] calls and shapes the results into JSON-serializable
//! payloads. It is a pure adapter: input validation and result shaping
//! only, no state or policy of its own. Cross-origin handling, routing,
//! and client cancellation belong to the excluded HTTP layer.
//!
//! Internal event identifiers are stripped from every payload — callers
//! see the original eve.json documents, nothing else.

use metrics::counter;
use serde::Serialize;
use tracing::warn;

use evewatch_core::config::QueryConfig;
use evewatch_core::metrics::{LABEL_OPERATION, QUERY_FAILURES_TOTAL, QUERY_REQUESTS_TOTAL};
use evewatch_core::store::{EventStore, GroupBucket};

use crate::error::{FacadeError, QueryError};
use crate::stats::StatsEngine;

/// Response payload for the recent-alerts listing.
#[derive(Debug, Serialize)]
pub struct RecentAlertsResponse {
    /// Original alert documents, newest first, internal ids stripped.
    pub alerts: Vec<serde_json::Value>,
}

/// Response payload for the total alert count.
#[derive(Debug, Serialize)]
pub struct TotalAlertsResponse {
    /// Total number of persisted alert events.
    pub total_alerts: u64,
}

/// Response payload for a top-N grouping.
#[derive(Debug, Serialize)]
pub struct TopGroupsResponse {
    /// The grouping key the counts are partitioned by.
    pub grouped_by: String,
    /// Groups ordered by count descending (ties by key ascending).
    pub groups: Vec<GroupBucket>,
}

/// Query facade over a [`StatsEngine`].
#[derive(Debug)]
pub struct QueryFacade<S: EventStore> {
    engine: StatsEngine<S>,
    config: QueryConfig,
}

// Manual impl: derive(Clone) would require S: Clone, but only handles are cloned.
impl<S: EventStore> Clone for QueryFacade<S> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S: EventStore> QueryFacade<S> {
    /// Create a facade with the given boundary configuration.
    pub fn new(engine: StatsEngine<S>, config: QueryConfig) -> Self {
        Self { engine, config }
    }

    /// List the most recent alerts, newest first.
    ///
    /// `limit = None` applies the configured default cap (100). Explicit
    /// limits are validated: non-positive or above the configured maximum
    /// is a caller error, not a silent clamp.
    pub async fn recent_alerts(
        &self,
        limit: Option<i64>,
    ) -> Result<RecentAlertsResponse, FacadeError> {
        let limit = match limit {
            None => self.config.recent_limit,
            Some(l) if l <= 0 => {
                return Err(self.fail(
                    "recent",
                    QueryError::InvalidParam {
                        param: "limit".to_owned(),
                        reason: "must be a positive integer".to_owned(),
                    },
                ));
            }
            Some(l) if l as usize > self.config.max_recent_limit => {
                return Err(self.fail(
                    "recent",
                    QueryError::InvalidParam {
                        param: "limit".to_owned(),
                        reason: format!("must not exceed {}", self.config.max_recent_limit),
                    },
                ));
            }
            Some(l) => l as usize,
        };

        counter!(QUERY_REQUESTS_TOTAL, LABEL_OPERATION => "recent").increment(1);
        let events = self
            .engine
            .recent(limit)
            .await
            .map_err(|e| self.fail("recent", e))?;

        Ok(RecentAlertsResponse {
            alerts: events.into_iter().map(|e| e.document).collect(),
        })
    }

    /// Total alert count, unfiltered.
    pub async fn total_alerts(&self) -> Result<TotalAlertsResponse, FacadeError> {
        counter!(QUERY_REQUESTS_TOTAL, LABEL_OPERATION => "count").increment(1);
        let total_alerts = self
            .engine
            .count()
            .await
            .map_err(|e| self.fail("count", e))?;
        Ok(TotalAlertsResponse { total_alerts })
    }

    /// Top source addresses by alert frequency.
    pub async fn top_source_ips(&self) -> Result<TopGroupsResponse, FacadeError> {
        counter!(QUERY_REQUESTS_TOTAL, LABEL_OPERATION => "top_ips").increment(1);
        self.top_groups("top_ips", "src_ip").await
    }

    /// Top alert signatures by frequency.
    pub async fn top_signatures(&self) -> Result<TopGroupsResponse, FacadeError> {
        counter!(QUERY_REQUESTS_TOTAL, LABEL_OPERATION => "top_signatures").increment(1);
        self.top_groups("top_signatures", "alert.signature").await
    }

    async fn top_groups(
        &self,
        operation: &'static str,
        key: &str,
    ) -> Result<TopGroupsResponse, FacadeError> {
        let groups = self
            .engine
            .group_count_top(key, self.config.top_groups)
            .await
            .map_err(|e| self.fail(operation, e))?;

        Ok(TopGroupsResponse {
            grouped_by: key.to_owned(),
            groups,
        })
    }

    /// Record a failed query and convert it to the boundary error shape.
    fn fail(&self, operation: &'static str, err: QueryError) -> FacadeError {
        counter!(QUERY_FAILURES_TOTAL, LABEL_OPERATION => operation).increment(1);
        warn!(operation, error = %err, "query failed");
        err.into()
    }
}
