#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`QueryError`, `FacadeError`)
//! - [`stats`]: Aggregation engine (`StatsEngine`)
//! - [`facade`]: Dashboard query facade (`QueryFacade`, response payloads)
//!
//! # Architecture
//!
//! ```text
//! HTTP layer (external) --> QueryFacade --> StatsEngine --> EventStore
//! ```

pub mod error;
pub mod facade;
pub mod stats;

pub use error::{FacadeError, QueryError};
pub use facade::{QueryFacade, RecentAlertsResponse, TopGroupsResponse, TotalAlertsResponse};
pub use stats::StatsEngine;
