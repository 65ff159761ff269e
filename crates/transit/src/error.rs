use std::fmt;

use database::StoreError;

/// The core's error taxonomy. Kept as a single hand-written enum in the
/// teacher's style rather than reaching for a derive-macro crate — the
/// teacher's own `RequestError`/`DatabaseError` are plain enums with manual
/// `From` impls, and nothing about this boundary warrants diverging from
/// that.
#[derive(Debug)]
pub enum CoreError {
    /// Origin or destination stop is not present in the current graph
    /// snapshot.
    UnknownStop(String),
    /// Routing completed but no route survived filtering.
    NoRoutes,
    /// A reliability seed or other precondition was violated (e.g. no
    /// trips loaded yet).
    NoScheduleData,
    /// Malformed date/time on an input boundary.
    BadTimeInput(String),
    /// A live-feed or static-feed fetch failed; callers should log and
    /// continue rather than treat this as fatal.
    TransientFetch(String),
    /// An unexpected storage failure during routing or ingestion.
    StorageError(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownStop(stop_id) => write!(f, "unknown stop: {stop_id}"),
            Self::NoRoutes => write!(f, "no routes found"),
            Self::NoScheduleData => write!(f, "no schedule data loaded"),
            Self::BadTimeInput(reason) => write!(f, "bad time input: {reason}"),
            Self::TransientFetch(reason) => write!(f, "transient fetch failure: {reason}"),
            Self::StorageError(reason) => write!(f, "storage error: {reason}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<StoreError> for CoreError {
    fn from(why: StoreError) -> Self {
        Self::StorageError(format!("{why:?}"))
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(why: reqwest::Error) -> Self {
        Self::TransientFetch(why.to_string())
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(why: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self::TransientFetch(why.to_string())
    }
}
