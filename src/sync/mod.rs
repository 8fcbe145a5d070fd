use thiserror::Error;
use uuid::Uuid;

mod api;
mod cache;
mod session;

pub use api::{HttpApi, IncidentApi};
pub use cache::{FetchTicket, OptimisticCache, ResolveState};
pub use session::DashboardSession;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("incident {0} not found")]
    NotFound(Uuid),
    #[error("request failed: {0}")]
    Transient(String),
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        SyncError::Transient(e.to_string())
    }
}
