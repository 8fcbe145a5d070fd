use std::sync::Mutex;

use log::{error, info, warn};
use uuid::Uuid;

use super::{IncidentApi, OptimisticCache, SyncError};
use crate::model::{Incident, ListFilter};

/// One operator's view of the incident list, kept in step with the backend
/// through an [`OptimisticCache`].
pub struct DashboardSession<A> {
    api: A,
    cache: Mutex<OptimisticCache>,
}

impl<A: IncidentApi> DashboardSession<A> {
    /// Session over the unresolved incident list.
    pub fn new(api: A) -> Self {
        DashboardSession {
            api,
            cache: Mutex::new(OptimisticCache::new()),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, OptimisticCache> {
        // the cache holds no invariants a panicking holder could break halfway
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Refetches the list. Returns false when a newer fetch had already
    /// landed and this response was dropped.
    pub async fn refresh(&self) -> Result<bool, SyncError> {
        let ticket = self.cache().begin_fetch();
        let incidents = self.api.list(ListFilter::UNRESOLVED).await?;
        Ok(self.cache().apply_fetch(ticket, incidents))
    }

    /// Optimistically hides `id`, asks the backend to resolve it, then
    /// refetches on success or restores it on failure. A resolve for an id
    /// that is already in flight or committed does nothing.
    pub async fn resolve(&self, id: Uuid) -> Result<(), SyncError> {
        if !self.cache().begin_resolve(id) {
            info!("resolve of incident {id} already in progress");
            return Ok(());
        }
        match self.api.resolve(id).await {
            Ok(_) => {
                self.cache().commit(id);
                if let Err(e) = self.refresh().await {
                    // the commit keeps it hidden until a later refresh succeeds
                    warn!("refetch after resolving {id} failed: {e}");
                }
                Ok(())
            }
            Err(e) => {
                error!("failed to resolve incident {id}: {e}");
                self.cache().rollback(id);
                Err(e)
            }
        }
    }

    /// Resolves several incidents concurrently, reporting each outcome.
    pub async fn resolve_all(
        &self,
        ids: impl IntoIterator<Item = Uuid>,
    ) -> Vec<(Uuid, Result<(), SyncError>)> {
        let tasks = ids
            .into_iter()
            .map(|id| async move { (id, self.resolve(id).await) });
        futures::future::join_all(tasks).await
    }

    pub fn visible(&self) -> Vec<Incident> {
        self.cache().visible().cloned().collect()
    }

    pub fn is_pending(&self, id: Uuid) -> bool {
        self.cache().is_pending(id)
    }

    /// Incidents in the last fetched list that are hidden as resolved.
    pub fn resolved_count(&self) -> usize {
        self.cache().hidden_count()
    }
}
