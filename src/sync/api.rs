use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use url::Url;
use uuid::Uuid;

use super::SyncError;
use crate::{
    model::{Incident, ListFilter},
    store::{Store, StoreError},
};

/// Backend the dashboard session reads incidents from and resolves them
/// against.
#[async_trait]
pub trait IncidentApi: Send + Sync {
    async fn list(&self, filter: ListFilter) -> Result<Vec<Incident>, SyncError>;

    async fn resolve(&self, id: Uuid) -> Result<Incident, SyncError>;
}

#[async_trait]
impl IncidentApi for Store {
    async fn list(&self, filter: ListFilter) -> Result<Vec<Incident>, SyncError> {
        Ok(self.list_incidents(filter).await)
    }

    async fn resolve(&self, id: Uuid) -> Result<Incident, SyncError> {
        self.resolve_incident(id).await.map_err(|e| match e {
            StoreError::NotFound(id) => SyncError::NotFound(id),
            e => SyncError::Transient(e.to_string()),
        })
    }
}

/// Talks to the incident endpoints of a running server.
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base: Url,
}

impl HttpApi {
    /// `base` is the server root the `incidents` routes hang off.
    pub fn new(base: Url) -> Self {
        Self::with_client(Client::new(), base)
    }

    pub fn with_client(client: Client, mut base: Url) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        HttpApi { client, base }
    }

    fn url(&self, path: &str) -> Result<Url, SyncError> {
        self.base
            .join(path)
            .map_err(|e| SyncError::Transient(format!("invalid url for '{path}': {e}")))
    }
}

#[async_trait]
impl IncidentApi for HttpApi {
    async fn list(&self, filter: ListFilter) -> Result<Vec<Incident>, SyncError> {
        let mut url = self.url("incidents")?;
        if let Some(resolved) = filter.resolved {
            url.query_pairs_mut()
                .append_pair("resolved", &resolved.to_string());
        }
        debug!("GET {url}");
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(SyncError::Transient(format!(
                "failed to fetch incidents: HTTP status {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }

    async fn resolve(&self, id: Uuid) -> Result<Incident, SyncError> {
        let url = self.url(&format!("incidents/{id}/resolve"))?;
        debug!("PATCH {url}");
        let response = self.client.patch(url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(SyncError::NotFound(id)),
            status if !status.is_success() => Err(SyncError::Transient(format!(
                "failed to resolve incident {id}: HTTP status {status}"
            ))),
            _ => Ok(response.json().await?),
        }
    }
}
