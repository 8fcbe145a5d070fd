use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::model::{Camera, Incident, IncidentRecord, ListFilter, NewCamera, NewIncident};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("incident {0} not found")]
    NotFound(Uuid),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("failed to access store snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed store snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Serialize, Deserialize, Default, Clone)]
struct Tables {
    cameras: IndexMap<Uuid, Camera>,
    incidents: IndexMap<Uuid, IncidentRecord>,
}

impl Tables {
    fn validate(&self, incident: &IncidentRecord) -> StoreResult<()> {
        if !self.cameras.contains_key(&incident.camera_id) {
            return Err(StoreError::Validation(format!(
                "camera {} does not exist",
                incident.camera_id
            )));
        }
        if incident.ts_start > incident.ts_end {
            return Err(StoreError::Validation(format!(
                "incident starts at {} after it ends at {}",
                incident.ts_start, incident.ts_end
            )));
        }
        if incident.kind.label().trim().is_empty() {
            return Err(StoreError::Validation("incident type is required".to_string()));
        }
        Ok(())
    }

    fn joined(&self, record: &IncidentRecord) -> Option<Incident> {
        let camera = self.cameras.get(&record.camera_id)?;
        Some(Incident::join(record.clone(), camera.clone()))
    }
}

/// Camera and incident tables, optionally backed by a JSON snapshot file that
/// is rewritten after every mutation.
pub struct Store {
    tables: RwLock<Tables>,
    path: Option<PathBuf>,
}

impl Store {
    pub fn in_memory() -> Self {
        Store {
            tables: RwLock::new(Tables::default()),
            path: None,
        }
    }

    /// Opens the snapshot at `path`, starting empty if it does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let tables = if tokio::fs::try_exists(&path).await? {
            let tables: Tables = serde_json::from_str(&tokio::fs::read_to_string(&path).await?)?;
            for incident in tables.incidents.values() {
                tables.validate(incident)?;
            }
            info!(
                "loaded {} cameras and {} incidents from '{}'",
                tables.cameras.len(),
                tables.incidents.len(),
                path.display()
            );
            tables
        } else {
            info!("no store snapshot at '{}', starting empty", path.display());
            Tables::default()
        };
        Ok(Store {
            tables: RwLock::new(tables),
            path: Some(path),
        })
    }

    async fn persist(&self, tables: &Tables) -> StoreResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        write_snapshot(path, tables).await
    }

    pub async fn insert_camera(&self, camera: NewCamera) -> StoreResult<Camera> {
        if camera.name.trim().is_empty() {
            return Err(StoreError::Validation("camera name is required".to_string()));
        }
        let camera = Camera {
            id: Uuid::new_v4(),
            name: camera.name,
            location: camera.location,
        };
        let mut tables = self.tables.write().await;
        tables.cameras.insert(camera.id, camera.clone());
        if let Err(e) = self.persist(&tables).await {
            tables.cameras.shift_remove(&camera.id);
            return Err(e);
        }
        debug!("inserted camera {} ({})", camera.id, camera.name);
        Ok(camera)
    }

    pub async fn insert_incident(&self, incident: NewIncident) -> StoreResult<Incident> {
        let record = IncidentRecord {
            id: Uuid::new_v4(),
            camera_id: incident.camera_id,
            kind: incident.kind,
            ts_start: incident.ts_start,
            ts_end: incident.ts_end,
            thumbnail_url: incident.thumbnail_url,
            resolved: incident.resolved,
        };
        let mut tables = self.tables.write().await;
        tables.validate(&record)?;
        tables.incidents.insert(record.id, record.clone());
        if let Err(e) = self.persist(&tables).await {
            tables.incidents.shift_remove(&record.id);
            return Err(e);
        }
        tables
            .joined(&record)
            .ok_or_else(|| StoreError::Validation(format!("camera {} does not exist", record.camera_id)))
    }

    pub async fn cameras(&self) -> Vec<Camera> {
        self.tables.read().await.cameras.values().cloned().collect()
    }

    pub async fn get_incident(&self, id: Uuid) -> Option<Incident> {
        let tables = self.tables.read().await;
        tables.incidents.get(&id).and_then(|x| tables.joined(x))
    }

    /// Incidents matching `filter`, newest start first. Equal start times keep
    /// insertion order.
    pub async fn list_incidents(&self, filter: ListFilter) -> Vec<Incident> {
        let tables = self.tables.read().await;
        let mut out: Vec<Incident> = tables
            .incidents
            .values()
            .filter(|x| filter.matches(x.resolved))
            .filter_map(|x| tables.joined(x))
            .collect();
        out.sort_by(|a, b| b.ts_start.cmp(&a.ts_start));
        out
    }

    /// Marks an incident resolved. Resolving an already resolved incident
    /// succeeds and leaves it unchanged.
    pub async fn resolve_incident(&self, id: Uuid) -> StoreResult<Incident> {
        let mut tables = self.tables.write().await;
        let Some(record) = tables.incidents.get_mut(&id) else {
            return Err(StoreError::NotFound(id));
        };
        let was_resolved = record.resolved;
        record.resolved = true;
        if !was_resolved {
            if let Err(e) = self.persist(&tables).await {
                if let Some(record) = tables.incidents.get_mut(&id) {
                    record.resolved = false;
                }
                return Err(e);
            }
        }
        let record = &tables.incidents[&id];
        tables.joined(record).ok_or(StoreError::NotFound(id))
    }
}

async fn write_snapshot(path: &Path, tables: &Tables) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, serde_json::to_vec_pretty(tables)?).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
