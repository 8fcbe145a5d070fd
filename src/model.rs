use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub id: Uuid,
    pub name: String,
    pub location: String,
}

/// Incident row as persisted, referencing its camera by id.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    pub id: Uuid,
    pub camera_id: Uuid,
    #[serde(rename = "type")]
    pub kind: IncidentKind,
    pub ts_start: DateTime<Utc>,
    pub ts_end: DateTime<Utc>,
    pub thumbnail_url: String,
    #[serde(default)]
    pub resolved: bool,
}

/// Incident joined with its camera, the shape served over the API.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: Uuid,
    pub camera_id: Uuid,
    pub camera: Camera,
    #[serde(rename = "type")]
    pub kind: IncidentKind,
    pub ts_start: DateTime<Utc>,
    pub ts_end: DateTime<Utc>,
    pub thumbnail_url: String,
    pub resolved: bool,
}

impl Incident {
    pub fn join(record: IncidentRecord, camera: Camera) -> Self {
        Incident {
            id: record.id,
            camera_id: record.camera_id,
            camera,
            kind: record.kind,
            ts_start: record.ts_start,
            ts_end: record.ts_end,
            thumbnail_url: record.thumbnail_url,
            resolved: record.resolved,
        }
    }
}

#[derive(Clone, Debug)]
pub struct NewCamera {
    pub name: String,
    pub location: String,
}

/// Incident as handed over by ingestion, before it has an id.
#[derive(Clone, Debug)]
pub struct NewIncident {
    pub camera_id: Uuid,
    pub kind: IncidentKind,
    pub ts_start: DateTime<Utc>,
    pub ts_end: DateTime<Utc>,
    pub thumbnail_url: String,
    pub resolved: bool,
}

/// Resolution filter for listings. `None` lists everything.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListFilter {
    #[serde(default)]
    pub resolved: Option<bool>,
}

impl ListFilter {
    pub const ALL: ListFilter = ListFilter { resolved: None };
    pub const UNRESOLVED: ListFilter = ListFilter {
        resolved: Some(false),
    };
    pub const RESOLVED: ListFilter = ListFilter {
        resolved: Some(true),
    };

    pub fn matches(&self, resolved: bool) -> bool {
        self.resolved.map_or(true, |x| x == resolved)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IncidentKind {
    UnauthorizedAccess,
    GunThreat,
    FaceRecognized,
    Other(String),
}

impl IncidentKind {
    pub fn label(&self) -> &str {
        match self {
            IncidentKind::UnauthorizedAccess => "Unauthorized Access",
            IncidentKind::GunThreat => "Gun Threat",
            IncidentKind::FaceRecognized => "Face Recognized",
            IncidentKind::Other(label) => label,
        }
    }

    /// Marker color on the timeline and list badges.
    pub fn color(&self) -> &'static str {
        match self {
            IncidentKind::UnauthorizedAccess => "#f97316",
            IncidentKind::GunThreat => "#ef4444",
            IncidentKind::FaceRecognized => "#3b82f6",
            IncidentKind::Other(_) => "#eab308",
        }
    }

    /// Legend entries for the timeline: the well-known kinds, then the
    /// catch-all bucket.
    pub fn legend() -> [(&'static str, &'static str); 4] {
        let other = IncidentKind::Other(String::new()).color();
        [
            ("Unauthorized Access", IncidentKind::UnauthorizedAccess.color()),
            ("Gun Threat", IncidentKind::GunThreat.color()),
            ("Face Recognized", IncidentKind::FaceRecognized.color()),
            ("Other", other),
        ]
    }
}

impl From<String> for IncidentKind {
    fn from(label: String) -> Self {
        match label.to_lowercase().as_str() {
            "unauthorized access" => IncidentKind::UnauthorizedAccess,
            "gun threat" => IncidentKind::GunThreat,
            "face recognized" => IncidentKind::FaceRecognized,
            _ => IncidentKind::Other(label),
        }
    }
}

impl From<&str> for IncidentKind {
    fn from(label: &str) -> Self {
        label.to_string().into()
    }
}

impl From<IncidentKind> for String {
    fn from(kind: IncidentKind) -> Self {
        match kind {
            IncidentKind::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for IncidentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
