use chrono::{DateTime, Duration, Utc};
use log::info;
use rand::{seq::SliceRandom, Rng};

use crate::{
    model::{IncidentKind, NewCamera, NewIncident},
    store::{Store, StoreResult},
};

const CAMERAS: [(&str, &str); 4] = [
    ("Shop Floor Camera A", "Manufacturing Floor - Section A"),
    ("Vault Security Camera", "High Security Vault - Level B2"),
    ("Main Entrance Camera", "Building Main Entrance - Ground Floor"),
    ("Parking Lot Camera B", "Employee Parking - North Side"),
];

const INCIDENT_TYPES: [&str; 5] = [
    "Unauthorized Access",
    "Gun Threat",
    "Face Recognized",
    "Suspicious Activity",
    "Equipment Malfunction",
];

/// Fills the store with demo cameras and `incident_count` incidents spread
/// over the day starting at `day_start`.
pub async fn seed<R: Rng>(
    store: &Store,
    rng: &mut R,
    day_start: DateTime<Utc>,
    incident_count: usize,
) -> StoreResult<()> {
    let mut cameras = Vec::with_capacity(CAMERAS.len());
    for (name, location) in CAMERAS {
        cameras.push(
            store
                .insert_camera(NewCamera {
                    name: name.to_string(),
                    location: location.to_string(),
                })
                .await?,
        );
    }

    for i in 0..incident_count {
        let ts_start = day_start
            + Duration::hours(rng.gen_range(0..24))
            + Duration::minutes(rng.gen_range(0..60));
        let ts_end = ts_start + Duration::minutes(rng.gen_range(2..12));
        // CAMERAS and INCIDENT_TYPES are non-empty
        let camera = &cameras[rng.gen_range(0..cameras.len())];
        let kind = INCIDENT_TYPES.choose(rng).copied().unwrap_or("Suspicious Activity");
        store
            .insert_incident(NewIncident {
                camera_id: camera.id,
                kind: IncidentKind::from(kind),
                ts_start,
                ts_end,
                thumbnail_url: format!("/images/incident-{}.jpg", i % 5 + 1),
                resolved: rng.gen_bool(0.3),
            })
            .await?;
    }

    info!(
        "seeded {} cameras and {incident_count} incidents",
        cameras.len()
    );
    Ok(())
}
