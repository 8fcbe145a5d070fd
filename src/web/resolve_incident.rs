use axum::{
    extract::{Path, State},
    response::Redirect,
    Json,
};
use axum_util::errors::{ApiError, ApiResult};
use log::info;
use uuid::Uuid;

use super::{store_error, AppState, INCIDENTS_RESOLVED, RESOLVE_MISSES};
use crate::{model::Incident, store::StoreError};

async fn resolve(state: &AppState, id: &str) -> ApiResult<Incident> {
    // ids that don't parse can't name a stored incident
    let Ok(id) = id.parse::<Uuid>() else {
        RESOLVE_MISSES.inc();
        return Err(ApiError::NotFound);
    };
    match state.store.resolve_incident(id).await {
        Ok(incident) => {
            INCIDENTS_RESOLVED.inc();
            info!(
                "resolved incident {id} ({} @ {})",
                incident.kind, incident.camera.name
            );
            Ok(incident)
        }
        Err(e) => {
            if matches!(e, StoreError::NotFound(_)) {
                RESOLVE_MISSES.inc();
            }
            Err(store_error(e))
        }
    }
}

pub async fn resolve_incident(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Incident>> {
    Ok(Json(resolve(&state, &id).await?))
}

/// Form post from the dashboard page, which has no script to send a PATCH.
pub async fn resolve_incident_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Redirect> {
    resolve(&state, &id).await?;
    Ok(Redirect::to(&state.web_base))
}
