use axum::{
    extract::{Query, State},
    Json,
};
use axum_util::errors::ApiResult;

use super::{AppState, INCIDENTS_LISTED};
use crate::model::{Incident, ListFilter};

pub async fn list_incidents(
    State(state): State<AppState>,
    Query(filter): Query<ListFilter>,
) -> ApiResult<Json<Vec<Incident>>> {
    let label = match filter.resolved {
        None => "all",
        Some(true) => "resolved",
        Some(false) => "unresolved",
    };
    INCIDENTS_LISTED.with_label_values(&[label]).inc();
    Ok(Json(state.store.list_incidents(filter).await))
}
