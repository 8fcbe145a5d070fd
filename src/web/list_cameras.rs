use axum::{extract::State, Json};

use super::AppState;
use crate::model::Camera;

pub async fn list_cameras(State(state): State<AppState>) -> Json<Vec<Camera>> {
    Json(state.store.cameras().await)
}
