use std::sync::Arc;

use axum::{routing, Router};
use axum_util::{
    errors::ApiError,
    logger::{LoggerConfig, LoggerLayer},
};
use log::Level;
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

use crate::{
    store::{Store, StoreError},
    timeline::Timeline,
};

mod dashboard;
mod list_cameras;
mod list_incidents;
mod resolve_incident;

lazy_static::lazy_static! {
    static ref INCIDENTS_LISTED: IntCounterVec = register_int_counter_vec!("incident_monitor_listed", "incident listings served", &["filter"]).unwrap();
    static ref INCIDENTS_RESOLVED: IntCounter = register_int_counter!("incident_monitor_resolved", "resolve requests that succeeded").unwrap();
    static ref RESOLVE_MISSES: IntCounter = register_int_counter!("incident_monitor_resolve_misses", "resolve requests for unknown incidents").unwrap();
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub web_base: String,
    pub timeline: Timeline,
}

impl AppState {
    pub fn new(store: Arc<Store>) -> Self {
        AppState {
            store,
            web_base: "/".to_string(),
            timeline: Timeline::default(),
        }
    }
}

fn store_error(e: StoreError) -> ApiError {
    match e {
        StoreError::NotFound(_) => ApiError::NotFound,
        e => ApiError::Other(e.into()),
    }
}

async fn health() {}

pub fn route(state: AppState) -> Router {
    Router::new()
        .route("/", routing::get(dashboard::dashboard))
        .route("/cameras", routing::get(list_cameras::list_cameras))
        .route("/incidents", routing::get(list_incidents::list_incidents))
        .route(
            "/incidents/:id/resolve",
            routing::patch(resolve_incident::resolve_incident)
                .post(resolve_incident::resolve_incident_form),
        )
        .route("/health", routing::get(health))
        .with_state(state)
}

/// Adds request logging. Health checks log at debug level.
pub fn with_logger(router: Router) -> Router {
    router.layer(LoggerLayer::new(LoggerConfig {
        log_level_filter: Arc::new(|x| {
            if x == "/health" {
                Level::Debug
            } else {
                Level::Info
            }
        }),
        honor_xff: true,
        metric_name: "incident_monitor_web_responses".to_string(),
    }))
}
