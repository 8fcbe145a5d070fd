use std::{net::TcpListener, sync::Arc};

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use incident_monitor::{
    model::{Incident, IncidentKind, ListFilter, NewCamera, NewIncident},
    store::Store,
    sync::{DashboardSession, HttpApi, IncidentApi, SyncError},
    web::{self, AppState},
};
use proptest::prelude::*;
use tower::ServiceExt;
use uuid::Uuid;

async fn seeded_store(starts: &[&str]) -> (Arc<Store>, Vec<Incident>) {
    let store = Store::in_memory();
    let camera = store
        .insert_camera(NewCamera {
            name: "Main Entrance Camera".to_string(),
            location: "Building Main Entrance - Ground Floor".to_string(),
        })
        .await
        .unwrap();
    let mut created = vec![];
    for (i, start) in starts.iter().enumerate() {
        let ts_start: DateTime<Utc> = start.parse().unwrap();
        created.push(
            store
                .insert_incident(NewIncident {
                    camera_id: camera.id,
                    kind: if i % 2 == 0 {
                        IncidentKind::GunThreat
                    } else {
                        IncidentKind::from("Suspicious Activity")
                    },
                    ts_start,
                    ts_end: ts_start + Duration::minutes(6),
                    thumbnail_url: format!("/images/incident-{}.jpg", i % 5 + 1),
                    resolved: false,
                })
                .await
                .unwrap(),
        );
    }
    (Arc::new(store), created)
}

fn router(store: Arc<Store>) -> Router {
    web::route(AppState::new(store))
}

async fn send(router: &Router, method: Method, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
    (status, body.to_vec())
}

async fn list(router: &Router, uri: &str) -> Vec<Incident> {
    let (status, body) = send(router, Method::GET, uri).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).unwrap()
}

const STARTS: [&str; 4] = [
    "2024-05-01T03:10:00Z",
    "2024-05-01T17:45:00Z",
    "2024-05-01T09:00:00Z",
    "2024-05-01T23:59:00Z",
];

#[tokio::test]
async fn lists_descending_with_camera() {
    let (store, _) = seeded_store(&STARTS).await;
    let router = router(store);

    let incidents = list(&router, "/incidents").await;
    assert_eq!(incidents.len(), 4);
    for pair in incidents.windows(2) {
        assert!(pair[0].ts_start >= pair[1].ts_start);
    }
    assert_eq!(incidents[0].camera.name, "Main Entrance Camera");
    assert_eq!(incidents[0].kind, IncidentKind::from("Suspicious Activity"));
}

#[tokio::test]
async fn resolve_then_unresolved_list_excludes_it() {
    let (store, created) = seeded_store(&STARTS).await;
    let router = router(store);
    let target = created[2].id;

    let (status, body) = send(&router, Method::PATCH, &format!("/incidents/{target}/resolve")).await;
    assert_eq!(status, StatusCode::OK);
    let updated: Incident = serde_json::from_slice(&body).unwrap();
    assert!(updated.resolved);
    assert_eq!(updated.id, target);

    let unresolved = list(&router, "/incidents?resolved=false").await;
    assert_eq!(unresolved.len(), 3);
    assert!(unresolved.iter().all(|x| x.id != target));

    let resolved = list(&router, "/incidents?resolved=true").await;
    assert_eq!(resolved.iter().map(|x| x.id).collect::<Vec<_>>(), vec![target]);

    // resolving again is accepted
    let (status, _) = send(&router, Method::PATCH, &format!("/incidents/{target}/resolve")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn resolve_unknown_is_404() {
    let (store, _) = seeded_store(&STARTS).await;
    let router = router(store);

    let (status, _) = send(
        &router,
        Method::PATCH,
        &format!("/incidents/{}/resolve", Uuid::new_v4()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&router, Method::PATCH, "/incidents/not-an-id/resolve").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn form_resolve_redirects_to_dashboard() {
    let (store, created) = seeded_store(&STARTS).await;
    let router = router(store.clone());

    let (status, _) = send(
        &router,
        Method::POST,
        &format!("/incidents/{}/resolve", created[0].id),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert!(store.get_incident(created[0].id).await.unwrap().resolved);
}

#[tokio::test]
async fn dashboard_renders_counts_and_markers() {
    let (store, created) = seeded_store(&STARTS).await;
    store.resolve_incident(created[1].id).await.unwrap();
    let router = router(store);

    let (status, body) = send(&router, Method::GET, "/").await;
    assert_eq!(status, StatusCode::OK);
    let page = String::from_utf8(body).unwrap();
    assert!(page.contains("3 Unresolved Incidents"));
    assert!(page.contains("1 resolved incidents"));
    assert!(page.contains("24-Hour Incident Timeline"));
    // 12:00 is the midpoint and 09:00 sits at 37.5%
    assert!(page.contains("left: 37.500%"));
    assert!(page.contains("<form"));
    assert!(page.contains(&format!("incidents/{}/resolve", created[0].id)));
    for (label, color) in IncidentKind::legend() {
        assert!(page.contains(label));
        assert!(page.contains(&format!("background-color: {color}")));
    }
    assert!(!page.contains(&format!("incidents/{}/resolve", created[1].id)));
}

#[tokio::test]
async fn lists_cameras_and_health() {
    let (store, created) = seeded_store(&STARTS[..1]).await;
    let router = router(store);

    let (status, body) = send(&router, Method::GET, "/cameras").await;
    assert_eq!(status, StatusCode::OK);
    let cameras: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(cameras[0]["id"], created[0].camera_id.to_string());
    assert_eq!(cameras[0]["location"], "Building Main Entrance - Ground Floor");

    let (status, _) = send(&router, Method::GET, "/health").await;
    assert_eq!(status, StatusCode::OK);
}

fn serve(store: Arc<Store>) -> HttpApi {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();
    let server = axum::Server::from_tcp(listener)
        .unwrap()
        .serve(router(store).into_make_service());
    tokio::spawn(server);
    HttpApi::new(format!("http://{addr}").parse().unwrap())
}

#[tokio::test]
async fn http_client_round_trip() {
    let (store, created) = seeded_store(&STARTS).await;
    let api = serve(store);

    let all = api.list(ListFilter::ALL).await.unwrap();
    assert_eq!(all.len(), 4);

    let resolved = api.resolve(created[3].id).await.unwrap();
    assert!(resolved.resolved);
    let unresolved = api.list(ListFilter::UNRESOLVED).await.unwrap();
    assert!(unresolved.iter().all(|x| x.id != created[3].id));

    let missing = Uuid::new_v4();
    assert_eq!(api.resolve(missing).await, Err(SyncError::NotFound(missing)));
}

#[tokio::test]
async fn session_over_http() {
    let (store, created) = seeded_store(&STARTS).await;
    let session = DashboardSession::new(serve(store));
    session.refresh().await.unwrap();
    assert_eq!(session.visible().len(), 4);

    session.resolve(created[0].id).await.unwrap();
    assert_eq!(session.visible().len(), 3);
    assert!(session.visible().iter().all(|x| x.id != created[0].id));
}

#[tokio::test]
async fn unreachable_server_is_transient() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let api = HttpApi::new(format!("http://{addr}").parse().unwrap());
    assert!(matches!(
        api.list(ListFilter::ALL).await,
        Err(SyncError::Transient(_))
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn listing_is_ordered(offsets in proptest::collection::vec(0i64..86_400, 1..20)) {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let starts: Vec<String> = offsets
            .iter()
            .map(|x| Utc.timestamp_opt(*x, 0).unwrap().to_rfc3339())
            .collect();
        let refs: Vec<&str> = starts.iter().map(String::as_str).collect();
        let listed = runtime.block_on(async {
            let (store, _) = seeded_store(&refs).await;
            store.list_incidents(ListFilter::ALL).await
        });
        prop_assert_eq!(listed.len(), offsets.len());
        for pair in listed.windows(2) {
            prop_assert!(pair[0].ts_start >= pair[1].ts_start);
        }
    }
}
