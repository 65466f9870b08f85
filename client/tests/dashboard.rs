//! Dashboard refresh tests against a mock metrics endpoint.

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use sigil_client::{Config, Dashboard, DashboardState, TicketServiceClient};
use sigil_core::wire::paths;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

async fn serve(app: Router) -> TicketServiceClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TicketServiceClient::new(Config::new(format!("http://{addr}"))).unwrap()
}

/// Metrics route whose first request is answered late with a distinct endpoint.
fn slow_first_metrics(hits: Arc<AtomicUsize>) -> Router {
    Router::new().route(
        paths::API_USAGE_METRICS,
        get(move || {
            let n = hits.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                let endpoint = if n == 1 {
                    tokio::time::sleep(Duration::from_millis(400)).await;
                    "/stale"
                } else {
                    "/fresh"
                };
                Json(json!([
                    { "api_endpoint": endpoint, "http_method": "POST", "ticket_type": "GROUP", "hit_count": n }
                ]))
            }
        }),
    )
}

/// Wait until the published state satisfies `done`, collecting every state seen.
async fn collect_until(
    rx: &mut watch::Receiver<DashboardState>,
    done: impl Fn(&DashboardState) -> bool,
) -> Vec<DashboardState> {
    let mut seen = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            rx.changed().await.unwrap();
            let state = rx.borrow_and_update().clone();
            let finished = done(&state);
            seen.push(state);
            if finished {
                break;
            }
        }
    })
    .await
    .expect("dashboard did not publish in time");
    seen
}

#[tokio::test]
async fn newest_refresh_wins_over_slow_stale_one() {
    let hits = Arc::new(AtomicUsize::new(0));
    let client = serve(slow_first_metrics(Arc::clone(&hits))).await;

    let dashboard = Dashboard::start(client, Duration::from_millis(50));
    let mut rx = dashboard.subscribe();

    let seen = collect_until(&mut rx, |s| s.sequence >= 3).await;
    assert!(seen.windows(2).all(|w| w[0].sequence < w[1].sequence));

    // Give the slow first fetch time to finish; it must not be published.
    tokio::time::sleep(Duration::from_millis(600)).await;
    let latest = dashboard.latest();
    let snapshot = latest.snapshot.expect("snapshot published");
    assert!(snapshot.sequence > 1);
    assert_eq!(snapshot.metrics[0].api_endpoint, "/fresh");
    assert_eq!(snapshot.summary.total_hits, snapshot.metrics[0].hit_count);
    assert!(hits.load(Ordering::SeqCst) >= 3);
}

#[tokio::test]
async fn failed_refresh_keeps_last_snapshot() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let app = Router::new().route(
        paths::API_USAGE_METRICS,
        get(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n == 1 {
                    Json(json!([
                        { "api_endpoint": "/view", "http_method": "POST", "ticket_type": "THREAD", "hit_count": 7 }
                    ]))
                    .into_response()
                } else {
                    (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "message": "metrics offline" })))
                        .into_response()
                }
            }
        }),
    );
    let client = serve(app).await;

    let dashboard = Dashboard::start(client, Duration::from_millis(50));
    let mut rx = dashboard.subscribe();

    let seen = collect_until(&mut rx, |s| s.last_error.is_some()).await;
    let failed = seen.last().unwrap();
    assert_eq!(failed.last_error.as_deref(), Some("metrics offline"));
    let kept = failed.snapshot.as_ref().expect("earlier snapshot kept");
    assert_eq!(kept.metrics[0].api_endpoint, "/view");
    assert_eq!(kept.summary.total_hits, 7);
}

#[tokio::test]
async fn dropping_dashboard_stops_refreshing() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let app = Router::new().route(
        paths::API_USAGE_METRICS,
        get(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Json(json!([])) }
        }),
    );
    let client = serve(app).await;

    let dashboard = Dashboard::start(client, Duration::from_millis(20));
    let mut rx = dashboard.subscribe();
    collect_until(&mut rx, |s| s.sequence >= 2).await;
    dashboard.shutdown();

    tokio::time::sleep(Duration::from_millis(100)).await;
    let after_stop = hits.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(hits.load(Ordering::SeqCst), after_stop);
}
