use crate::status_collector::StatusCollector;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use prometheus::{Encoder, Registry, TextEncoder};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared serving state: the collector plus the registry it writes into.
///
/// Every scrape triggers its own fresh fetch pair against the vendor API;
/// concurrent scrapes are not coalesced, so an aggressive scrape interval
/// multiplies vendor API traffic accordingly.
pub struct AppState {
    collector: StatusCollector,
    registry: Registry,
}

impl AppState {
    pub fn new(collector: StatusCollector, registry: Registry) -> Self {
        Self {
            collector,
            registry,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/metrics", get(render_metrics))
        .with_state(state)
}

/// Binds the listener and serves the metrics endpoint until the process
/// exits.
pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("metrics server listening on {addr}");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn render_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    // A steady-state poll failure is logged and tolerated; the scrape still
    // renders whatever the pass (and prior passes) left in the registry.
    if let Err(error) = state.collector.collect().await {
        warn!("collection pass failed: {error}");
    }

    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    match encoder.encode(&state.registry.gather(), &mut buffer) {
        Ok(()) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, encoder.format_type().to_string())],
            buffer,
        )
            .into_response(),
        Err(error) => {
            warn!("failed to encode metrics: {error}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::myenergi_api::MyEnergiClient;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    async fn scrape(state: Arc<AppState>) -> (StatusCode, String) {
        let response = router(state)
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn state_for(server: &mockito::ServerGuard) -> Arc<AppState> {
        let client =
            MyEnergiClient::new(server.url(), "12345678".to_string(), "secret".to_string());
        let registry = Registry::new();
        let collector = StatusCollector::new(client, &registry).unwrap();
        Arc::new(AppState::new(collector, registry))
    }

    #[tokio::test]
    async fn scrape_renders_text_exposition() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/cgi-jstatus-Z")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"zappi": [{"sno": 16000001, "sta": 1, "pst": "A", "zmo": 4, "vol": 2310, "fwv": "3560S3.142"}]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/cgi-jstatus-E")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"eddi": []}"#)
            .create_async()
            .await;

        let (status, body) = scrape(state_for(&server)).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(
            r#"myenergi_info{firmware_version="3560S3.142",model="zappi",serial="16000001"} 1"#
        ));
        assert!(body.contains(
            r#"myenergi_status{model="zappi",serial="16000001",status="paused"} 1"#
        ));
        assert!(body.contains(
            r#"myenergi_status{model="zappi",serial="16000001",status="charging"} 0"#
        ));
        assert!(body.contains(r#"myenergi_supply_voltage{model="zappi",serial="16000001"} 231"#));
    }

    #[tokio::test]
    async fn scrape_survives_total_vendor_outage() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/cgi-jstatus-Z")
            .with_status(500)
            .create_async()
            .await;
        server
            .mock("GET", "/cgi-jstatus-E")
            .with_status(500)
            .create_async()
            .await;

        let (status, body) = scrape(state_for(&server)).await;

        // Scrape succeeds with an empty pass rather than erroring out.
        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains("myenergi_info{"));
    }
}
