use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Query, State},
    response::Html,
    routing::get,
};
use cityweather_core::{
    AccuWeatherClient, Dashboard, DashboardSettings, build_dashboard, parse_city_list,
};
use serde::{Deserialize, Serialize};

use crate::page;

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<AccuWeatherClient>,
    pub settings: Arc<DashboardSettings>,
}

#[derive(Debug, Deserialize)]
struct ForecastQuery {
    cities: Option<String>,
    days: Option<u32>,
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/forecast", get(forecast))
        .route("/api/health", get(health))
        .with_state(state)
}

pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind dashboard to {addr}"))?;
    tracing::info!("dashboard listening on http://{addr}");

    axum::serve(listener, build_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Dashboard server failed")?;
    Ok(())
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(page::render(&state.settings))
}

async fn forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Json<Dashboard> {
    let cities = query.cities.as_deref().map_or_else(
        || parse_city_list(&state.settings.default_cities),
        parse_city_list,
    );
    let days = query.days.unwrap_or(state.settings.default_days.days());

    tracing::debug!(?cities, days, "building dashboard");
    Json(build_dashboard(&state.client, &cities, days).await)
}

async fn health() -> Json<HealthData> {
    Json(HealthData { status: "ok" })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, stopping dashboard");
}
