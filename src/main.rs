use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveTime;
use tokio::net::TcpListener;
use tracing::{info, warn};

use huddle::api;
use huddle::catalog;
use huddle::engine::Engine;
use huddle::model::OperatingHours;
use huddle::sweeper;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let metrics_port: Option<u16> = std::env::var("HUDDLE_METRICS_PORT")
        .ok()
        .and_then(|s| s.parse().ok());
    huddle::observability::init(metrics_port);

    let port = std::env::var("HUDDLE_PORT").unwrap_or_else(|_| "8080".into());
    let bind = std::env::var("HUDDLE_BIND").unwrap_or_else(|_| "0.0.0.0".into());
    let rooms_file = std::env::var("HUDDLE_ROOMS_FILE").unwrap_or_else(|_| "./rooms.json".into());
    let sweep_secs: u64 = std::env::var("HUDDLE_SWEEP_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(60);
    let open: NaiveTime = std::env::var("HUDDLE_OPEN")
        .ok()
        .and_then(|s| NaiveTime::parse_from_str(&s, "%H:%M").ok())
        .unwrap_or_else(|| OperatingHours::default().open);
    let close: NaiveTime = std::env::var("HUDDLE_CLOSE")
        .ok()
        .and_then(|s| NaiveTime::parse_from_str(&s, "%H:%M").ok())
        .unwrap_or_else(|| OperatingHours::default().close);

    let engine = Arc::new(Engine::new(OperatingHours::new(open, close)));

    let rooms_path = PathBuf::from(&rooms_file);
    if rooms_path.exists() {
        let rooms = catalog::load_rooms(&rooms_path)?;
        info!("loaded {} rooms from {rooms_file}", rooms.len());
        for room in rooms {
            engine.register_room(room).await?;
        }
    } else {
        warn!("rooms file {rooms_file} not found, starting with an empty catalog");
    }

    let sweep_engine = engine.clone();
    tokio::spawn(async move {
        sweeper::run_sweeper(sweep_engine, Duration::from_secs(sweep_secs)).await;
    });

    let addr = format!("{bind}:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!("huddle listening on {addr}");
    info!("  rooms: {}", engine.room_count());
    info!("  hours: {open}..{close}");
    info!(
        "  metrics: {}",
        metrics_port.map_or("disabled".to_string(), |p| format!(
            "http://0.0.0.0:{p}/metrics"
        ))
    );

    let router = api::build_router(engine);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("huddle stopped");
    Ok(())
}

/// Resolve on SIGTERM/ctrl-c; axum stops accepting and drains in-flight
/// requests.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to register SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
    }
}
