use std::net::SocketAddr;
use tokio::fs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use workout_map::{
    dom::HeadlessDom, load_blobs, map::HeadlessMap, router, AppState, Settings, Tracker,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let settings = Settings::from_env();
    if let Some(parent) = settings.data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let blobs = load_blobs(&settings.data_path).await;
    let mut tracker = Tracker::new(HeadlessMap::new(), HeadlessDom::new(), blobs, settings.zoom);
    tracker.restore();
    if let Some(position) = settings.start_position.clone() {
        tracker.geolocated(position);
    }

    let state = AppState::new(settings.data_path.clone(), tracker);
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
