use moodscope_core::AppConfig;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("moodscope=info".parse()?),
        )
        .init();

    info!("Starting Moodscope - Instagram psychological state report");

    let config = AppConfig::load()?;
    tokio::fs::create_dir_all(&config.static_dir).await?;
    let port = config.port;

    let state = web::AppState::new(config);
    let app = web::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
