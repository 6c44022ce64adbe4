use std::net::SocketAddr;

use anyhow::Result;

use audio_cartographer::server::{router, SERVER_PORT};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let addr = SocketAddr::from(([0, 0, 0, 0], SERVER_PORT));
    log::info!("audio-cartographer listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router()).await?;

    Ok(())
}
