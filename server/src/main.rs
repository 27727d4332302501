use std::net::SocketAddr;

use clap::Parser;

mod handlers;
mod logic;
mod sessions;
mod state;

use crate::state::AppState;

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Port to listen on; falls back to $PORT, then 3000.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let port = args
        .port
        .or_else(|| std::env::var("PORT").ok().and_then(|value| value.parse().ok()))
        .unwrap_or(3000);

    let state = AppState::default();
    let app = handlers::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%port, "scrawlboard coordinator listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app).await.expect("server failed");
}
