use alloy_provider::{Provider, RootProvider};
use alloy_rpc_client::ClientBuilder;
use clap::Parser;
use eyre::{Result, WrapErr};
use gitpay_server::{AppState, ServerArgs, build_router};
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let args = ServerArgs::parse();
    run(args)
}

#[tokio::main]
async fn run(args: ServerArgs) -> Result<()> {
    let client = ClientBuilder::default().http(args.rpc_url.clone());
    let provider: RootProvider = RootProvider::new(client);
    let state = AppState::new(provider.erased(), &args);

    let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port))
        .await
        .wrap_err_with(|| format!("failed to bind {}:{}", args.host, args.port))?;
    info!(host = %args.host, port = args.port, rpc = %args.rpc_url, token = %args.token, "listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("server error")
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down");
}
