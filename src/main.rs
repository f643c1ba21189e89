use allowance_ledger::config::Config;
use allowance_ledger::server::{build_app, serve};
use allowance_ledger::VERSION;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "allowance_ledger=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!("Starting allowance-ledger {} on {}", VERSION, config.address());

    let host = config.host.clone();
    let port = config.port;
    let (_state, app) = build_app(config).expect("Failed to build application");

    let (port, handle) = serve(app, &host, port)
        .await
        .expect("Failed to bind address");

    tracing::info!("Listening on http://{}:{}", host, port);

    if let Err(e) = handle.await {
        tracing::error!("Server task failed: {}", e);
    }
}
