use coraldb::config::ServerConfig;
use coraldb::server;

/// Binds the configured address and serves until interrupted.
///
/// Exits non-zero when the listener cannot be set up (port already in use,
/// bad bind address); a clean ctrl-c shutdown exits zero.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = ServerConfig::from_args(std::env::args().skip(1));

    if let Err(error) = server::run(config).await {
        eprintln!("failed to start server: {error}");
        std::process::exit(1);
    }
}
