use std::path::Path;
use tracing_subscriber::EnvFilter;

// The entry point when running `cargo run -p web-server`.
// It reads `config.toml` from the working directory and serves the dashboard API.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = configuration::load_config(Path::new("config.toml"))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    web_server::run_server(config).await
}
