use routefinder::config::Config;
use routefinder::engine::Engine;
use routefinder::error::Error;
use routefinder::server::serve;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    tracing::debug!(?config, "configuration loaded");

    let engine = Engine::new(&config);

    serve(engine, config.listen_addr).await
}
