use reeldrop_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration; a missing store setting aborts startup here
    let config = Config::from_env()?;

    // Initialize the application (telemetry, storage, routes)
    let (_state, router) = reeldrop_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    reeldrop_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
