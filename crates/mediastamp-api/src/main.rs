use mediastamp_core::Config;

// Use mimalloc as the global allocator for better performance and lower
// fragmentation, especially on musl-based systems inside containers.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration; store credentials are validated here and a
    // misconfigured process exits before serving.
    let config = Config::from_env()?;

    // Initialize the application (telemetry, store, pipeline, routes)
    let (_state, router) = mediastamp_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    mediastamp_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
