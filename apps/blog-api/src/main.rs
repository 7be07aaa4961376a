use axum_helpers::create_production_app;
use blog_api::{AppState, Config, build_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    info!(
        "Connecting to MongoDB database: {}",
        config.mongodb.database()
    );

    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await?;

    info!(
        "Successfully connected to MongoDB database: {}",
        config.mongodb.database()
    );

    let state = AppState::with_mongo(&config, mongo_client).await?;
    let router = build_router(&state)?;

    info!(
        images_dir = %config.blog.images_dir.display(),
        posts_per_page = config.blog.posts_per_page,
        "Starting {} {}",
        config.app.name,
        config.app.version
    );

    create_production_app(router, &config.server, Duration::from_secs(30), async move {
        info!("Shutting down: closing MongoDB connections");
        if let Some(client) = state.mongo_client {
            client.shutdown().await;
        }
        info!("MongoDB connection closed successfully");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Blog API shutdown complete");
    Ok(())
}
