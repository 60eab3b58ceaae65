mod config;
mod store;
mod sync_api;
mod webhook;

use std::{path::Path, sync::Arc};

use anyhow::Context;
use config::Config;
use migration::MigratorTrait;
use poem::{
    EndpointExt, Route, Server,
    listener::TcpListener,
    middleware::{Cors, Tracing as PoemTracing},
};
use poem_openapi::OpenApiService;
use sea_orm::Database;
use store::SeaOrmStore;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt::SubscriberBuilder, prelude::*};
use webhook::WebhookClient;

type KosyncResult<T> = anyhow::Result<T>;

#[tokio::main]
async fn main() -> KosyncResult<()> {
    // Initialize tracing (logs). Respect RUST_LOG if set, default to info for our crate and warn for deps.
    let default_filter = format!(
        "{}=info,poem=info,reqwest=warn,h2=warn",
        env!("CARGO_PKG_NAME")
    );
    let env_filter = std::env::var("RUST_LOG").unwrap_or(default_filter);
    SubscriberBuilder::default()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_target(false)
        .with_level(true)
        .pretty()
        .finish()
        .with(ErrorLayer::default())
        .init();
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "starting KOReader progress sync"
    );
    // Load environment variables from .env files
    if Path::new(".env.local").exists() {
        dotenvy::from_filename(".env.local")?;
    } else if Path::new(".env").exists() {
        dotenvy::from_filename(".env")?;
    };
    let config = Config::load();
    match config.validate() {
        Ok(_) => {}
        Err(e) => {
            return Err(anyhow::anyhow!(e));
        }
    }
    tracing::info!(
        open_registrations = config.open_registrations,
        receive_random_device_id = config.receive_random_device_id,
        webhook_enabled = config.webhook_enabled,
        "loaded configuration"
    );

    let db_conn = Database::connect(&config.db_connection_string)
        .await
        .with_context(|| "Failed to connect to database")?;

    migration::Migrator::up(&db_conn, None)
        .await
        .with_context(|| "Failed to run database migrations")?;

    let store = SeaOrmStore::new(db_conn);
    let webhook = if config.webhook_enabled {
        Some(Arc::new(WebhookClient::new(&config.webhook_url)?))
    } else {
        None
    };

    run_poem(Arc::new(store), Arc::new(config), webhook).await?;
    Ok(())
}

pub async fn run_poem(
    store: Arc<SeaOrmStore>,
    config: Arc<Config>,
    webhook: Option<Arc<WebhookClient>>,
) -> KosyncResult<()> {
    let version = env!("CARGO_PKG_VERSION");
    let api = sync_api::KosyncApi {
        store,
        config,
        webhook,
    };
    let api_service =
        OpenApiService::new(api, "KOReader Sync API", version).server("http://localhost:3000");
    let ui = api_service.rapidoc();
    let spec = api_service.spec();
    let route = Route::new()
        .nest("/", api_service)
        .nest("/ui", ui)
        .nest("/spec", poem::endpoint::make_sync(move |_| spec.clone()))
        .with(Cors::new())
        .with(PoemTracing);

    let bind_addr = "0.0.0.0:3000";
    tracing::info!(%bind_addr, "starting HTTP server");
    Server::new(TcpListener::bind(bind_addr)).run(route).await?;
    Ok(())
}
