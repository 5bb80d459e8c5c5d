use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;
use std::time::Duration;

mod ai;
mod api;
mod attendance;
mod config;
mod db;
mod docs;
mod model;
mod routes;
mod state;
mod store;
mod utils;

use config::Config;
use db::init_db;

use crate::ai::{OpenAICompatibleProvider, TextGenerator};
use crate::attendance::LocalClock;
use crate::docs::ApiDoc;
use crate::state::AppState;
use crate::store::{BlobStore, MemoryBlobStore, MySqlBlobStore};
use crate::utils::{roster_cache, seed};
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Rollcall attendance service"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let blob: Arc<dyn BlobStore> = match &config.database_url {
        Some(url) => Arc::new(MySqlBlobStore::new(init_db(url).await?)),
        None => {
            warn!("DATABASE_URL not set, attendance data is kept in memory only");
            Arc::new(MemoryBlobStore::new())
        }
    };

    let generator: Arc<dyn TextGenerator> = Arc::new(OpenAICompatibleProvider::new(
        config.ai_base_url.clone(),
        config.ai_api_key.clone(),
        config.ai_model.clone(),
        Duration::from_secs(config.ai_timeout_secs),
    )?);

    let state = AppState::new(blob, &config, generator, Arc::new(LocalClock));

    if config.seed_demo_data {
        seed::seed_demo_course(&state.courses)
            .await
            .context("Failed to seed demo course")?;
    }

    let warmup_state = state.clone();
    actix_web::rt::spawn(async move {
        if let Err(e) =
            roster_cache::warmup_roster_cache(&warmup_state.roster_cache, &warmup_state.courses).await
        {
            warn!(error = %e, "Failed to warm up roster cache");
        }
    });

    let server_addr = config.server_addr.clone();
    let state = Data::new(state);

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(state.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, config.clone()))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run()
    .await?;

    Ok(())
}
