//! deckprint
//!
//! Renders Magic: The Gathering deck box artifacts (packing lists and theme
//! cards) as card-sized PNGs and lays queued card images out on print-ready
//! PDF sheets with duplex alignment and crop marks.

use actix_web::{web, App, HttpServer, middleware};
use anyhow::Context;
use tracing::info;
use tracing_actix_web::TracingLogger;
use std::sync::Arc;
use std::time::{Duration, Instant};

mod api;
mod domain;
mod engine;
mod config;

use crate::api::SessionStore;
use crate::config::{Settings, SymbolSourceKind};
use crate::engine::{DirSymbolSource, FontBook, HttpSymbolSource, Renderer, SymbolResolver, SymbolSource};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Application state shared across all handlers
pub struct AppState {
    pub settings: Settings,
    pub renderer: Arc<Renderer>,
    pub sessions: SessionStore,
    pub started_at: Instant,
}

fn symbol_source(settings: &Settings) -> anyhow::Result<Arc<dyn SymbolSource>> {
    let symbols = &settings.symbols;
    let source: Arc<dyn SymbolSource> = match symbols.source {
        SymbolSourceKind::Dir => {
            info!(path = %symbols.path.display(), "Loading mana symbols from directory");
            Arc::new(DirSymbolSource::new(&symbols.path))
        }
        SymbolSourceKind::Http => {
            let base_url = symbols
                .base_url
                .as_deref()
                .context("symbols.base_url is required for the http symbol source")?;
            info!(base_url = %base_url, "Loading mana symbols over HTTP");
            Arc::new(HttpSymbolSource::new(base_url)?)
        }
    };
    Ok(source)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber for structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("deckprint=info,actix_web=info"))
        )
        .json()
        .init();

    let settings = Settings::load().context("Failed to load configuration")?;
    let bind_addr = format!("{}:{}", settings.server.host, settings.server.port);

    info!(
        "Starting deckprint v{} on {}",
        env!("CARGO_PKG_VERSION"),
        bind_addr
    );

    // Text measurement needs every face, so fail fast on a bad font
    let fonts = Arc::new(FontBook::load(&settings.fonts).context("Failed to load fonts")?);
    info!("Loaded {} font faces", fonts.face_count());

    let symbols = Arc::new(SymbolResolver::new(symbol_source(&settings)?));
    let renderer = Arc::new(Renderer::new(fonts, symbols).context("Failed to initialize renderer")?);

    let workers = settings.server.workers.unwrap_or_else(|| num_cpus::get() * 2);
    let idle_ttl = settings.sessions.idle_ttl();

    // Create shared application state
    let app_state = web::Data::new(AppState {
        settings,
        renderer,
        sessions: SessionStore::new(idle_ttl),
        started_at: Instant::now(),
    });

    // Sheet sessions hold full card images, so idle ones are swept
    let sweeper_state = app_state.clone();
    actix_web::rt::spawn(async move {
        let mut tick = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            tick.tick().await;
            let evicted = sweeper_state.sessions.evict_idle();
            if evicted > 0 {
                info!(evicted, "Evicted idle sheet sessions");
            }
        }
    });

    // Configure and start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            // Card images arrive as base64 JSON
            .app_data(web::JsonConfig::default().limit(32 * 1024 * 1024))
            .wrap(TracingLogger::default())
            .wrap(middleware::Compress::default())
            .wrap(
                middleware::DefaultHeaders::new()
                    .add(("X-Service", "deckprint"))
                    .add(("X-Version", env!("CARGO_PKG_VERSION")))
            )
            .configure(api::configure_routes)
    })
    .workers(workers)
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}
