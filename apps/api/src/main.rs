mod config;
mod errors;
mod extract;
mod routes;
mod screening;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::screening::lexicon::{LemmaDictionary, SkillVocabulary, StopWords};
use crate::screening::matcher::Screener;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Screener API v{}", env!("CARGO_PKG_VERSION"));

    // Load the lexicons once; the engine never touches disk afterwards.
    let vocabulary = SkillVocabulary::load(config.skills_file.as_deref())
        .context("loading skill vocabulary")?;
    let stop_words =
        StopWords::load(config.stopwords_file.as_deref()).context("loading stop words")?;
    let lemmas =
        LemmaDictionary::load(config.lemmas_file.as_deref()).context("loading lemma dictionary")?;
    info!(
        terms = vocabulary.len(),
        version = vocabulary.version(),
        "Skill vocabulary loaded"
    );
    info!(
        stop_words = stop_words.len(),
        lemmas = lemmas.len(),
        "Normalization lexicons loaded"
    );

    let screener = Screener::new(vocabulary, stop_words, lemmas)
        .context("compiling skill vocabulary patterns")?;

    let state = AppState {
        config: config.clone(),
        screener: Arc::new(screener),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
