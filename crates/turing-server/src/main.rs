use anyhow::Context;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use turing::{
    EmbeddingProvider, EmbeddingService, GenerationClient, InjectionStrategy, NoInjection,
    TuringConfig,
};

mod adapters;
mod application;
mod routes;
#[cfg(test)]
mod test_support;

use adapters::{
    HashingEmbedding, KeywordFileRouting, LocalFileSkill, OllamaClient, OllamaEmbedding,
    SqliteMemoryStore,
};
use application::TurnOrchestrator;

/// Orchestrator over the concrete store; the client stays swappable
pub type AppOrchestrator = TurnOrchestrator<SqliteMemoryStore, dyn GenerationClient>;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<AppOrchestrator>,
    pub injection: Arc<dyn InjectionStrategy>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("🧠 Turing initializing...");

    let config = TuringConfig::load(None).context("Failed to load configuration")?;

    let embedder: Arc<dyn EmbeddingService> = match config.embedding.provider {
        EmbeddingProvider::Hashing => {
            tracing::info!("🧬 Hashing embedder ({} dims)", config.embedding.dimensions);
            Arc::new(HashingEmbedding::new(config.embedding.dimensions))
        }
        EmbeddingProvider::Ollama => Arc::new(
            OllamaEmbedding::connect(&config)
                .await
                .context("Failed to prepare the embedding model")?,
        ),
    };

    let store = SqliteMemoryStore::open(&config.memory_db_path(), embedder)
        .await
        .context("Failed to open memory store")?;

    let client: Arc<dyn GenerationClient> = Arc::new(
        OllamaClient::connect(&config)
            .await
            .context("Failed to reach the generation service")?,
    );

    let injection: Arc<dyn InjectionStrategy> = if config.routing.file_injection {
        let base_dir = config.file_base_dir();
        tracing::info!("📂 File routing enabled (base: {})", base_dir.display());
        Arc::new(KeywordFileRouting::new(
            Arc::new(LocalFileSkill::new(base_dir)),
            config.routing.known_folders.clone(),
        ))
    } else {
        tracing::warn!("⚠️  File routing disabled");
        Arc::new(NoInjection)
    };

    let state = AppState {
        orchestrator: Arc::new(TurnOrchestrator::new(
            Arc::new(store),
            client,
            config.memory.retrieval_limit,
        )),
        injection,
    };

    let listener = TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;

    tracing::info!("📚 Swagger UI: http://{}/swagger-ui", config.server.bind);
    tracing::info!("✅ Turing ready on {}", config.server.bind);

    axum::serve(listener, routes::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("👋 Turing stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
}
