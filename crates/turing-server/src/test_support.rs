//! Test doubles shared by unit tests

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::sync::Semaphore;

use turing::domain::generation_failure;
use turing::{
    DomainError, Fragment, FragmentStream, GenerationClient, MemoryRecord, MemoryStore, Role,
    ScoredRecord,
};

use crate::adapters::{HashingEmbedding, SqliteMemoryStore};

pub async fn memory_store() -> (Arc<SqliteMemoryStore>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteMemoryStore::open(
        &dir.path().join("memory.sqlite3"),
        Arc::new(HashingEmbedding::new(384)),
    )
    .await
    .unwrap();
    (Arc::new(store), dir)
}

/// Replays fixed fragments, optionally ending with a transport failure
pub struct ScriptedGeneration {
    fragments: Vec<String>,
    failure: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGeneration {
    pub fn new(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            failure: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(fragments: &[&str], failure: &str) -> Self {
        Self {
            failure: Some(failure.to_string()),
            ..Self::new(fragments)
        }
    }

    /// Prompts received, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationClient for ScriptedGeneration {
    async fn generate(&self, prompt: &str) -> String {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.failure {
            Some(failure) => generation_failure(failure),
            None => self.fragments.concat(),
        }
    }

    fn stream(&self, prompt: &str) -> FragmentStream {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let mut fragments: Vec<Fragment> =
            self.fragments.iter().map(Fragment::token).collect();
        if let Some(failure) = &self.failure {
            fragments.push(Fragment::diagnostic(failure));
        }
        Box::pin(futures::stream::iter(fragments))
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_id(&self) -> &str {
        "scripted-1"
    }
}

/// Holds every stream open until [`GatedGeneration::release`] is called
pub struct GatedGeneration {
    gate: Arc<Semaphore>,
}

impl Default for GatedGeneration {
    fn default() -> Self {
        Self {
            gate: Arc::new(Semaphore::new(0)),
        }
    }
}

impl GatedGeneration {
    /// Let one waiting (or future) stream finish
    pub fn release(&self) {
        self.gate.add_permits(1);
    }
}

#[async_trait]
impl GenerationClient for GatedGeneration {
    async fn generate(&self, _prompt: &str) -> String {
        "gated".to_string()
    }

    fn stream(&self, _prompt: &str) -> FragmentStream {
        let gate = self.gate.clone();
        Box::pin(futures::stream::once(async move {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
            Fragment::token("gated")
        }))
    }

    fn provider_name(&self) -> &str {
        "gated"
    }

    fn model_id(&self) -> &str {
        "gated-1"
    }
}

/// Store whose every operation fails
pub struct FailingStore;

#[async_trait]
impl MemoryStore for FailingStore {
    async fn save(&self, _: &str, _: Role, _: &str) -> Result<Option<MemoryRecord>, DomainError> {
        Err(DomainError::Persistence("disk full".to_string()))
    }

    async fn search(&self, _: &str, _: &str, _: usize) -> Result<Vec<ScoredRecord>, DomainError> {
        Err(DomainError::Retrieval("index corrupted".to_string()))
    }

    async fn history(&self, _: &str, _: usize) -> Result<Vec<MemoryRecord>, DomainError> {
        Err(DomainError::Retrieval("index corrupted".to_string()))
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Err(DomainError::Retrieval("index corrupted".to_string()))
    }

    async fn wipe(&self) -> Result<(), DomainError> {
        Err(DomainError::Persistence("disk full".to_string()))
    }
}

pub async fn app_state(client: Arc<dyn GenerationClient>) -> (crate::AppState, TempDir) {
    let (store, dir) = memory_store().await;
    let state = crate::AppState {
        orchestrator: Arc::new(crate::application::TurnOrchestrator::new(store, client, 5)),
        injection: Arc::new(turing::NoInjection),
    };
    (state, dir)
}

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn serve(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
