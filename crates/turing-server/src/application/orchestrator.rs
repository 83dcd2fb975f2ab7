//! Turn Orchestrator (Use Case)
//!
//! Runs one memory-augmented turn: retrieve context, augment the prompt,
//! stream the reply to a sink, then persist both sides of the exchange.

use futures::StreamExt;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use turing::domain::services::augment_prompt;
use turing::{
    DomainError, FragmentSink, GenerationClient, MemoryStore, Role, Turn, TurnOutcome, TurnPhase,
    TurnRequest,
};

/// Application service for conversation turns
pub struct TurnOrchestrator<M: MemoryStore, G: GenerationClient + ?Sized> {
    store: Arc<M>,
    client: Arc<G>,
    retrieval_limit: usize,
    active: Mutex<HashSet<String>>,
}

/// Releases the session when the turn ends, however it ends
struct SessionGuard<'a> {
    active: &'a Mutex<HashSet<String>>,
    session_id: String,
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        let mut active = self
            .active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        active.remove(&self.session_id);
    }
}

impl<M: MemoryStore, G: GenerationClient + ?Sized> TurnOrchestrator<M, G> {
    pub fn new(store: Arc<M>, client: Arc<G>, retrieval_limit: usize) -> Self {
        Self {
            store,
            client,
            retrieval_limit: retrieval_limit.max(1),
            active: Mutex::new(HashSet::new()),
        }
    }

    pub fn store(&self) -> &Arc<M> {
        &self.store
    }

    pub fn client(&self) -> &Arc<G> {
        &self.client
    }

    /// Whether a turn is currently running for `session_id`
    pub fn is_busy(&self, session_id: &str) -> bool {
        self.active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(session_id)
    }

    fn claim(&self, session_id: &str) -> Result<SessionGuard<'_>, DomainError> {
        let mut active = self
            .active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !active.insert(session_id.to_string()) {
            return Err(DomainError::session_busy(session_id));
        }
        Ok(SessionGuard {
            active: &self.active,
            session_id: session_id.to_string(),
        })
    }

    /// Run one turn, delivering every fragment to `sink` as it arrives.
    ///
    /// Retrieval failures degrade to "no context". Persistence failures are
    /// logged and reported in the outcome; the streamed reply stands.
    pub async fn run<S>(
        &self,
        request: TurnRequest,
        sink: &mut S,
    ) -> Result<TurnOutcome, DomainError>
    where
        S: FragmentSink + ?Sized,
    {
        request.validate()?;
        let _guard = self.claim(&request.session_id)?;

        let mut turn = Turn::new(request);
        let session_id = turn.request.session_id.clone();

        turn.enter(TurnPhase::Retrieving);
        let context = match self
            .store
            .retrieve(&session_id, &turn.request.user_text, self.retrieval_limit)
            .await
        {
            Ok(context) => context,
            Err(e) => {
                tracing::warn!(
                    session_id = %session_id,
                    "Memory retrieval failed, continuing without context: {}",
                    e
                );
                String::new()
            }
        };
        turn.context_used = !context.is_empty();
        turn.augmented_prompt = augment_prompt(&turn.request.outbound_text(), &context);

        turn.enter(TurnPhase::Streaming);
        let mut fragments = self.client.stream(&turn.augmented_prompt);
        while let Some(fragment) = fragments.next().await {
            sink.deliver(&fragment.text);
            turn.absorb(&fragment);
        }

        turn.enter(TurnPhase::Persisting);
        let mut warnings = Vec::new();
        let exchange = [
            (Role::User, turn.request.user_text.clone()),
            (Role::Assistant, turn.response.clone()),
        ];
        for (role, text) in exchange {
            if let Err(e) = self.store.save(&session_id, role, &text).await {
                tracing::warn!(
                    session_id = %session_id,
                    "Failed to persist {} memory: {}",
                    role,
                    e
                );
                warnings.push(e.to_string());
            }
        }

        if turn.failed() {
            turn.enter(TurnPhase::Failed);
        }
        turn.enter(TurnPhase::Idle);

        let outcome = turn.into_outcome(warnings);
        tracing::info!(
            session_id = %session_id,
            fragments = outcome.fragment_count,
            context = outcome.context_used,
            "💬 Turn finished ({})",
            outcome.phase
        );
        Ok(outcome)
    }

    /// Stream a reply without reading or writing memory.
    ///
    /// Returns the concatenated text.
    pub async fn stream_ephemeral<S>(
        &self,
        prompt: &str,
        sink: &mut S,
    ) -> Result<String, DomainError>
    where
        S: FragmentSink + ?Sized,
    {
        if prompt.trim().is_empty() {
            return Err(DomainError::empty_text("prompt"));
        }

        let mut response = String::new();
        let mut fragments = self.client.stream(prompt);
        while let Some(fragment) = fragments.next().await {
            sink.deliver(&fragment.text);
            response.push_str(&fragment.text);
        }
        Ok(response)
    }

    /// One-shot, memory-free generation
    pub async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        if prompt.trim().is_empty() {
            return Err(DomainError::empty_text("prompt"));
        }
        Ok(self.client.generate(prompt).await)
    }
}
