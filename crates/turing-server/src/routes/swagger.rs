//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use turing::models::{
    ChatRequest, GenerateResponse, InspectRequest, MemoryResponse, PromptRequest,
    SearchMemoriesRequest, TurnEvent, WipeResponse,
};
use turing::{Role, TurnOutcome, TurnPhase};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Turn endpoints
        super::turn::run_turn,
        // Generation endpoints
        super::generate::generate,
        super::generate::stream,
        super::inspect::inspect,
        // Memory endpoints
        super::memory::list_memories,
        super::memory::search_memories,
        super::memory::wipe_memories,
    ),
    info(
        title = "Turing API",
        version = "0.1.0",
        description = "Local assistant core: session memory, prompt augmentation and streamed generation.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Turn", description = "Turn - Memory-augmented conversation"),
        (name = "Generate", description = "Generate - Memory-free prompts and inspection"),
        (name = "Memory", description = "Memory - Session-scoped semantic store"),
    ),
    components(
        schemas(
            // Turn
            ChatRequest,
            TurnEvent,
            TurnOutcome,
            TurnPhase,
            // Generate
            PromptRequest,
            GenerateResponse,
            InspectRequest,
            // Memory
            Role,
            SearchMemoriesRequest,
            MemoryResponse,
            WipeResponse,
        )
    )
)]
pub struct ApiDoc;
