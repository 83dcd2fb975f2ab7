//! SQLite implementation of MemoryStore
//!
//! One table holds every session. Embeddings live next to the text as
//! little-endian f32 BLOBs and are ranked in process by cosine distance.
//! Each row remembers which embedder produced its vector; recall only
//! compares vectors from the embedder currently configured.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::SqliteConnection;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use turing::domain::services::rank;
use turing::{DomainError, EmbeddingService, MemoryRecord, MemoryStore, Role, ScoredRecord};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS memory_records (
    id          TEXT PRIMARY KEY,
    session_id  TEXT NOT NULL,
    role        TEXT NOT NULL,
    text        TEXT NOT NULL,
    timestamp   TEXT NOT NULL,
    embedding   BLOB NOT NULL,
    embedder    TEXT NOT NULL
)
"#;

const CREATE_SESSION_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_memory_records_session ON memory_records (session_id, timestamp)";

/// SQLite implementation of MemoryStore
pub struct SqliteMemoryStore {
    pool: SqlitePool,
    embedder: Arc<dyn EmbeddingService>,
    /// `name/dimensions` of `embedder`, stored on every row
    fingerprint: String,
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct MemoryRow {
    id: String,
    session_id: String,
    role: String,
    text: String,
    timestamp: String,
    embedding: Vec<u8>,
}

impl TryFrom<MemoryRow> for MemoryRecord {
    type Error = DomainError;

    fn try_from(row: MemoryRow) -> Result<Self, Self::Error> {
        let role: Role = row.role.parse().map_err(DomainError::Retrieval)?;
        let timestamp = DateTime::parse_from_rfc3339(&row.timestamp)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| DomainError::Retrieval(format!("bad timestamp on {}: {}", row.id, e)))?;

        Ok(Self {
            id: row.id,
            session_id: row.session_id,
            role,
            text: row.text,
            timestamp,
            embedding: embedding_from_bytes(&row.embedding),
        })
    }
}

impl SqliteMemoryStore {
    /// Open (or create) the store at `path`
    pub async fn open(
        path: &Path,
        embedder: Arc<dyn EmbeddingService>,
    ) -> Result<Self, DomainError> {
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await.map_err(|e| {
                DomainError::Persistence(format!("cannot create {}: {}", dir.display(), e))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(persistence)?;

        let fingerprint = format!("{}/{}", embedder.name(), embedder.dimensions());

        let mut conn = pool.acquire().await.map_err(persistence)?;
        ensure_schema(&mut conn).await.map_err(persistence)?;

        let foreign: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT embedder, COUNT(*) FROM memory_records
            WHERE embedder <> ?1
            GROUP BY embedder
            "#,
        )
        .bind(&fingerprint)
        .fetch_all(&mut *conn)
        .await
        .map_err(persistence)?;
        drop(conn);

        for (other, count) in &foreign {
            tracing::warn!(
                "⚠️  {} memories were embedded by '{}' and are left out of recall under '{}'. \
                 Switch back or wipe memory to clear them.",
                count,
                other,
                fingerprint
            );
        }

        tracing::info!(
            "🗄️  Memory store opened at {} (embedder: {})",
            path.display(),
            fingerprint
        );

        Ok(Self {
            pool,
            embedder,
            fingerprint,
        })
    }

    /// Session rows whose vectors are comparable with the current embedder
    async fn session_rows(&self, session_id: &str) -> Result<Vec<MemoryRecord>, DomainError> {
        let mut conn = self.pool.acquire().await.map_err(retrieval)?;
        ensure_schema(&mut conn).await.map_err(retrieval)?;

        let rows = sqlx::query_as::<_, MemoryRow>(
            r#"
            SELECT id, session_id, role, text, timestamp, embedding
            FROM memory_records
            WHERE session_id = ?1 AND embedder = ?2
            "#,
        )
        .bind(session_id)
        .bind(&self.fingerprint)
        .fetch_all(&mut *conn)
        .await
        .map_err(retrieval)?;

        rows.into_iter().map(MemoryRecord::try_from).collect()
    }
}

#[async_trait]
impl MemoryStore for SqliteMemoryStore {
    async fn save(
        &self,
        session_id: &str,
        role: Role,
        text: &str,
    ) -> Result<Option<MemoryRecord>, DomainError> {
        if text.trim().is_empty() {
            tracing::debug!(session_id, "skipping blank {} memory", role);
            return Ok(None);
        }
        if session_id.trim().is_empty() {
            return Err(DomainError::empty_text("session id"));
        }

        let embedding = self
            .embedder
            .embed(text)
            .await
            .map_err(|e| DomainError::Persistence(format!("embedding failed: {}", e)))?;

        let record = MemoryRecord::new(session_id.to_string(), role, text.to_string(), embedding);

        // Take the write lock up front; a deferred transaction would fail
        // with SQLITE_BUSY when upgrading a stale read snapshot.
        let mut tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(persistence)?;
        ensure_schema(&mut tx).await.map_err(persistence)?;
        sqlx::query(
            r#"
            INSERT INTO memory_records (id, session_id, role, text, timestamp, embedding, embedder)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&record.id)
        .bind(&record.session_id)
        .bind(record.role.as_str())
        .bind(&record.text)
        .bind(format_timestamp(&record.timestamp))
        .bind(embedding_to_bytes(&record.embedding))
        .bind(&self.fingerprint)
        .execute(&mut *tx)
        .await
        .map_err(persistence)?;
        tx.commit().await.map_err(persistence)?;

        tracing::debug!(session_id, id = %record.id, "💾 memory saved");

        Ok(Some(record))
    }

    async fn search(
        &self,
        session_id: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ScoredRecord>, DomainError> {
        if limit == 0 || self.count().await? == 0 {
            return Ok(vec![]);
        }

        let candidates = self.session_rows(session_id).await?;
        if candidates.is_empty() {
            return Ok(vec![]);
        }

        let query_vector = self
            .embedder
            .embed(query)
            .await
            .map_err(|e| DomainError::Retrieval(format!("query embedding failed: {}", e)))?;

        let total = candidates.len();
        let ranked = rank(&query_vector, candidates, limit);

        tracing::debug!(
            session_id,
            "🔍 {} of {} session memories selected",
            ranked.len(),
            total
        );

        Ok(ranked)
    }

    async fn history(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<MemoryRecord>, DomainError> {
        let mut conn = self.pool.acquire().await.map_err(retrieval)?;
        ensure_schema(&mut conn).await.map_err(retrieval)?;

        let rows = sqlx::query_as::<_, MemoryRow>(
            r#"
            SELECT id, session_id, role, text, timestamp, embedding
            FROM memory_records
            WHERE session_id = ?1
            ORDER BY timestamp DESC, id DESC
            LIMIT ?2
            "#,
        )
        .bind(session_id)
        .bind(limit as i64)
        .fetch_all(&mut *conn)
        .await
        .map_err(retrieval)?;

        let mut records = rows
            .into_iter()
            .map(MemoryRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        records.reverse();
        Ok(records)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let mut conn = self.pool.acquire().await.map_err(retrieval)?;
        ensure_schema(&mut conn).await.map_err(retrieval)?;

        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM memory_records")
            .fetch_one(&mut *conn)
            .await
            .map_err(retrieval)?;

        Ok(count.max(0) as u64)
    }

    async fn wipe(&self) -> Result<(), DomainError> {
        let mut conn = self.pool.acquire().await.map_err(persistence)?;

        sqlx::query("DROP TABLE IF EXISTS memory_records")
            .execute(&mut *conn)
            .await
            .map_err(persistence)?;
        sqlx::query("VACUUM")
            .execute(&mut *conn)
            .await
            .map_err(persistence)?;

        tracing::warn!("🧹 Memory store wiped (all sessions)");
        Ok(())
    }
}

/// Recreate the table after a wipe; cheap when it already exists
async fn ensure_schema(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_TABLE).execute(&mut *conn).await?;
    sqlx::query(CREATE_SESSION_INDEX).execute(&mut *conn).await?;
    Ok(())
}

/// Fixed-width RFC 3339 so text ordering matches time ordering
fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn persistence(e: sqlx::Error) -> DomainError {
    DomainError::Persistence(e.to_string())
}

fn retrieval(e: sqlx::Error) -> DomainError {
    DomainError::Retrieval(e.to_string())
}

/// Serialize embedding to bytes for SQLite BLOB storage.
fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(embedding.len() * 4);
    for &val in embedding {
        bytes.extend_from_slice(&val.to_le_bytes());
    }
    bytes
}

/// Deserialize embedding from bytes.
fn embedding_from_bytes(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}
