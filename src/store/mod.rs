// Persistence traits; the engine never touches a database handle directly.

pub mod orm;

#[cfg(test)]
pub mod memory;

pub use orm::SeaOrmStore;

/// Stored reading position for one (username, document) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressRecord {
    pub username: String,
    pub document: String,
    pub progress: String,
    pub percentage: f64,
    pub device: String,
    pub device_id: String,
    /// Unix seconds, server-assigned.
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateUserOutcome {
    Created,
    DuplicateUsername,
}

#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    async fn user_exists(&self, username: &str) -> anyhow::Result<bool>;

    /// Byte-exact match on both fields; no normalization or trimming.
    async fn credentials_valid(&self, username: &str, password: &str) -> anyhow::Result<bool>;

    /// Inserts atomically; a concurrent duplicate surfaces as
    /// `DuplicateUsername`, never as a second row.
    async fn create_user(
        &self,
        username: &str,
        password: &str,
    ) -> anyhow::Result<CreateUserOutcome>;
}

#[async_trait::async_trait]
pub trait ProgressStore: Send + Sync {
    async fn get(
        &self,
        username: &str,
        document: &str,
    ) -> anyhow::Result<Option<ProgressRecord>>;

    /// Last-writer-wins: replaces the whole record for its key.
    async fn upsert(&self, record: ProgressRecord) -> anyhow::Result<()>;
}
