//! In-memory store used by the protocol-engine tests.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{CreateUserOutcome, ProgressRecord, ProgressStore, UserStore};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<String, String>>,
    documents: Mutex<HashMap<(String, String), ProgressRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryStore {
    async fn user_exists(&self, username: &str) -> anyhow::Result<bool> {
        Ok(self.users.lock().unwrap().contains_key(username))
    }

    async fn credentials_valid(&self, username: &str, password: &str) -> anyhow::Result<bool> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .get(username)
            .is_some_and(|stored| stored == password))
    }

    async fn create_user(
        &self,
        username: &str,
        password: &str,
    ) -> anyhow::Result<CreateUserOutcome> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(username) {
            return Ok(CreateUserOutcome::DuplicateUsername);
        }
        users.insert(username.to_owned(), password.to_owned());
        Ok(CreateUserOutcome::Created)
    }
}

#[async_trait::async_trait]
impl ProgressStore for MemoryStore {
    async fn get(
        &self,
        username: &str,
        document: &str,
    ) -> anyhow::Result<Option<ProgressRecord>> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .get(&(username.to_owned(), document.to_owned()))
            .cloned())
    }

    async fn upsert(&self, record: ProgressRecord) -> anyhow::Result<()> {
        self.documents.lock().unwrap().insert(
            (record.username.clone(), record.document.clone()),
            record,
        );
        Ok(())
    }
}
