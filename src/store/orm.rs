use entities::{documents, users};
use sea_orm::{
    ActiveValue::Set, DatabaseConnection, EntityTrait, SqlErr, sea_query::OnConflict,
};

use super::{CreateUserOutcome, ProgressRecord, ProgressStore, UserStore};

/// SeaORM-backed store. Atomicity per key comes from the table
/// constraints: `users.username` is the primary key and `documents`
/// has a composite (username, document) primary key, so duplicate
/// registration and progress upserts are single statements.
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<documents::Model> for ProgressRecord {
    fn from(row: documents::Model) -> Self {
        ProgressRecord {
            username: row.username,
            document: row.document,
            progress: row.progress,
            percentage: row.percentage,
            device: row.device,
            device_id: row.device_id,
            timestamp: row.timestamp,
        }
    }
}

#[async_trait::async_trait]
impl UserStore for SeaOrmStore {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn user_exists(&self, username: &str) -> anyhow::Result<bool> {
        let found = users::Entity::find_by_id(username.to_owned())
            .one(&self.db)
            .await?;
        Ok(found.is_some())
    }

    #[tracing::instrument(level = "debug", skip(self, password))]
    async fn credentials_valid(&self, username: &str, password: &str) -> anyhow::Result<bool> {
        let found = users::Entity::find_by_id(username.to_owned())
            .one(&self.db)
            .await?;
        Ok(found.is_some_and(|user| user.password == password))
    }

    #[tracing::instrument(level = "debug", skip(self, password))]
    async fn create_user(
        &self,
        username: &str,
        password: &str,
    ) -> anyhow::Result<CreateUserOutcome> {
        let row = users::ActiveModel {
            username: Set(username.to_owned()),
            password: Set(password.to_owned()),
        };
        match users::Entity::insert(row)
            .exec_without_returning(&self.db)
            .await
        {
            Ok(_) => Ok(CreateUserOutcome::Created),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(CreateUserOutcome::DuplicateUsername)
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait::async_trait]
impl ProgressStore for SeaOrmStore {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn get(
        &self,
        username: &str,
        document: &str,
    ) -> anyhow::Result<Option<ProgressRecord>> {
        let found = documents::Entity::find_by_id((username.to_owned(), document.to_owned()))
            .one(&self.db)
            .await?;
        Ok(found.map(ProgressRecord::from))
    }

    #[tracing::instrument(level = "debug", skip(self, record))]
    async fn upsert(&self, record: ProgressRecord) -> anyhow::Result<()> {
        let row = documents::ActiveModel {
            username: Set(record.username),
            document: Set(record.document),
            progress: Set(record.progress),
            percentage: Set(record.percentage),
            device: Set(record.device),
            device_id: Set(record.device_id),
            timestamp: Set(record.timestamp),
        };
        documents::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([documents::Column::Username, documents::Column::Document])
                    .update_columns([
                        documents::Column::Progress,
                        documents::Column::Percentage,
                        documents::Column::Device,
                        documents::Column::DeviceId,
                        documents::Column::Timestamp,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }
}
