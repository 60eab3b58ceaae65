use chrono::Utc;
use poem_openapi::payload::Json;
use uuid::Uuid;

use super::auth::{AuthOutcome, AuthService};
use crate::config::Config;
use crate::store::{ProgressRecord, ProgressStore, UserStore};
use crate::sync_api::models::{
    GetProgressResponseDto, ProgressDto, ProgressUpdateRequestDto, ProgressUpdatedDto,
    UpdateProgressResponseDto,
};

pub struct ProgressService<'a> {
    pub users: &'a dyn UserStore,
    pub documents: &'a dyn ProgressStore,
    pub config: &'a Config,
}

impl<'a> ProgressService<'a> {
    pub fn new(
        users: &'a dyn UserStore,
        documents: &'a dyn ProgressStore,
        config: &'a Config,
    ) -> Self {
        Self {
            users,
            documents,
            config,
        }
    }

    #[tracing::instrument(level = "debug", skip(self, key, body))]
    pub async fn update(
        &self,
        user: Option<&str>,
        key: Option<&str>,
        body: ProgressUpdateRequestDto,
    ) -> UpdateProgressResponseDto {
        let username = match AuthService::new(self.users).check(user, key).await {
            Ok(AuthOutcome::Authorized(username)) => username,
            Ok(AuthOutcome::MissingCredentials | AuthOutcome::BadCredentials) => {
                return UpdateProgressResponseDto::Unauthorized(Json("Unauthorized".into()));
            }
            Ok(AuthOutcome::UnknownUser) => {
                return UpdateProgressResponseDto::Forbidden(Json("Forbidden".into()));
            }
            Err(error) => {
                tracing::error!(%error, "auth check failed");
                return UpdateProgressResponseDto::InternalError(Json(
                    "Unknown server error".into(),
                ));
            }
        };

        // Missing body fields surface as 500, not 400: legacy protocol
        // contract that shipped clients rely on.
        let (Some(document), Some(progress), Some(percentage), Some(device), Some(device_id)) = (
            body.document,
            body.progress,
            body.percentage,
            body.device,
            body.device_id,
        ) else {
            return UpdateProgressResponseDto::InternalError(Json("Unknown server error".into()));
        };

        let timestamp = Utc::now().timestamp();
        let record = ProgressRecord {
            username: username.clone(),
            document: document.clone(),
            progress,
            percentage,
            device,
            device_id,
            timestamp,
        };
        match self.documents.upsert(record).await {
            Ok(()) => {
                tracing::info!(%username, %document, "updated progress");
                UpdateProgressResponseDto::Ok(Json(ProgressUpdatedDto {
                    document,
                    timestamp,
                }))
            }
            Err(error) => {
                tracing::error!(%error, %username, %document, "failed to upsert progress");
                UpdateProgressResponseDto::InternalError(Json("Unknown server error".into()))
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self, key))]
    pub async fn get(
        &self,
        user: Option<&str>,
        key: Option<&str>,
        document: &str,
    ) -> GetProgressResponseDto {
        let username = match AuthService::new(self.users).check(user, key).await {
            Ok(AuthOutcome::Authorized(username)) => username,
            Ok(AuthOutcome::MissingCredentials | AuthOutcome::BadCredentials) => {
                return GetProgressResponseDto::Unauthorized(Json("Unauthorized".into()));
            }
            Ok(AuthOutcome::UnknownUser) => {
                return GetProgressResponseDto::Forbidden(Json("Forbidden".into()));
            }
            Err(error) => {
                tracing::error!(%error, "auth check failed");
                return GetProgressResponseDto::InternalError(Json("Unknown server error".into()));
            }
        };

        if document.is_empty() {
            return GetProgressResponseDto::InternalError(Json("Unknown server error".into()));
        }

        match self.documents.get(&username, document).await {
            Ok(Some(record)) => {
                // Substituted at read time only; the stored id is untouched.
                let device_id = if self.config.receive_random_device_id {
                    Uuid::new_v4().simple().to_string().to_uppercase()
                } else {
                    record.device_id
                };
                tracing::info!(%username, %document, "retrieved progress");
                GetProgressResponseDto::Ok(Json(ProgressDto {
                    username,
                    document: record.document,
                    progress: record.progress,
                    percentage: record.percentage,
                    device: record.device,
                    device_id,
                    timestamp: record.timestamp,
                }))
            }
            Ok(None) => GetProgressResponseDto::NotFound(Json("Document not found".into())),
            Err(error) => {
                tracing::error!(%error, %username, %document, "failed to read progress");
                GetProgressResponseDto::InternalError(Json("Unknown server error".into()))
            }
        }
    }
}
