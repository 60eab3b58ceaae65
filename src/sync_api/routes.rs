use std::sync::Arc;

use poem_openapi::{
    OpenApi,
    param::{Header, Path},
    payload::Json,
};

use super::models::{
    AuthResponseDto, GetProgressResponseDto, HealthDto, HealthResponseDto,
    ProgressUpdateRequestDto, RegisterResponseDto, RootResponseDto, UpdateProgressResponseDto,
    UserCreateRequestDto,
};
use super::services::{auth::AuthService, progress::ProgressService, users::UserService};
use crate::config::Config;
use crate::store::SeaOrmStore;
use crate::webhook::WebhookClient;

pub struct KosyncApi {
    pub store: Arc<SeaOrmStore>,
    pub config: Arc<Config>,
    pub webhook: Option<Arc<WebhookClient>>,
}

#[OpenApi]
impl KosyncApi {
    /// Bare hits get pointed at the liveness probe
    #[oai(path = "/", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn root(&self) -> RootResponseDto {
        RootResponseDto::TemporaryRedirect("/healthstatus".to_string())
    }

    #[oai(path = "/healthstatus", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn healthstatus(&self) -> HealthResponseDto {
        HealthResponseDto::Ok(Json(HealthDto {
            message: "healthy".to_string(),
        }))
    }

    /// Register a new account, if registrations are open
    #[oai(path = "/users/create", method = "post")]
    #[tracing::instrument(level = "debug", skip(self, body))]
    async fn register(&self, body: Json<UserCreateRequestDto>) -> RegisterResponseDto {
        UserService::new(self.store.as_ref(), &self.config, self.webhook.as_ref())
            .register(body.0)
            .await
    }

    /// Validate the per-request credentials
    #[oai(path = "/users/auth", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, x_auth_user, x_auth_key))]
    async fn authorize(
        &self,
        #[oai(name = "x-auth-user")] x_auth_user: Header<Option<String>>,
        #[oai(name = "x-auth-key")] x_auth_key: Header<Option<String>>,
    ) -> AuthResponseDto {
        AuthService::new(self.store.as_ref())
            .authorize(x_auth_user.0.as_deref(), x_auth_key.0.as_deref())
            .await
    }

    /// Store the caller's reading position for a document (last writer wins)
    #[oai(path = "/syncs/progress", method = "put")]
    #[tracing::instrument(level = "debug", skip(self, x_auth_user, x_auth_key, body))]
    async fn update_progress(
        &self,
        #[oai(name = "x-auth-user")] x_auth_user: Header<Option<String>>,
        #[oai(name = "x-auth-key")] x_auth_key: Header<Option<String>>,
        body: Json<ProgressUpdateRequestDto>,
    ) -> UpdateProgressResponseDto {
        ProgressService::new(self.store.as_ref(), self.store.as_ref(), &self.config)
            .update(x_auth_user.0.as_deref(), x_auth_key.0.as_deref(), body.0)
            .await
    }

    /// Fetch the shared reading position for a document
    #[oai(path = "/syncs/progress/:document", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, x_auth_user, x_auth_key, document))]
    async fn get_progress(
        &self,
        #[oai(name = "x-auth-user")] x_auth_user: Header<Option<String>>,
        #[oai(name = "x-auth-key")] x_auth_key: Header<Option<String>>,
        document: Path<String>,
    ) -> GetProgressResponseDto {
        ProgressService::new(self.store.as_ref(), self.store.as_ref(), &self.config)
            .get(
                x_auth_user.0.as_deref(),
                x_auth_key.0.as_deref(),
                &document.0,
            )
            .await
    }
}
