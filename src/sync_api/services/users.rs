use std::sync::Arc;

use poem_openapi::payload::Json;

use crate::config::Config;
use crate::store::{CreateUserOutcome, UserStore};
use crate::sync_api::models::{RegisterResponseDto, RegisteredDto, UserCreateRequestDto};
use crate::webhook::WebhookClient;

pub struct UserService<'a> {
    pub users: &'a dyn UserStore,
    pub config: &'a Config,
    pub webhook: Option<&'a Arc<WebhookClient>>,
}

impl<'a> UserService<'a> {
    pub fn new(
        users: &'a dyn UserStore,
        config: &'a Config,
        webhook: Option<&'a Arc<WebhookClient>>,
    ) -> Self {
        Self {
            users,
            config,
            webhook,
        }
    }

    #[tracing::instrument(level = "debug", skip(self, req))]
    pub async fn register(&self, req: UserCreateRequestDto) -> RegisterResponseDto {
        if !self.config.open_registrations {
            return RegisterResponseDto::Forbidden(Json(
                "This server is currently not accepting new registrations.".into(),
            ));
        }
        let (Some(username), Some(password)) = (req.username, req.password) else {
            return RegisterResponseDto::BadRequest(Json("Invalid request".into()));
        };

        match self.users.create_user(&username, &password).await {
            Ok(CreateUserOutcome::Created) => {
                tracing::info!(%username, "user registered");
                if let Some(webhook) = self.webhook {
                    // Fire-and-forget: the 201 never waits on the sink.
                    let webhook = Arc::clone(webhook);
                    let registered = username.clone();
                    tokio::spawn(async move {
                        if let Err(error) = webhook.send_registration(&registered).await {
                            tracing::warn!(%error, "registration webhook failed");
                        }
                    });
                }
                RegisterResponseDto::Created(Json(RegisteredDto { username }))
            }
            Ok(CreateUserOutcome::DuplicateUsername) => {
                RegisterResponseDto::Conflict(Json("Username is already registered.".into()))
            }
            Err(error) => {
                tracing::error!(%error, %username, "failed to create user");
                RegisterResponseDto::InternalError(Json("Unknown server error".into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn config(open_registrations: bool) -> Config {
        Config {
            open_registrations,
            receive_random_device_id: false,
            webhook_enabled: false,
            webhook_url: String::new(),
            db_connection_string: String::new(),
        }
    }

    fn request(username: Option<&str>, password: Option<&str>) -> UserCreateRequestDto {
        UserCreateRequestDto {
            username: username.map(String::from),
            password: password.map(String::from),
        }
    }

    #[tokio::test]
    async fn registration_creates_the_user() {
        let store = MemoryStore::new();
        let config = config(true);
        let service = UserService::new(&store, &config, None);

        match service.register(request(Some("alice"), Some("pw1"))).await {
            RegisterResponseDto::Created(body) => assert_eq!(body.0.username, "alice"),
            _ => panic!("expected 201"),
        }
        assert!(store.user_exists("alice").await.unwrap());
        assert!(store.credentials_valid("alice", "pw1").await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_username_conflicts_regardless_of_password() {
        let store = MemoryStore::new();
        let config = config(true);
        let service = UserService::new(&store, &config, None);

        service
            .register(request(Some("alice"), Some("pw1")))
            .await;
        assert!(matches!(
            service.register(request(Some("alice"), Some("pw2"))).await,
            RegisterResponseDto::Conflict(_)
        ));
        // First password still in effect.
        assert!(store.credentials_valid("alice", "pw1").await.unwrap());
    }

    #[tokio::test]
    async fn closed_registrations_reject_fresh_usernames() {
        let store = MemoryStore::new();
        let config = config(false);
        let service = UserService::new(&store, &config, None);

        assert!(matches!(
            service.register(request(Some("fresh"), Some("pw"))).await,
            RegisterResponseDto::Forbidden(_)
        ));
        assert!(!store.user_exists("fresh").await.unwrap());
    }

    #[tokio::test]
    async fn missing_fields_are_a_bad_request() {
        let store = MemoryStore::new();
        let config = config(true);
        let service = UserService::new(&store, &config, None);

        assert!(matches!(
            service.register(request(None, Some("pw"))).await,
            RegisterResponseDto::BadRequest(_)
        ));
        assert!(matches!(
            service.register(request(Some("alice"), None)).await,
            RegisterResponseDto::BadRequest(_)
        ));
    }
}
