use poem_openapi::payload::Json;

use crate::store::UserStore;
use crate::sync_api::models::{AuthResponseDto, AuthorizedDto};

/// Outcome of the per-request credential check. The protocol promises a
/// three-way distinction to callers: missing or wrong secret maps to
/// 401, an unknown username to 403, so a client can tell "register
/// first" apart from "re-enter your password".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Authorized(String),
    MissingCredentials,
    UnknownUser,
    BadCredentials,
}

pub struct AuthService<'a> {
    pub users: &'a dyn UserStore,
}

impl<'a> AuthService<'a> {
    pub fn new(users: &'a dyn UserStore) -> Self {
        Self { users }
    }

    #[tracing::instrument(level = "debug", skip(self, key))]
    pub async fn check(
        &self,
        user: Option<&str>,
        key: Option<&str>,
    ) -> anyhow::Result<AuthOutcome> {
        let (user, key) = match (user, key) {
            (Some(user), Some(key)) => (user, key),
            _ => return Ok(AuthOutcome::MissingCredentials),
        };
        if !self.users.user_exists(user).await? {
            return Ok(AuthOutcome::UnknownUser);
        }
        if !self.users.credentials_valid(user, key).await? {
            return Ok(AuthOutcome::BadCredentials);
        }
        Ok(AuthOutcome::Authorized(user.to_string()))
    }

    pub async fn authorize(&self, user: Option<&str>, key: Option<&str>) -> AuthResponseDto {
        match self.check(user, key).await {
            Ok(AuthOutcome::Authorized(username)) => {
                tracing::info!(%username, "user authenticated");
                AuthResponseDto::Ok(Json(AuthorizedDto {
                    authorized: "OK".to_string(),
                }))
            }
            Ok(AuthOutcome::MissingCredentials | AuthOutcome::BadCredentials) => {
                AuthResponseDto::Unauthorized(Json("Unauthorized".into()))
            }
            Ok(AuthOutcome::UnknownUser) => AuthResponseDto::Forbidden(Json("Forbidden".into())),
            Err(error) => {
                tracing::error!(%error, "auth check failed");
                AuthResponseDto::InternalError(Json("Unknown server error".into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    async fn store_with_alice() -> MemoryStore {
        let store = MemoryStore::new();
        store.create_user("alice", "pw1").await.unwrap();
        store
    }

    #[tokio::test]
    async fn matching_credentials_authorize() {
        let store = store_with_alice().await;
        let outcome = AuthService::new(&store)
            .check(Some("alice"), Some("pw1"))
            .await
            .unwrap();
        assert_eq!(outcome, AuthOutcome::Authorized("alice".to_string()));
    }

    #[tokio::test]
    async fn wrong_secret_and_unknown_user_are_distinguishable() {
        let store = store_with_alice().await;
        let auth = AuthService::new(&store);

        let wrong = auth.check(Some("alice"), Some("wrong")).await.unwrap();
        assert_eq!(wrong, AuthOutcome::BadCredentials);

        let unknown = auth.check(Some("bob"), Some("x")).await.unwrap();
        assert_eq!(unknown, AuthOutcome::UnknownUser);
    }

    #[tokio::test]
    async fn missing_either_header_is_unauthorized() {
        let store = store_with_alice().await;
        let auth = AuthService::new(&store);
        assert_eq!(
            auth.check(None, Some("pw1")).await.unwrap(),
            AuthOutcome::MissingCredentials
        );
        assert_eq!(
            auth.check(Some("alice"), None).await.unwrap(),
            AuthOutcome::MissingCredentials
        );
    }

    #[tokio::test]
    async fn authorize_maps_outcomes_to_statuses() {
        let store = store_with_alice().await;
        let auth = AuthService::new(&store);

        match auth.authorize(Some("alice"), Some("pw1")).await {
            AuthResponseDto::Ok(body) => assert_eq!(body.0.authorized, "OK"),
            _ => panic!("expected 200"),
        }
        assert!(matches!(
            auth.authorize(Some("alice"), Some("wrong")).await,
            AuthResponseDto::Unauthorized(_)
        ));
        assert!(matches!(
            auth.authorize(Some("bob"), Some("x")).await,
            AuthResponseDto::Forbidden(_)
        ));
        assert!(matches!(
            auth.authorize(None, None).await,
            AuthResponseDto::Unauthorized(_)
        ));
    }
}
