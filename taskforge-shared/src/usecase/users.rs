/// User use cases
///
/// Same shape as the task side: every `IdentityStore` call runs under
/// the configured deadline, nothing else is added.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::error::StoreResult;
use crate::models::user::{User, UserPatch};
use crate::store::IdentityStore;

use super::bounded;

#[derive(Clone)]
pub struct UserUsecase {
    store: Arc<dyn IdentityStore>,
    timeout: Duration,
}

impl UserUsecase {
    pub fn new(store: Arc<dyn IdentityStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub async fn create(&self, user: &User) -> StoreResult<()> {
        bounded(self.timeout, self.store.create(user)).await
    }

    pub async fn fetch_all(&self) -> StoreResult<Vec<User>> {
        bounded(self.timeout, self.store.fetch_all()).await
    }

    pub async fn fetch_by_id(&self, user_id: Uuid) -> StoreResult<User> {
        bounded(self.timeout, self.store.fetch_by_id(user_id)).await
    }

    pub async fn get_by_username(&self, username: &str) -> StoreResult<User> {
        bounded(self.timeout, self.store.get_by_username(username)).await
    }

    pub async fn update_by_id(&self, user_id: Uuid, patch: &UserPatch) -> StoreResult<User> {
        bounded(self.timeout, self.store.update_by_id(user_id, patch)).await
    }

    pub async fn delete_by_id(&self, user_id: Uuid) -> StoreResult<()> {
        bounded(self.timeout, self.store.delete_by_id(user_id)).await
    }

    pub async fn update_session_tokens(
        &self,
        user_id: Uuid,
        token: &str,
        refresh_token: &str,
    ) -> StoreResult<()> {
        bounded(
            self.timeout,
            self.store.update_session_tokens(user_id, token, refresh_token),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::models::user::UserType;
    use crate::store::InMemoryIdentityStore;
    use chrono::Utc;

    fn sample_user(username: &str, user_type: UserType) -> User {
        let now = Utc::now();
        User {
            user_id: Uuid::new_v4(),
            username: username.to_string(),
            first_name: "Test".to_string(),
            last_name: "Person".to_string(),
            password_hash: "$argon2id$fake".to_string(),
            user_type,
            token: None,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_bootstrap_violation_crosses_layer_unchanged() {
        let usecase = UserUsecase::new(
            Arc::new(InMemoryIdentityStore::new()),
            Duration::from_secs(5),
        );

        let result = usecase.create(&sample_user("plain_user", UserType::User)).await;
        assert!(matches!(result, Err(StoreError::BootstrapViolation)));

        usecase
            .create(&sample_user("admin_user", UserType::Admin))
            .await
            .expect("admin bootstrap should succeed");
    }

    #[tokio::test]
    async fn test_lookup_and_token_update() {
        let usecase = UserUsecase::new(
            Arc::new(InMemoryIdentityStore::new()),
            Duration::from_secs(5),
        );
        let admin = sample_user("admin_user", UserType::Admin);
        usecase.create(&admin).await.unwrap();

        let found = usecase.get_by_username("admin_user").await.unwrap();
        assert_eq!(found.user_id, admin.user_id);

        usecase
            .update_session_tokens(admin.user_id, "tok", "refresh")
            .await
            .unwrap();
        let found = usecase.fetch_by_id(admin.user_id).await.unwrap();
        assert_eq!(found.token.as_deref(), Some("tok"));
    }
}
