use async_graphql::dataloader::{DataLoader, Loader};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::user;
use crate::services::UserService;

/// DataLoader for batching lead and author lookups
#[derive(Clone)]
pub struct UserLoader {
    user_service: UserService,
}

impl UserLoader {
    pub fn new(user_service: UserService) -> Self {
        Self { user_service }
    }
}

impl Loader<Uuid> for UserLoader {
    type Value = user::Model;
    type Error = String;

    async fn load(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        self.user_service
            .users_by_ids(keys)
            .await
            .map_err(|e| format!("Failed to load users: {}", e))
    }
}

/// DataLoader context for GraphQL resolvers
#[derive(Clone)]
pub struct DataLoaderContext {
    pub user_loader: Arc<DataLoader<UserLoader>>,
}

impl DataLoaderContext {
    pub fn new(user_service: UserService) -> Self {
        Self {
            user_loader: Arc::new(
                DataLoader::new(UserLoader::new(user_service), tokio::spawn).max_batch_size(100),
            ),
        }
    }

    /// Load a single user (with caching)
    pub async fn load_user(&self, user_id: Uuid) -> Result<Option<user::Model>, String> {
        self.user_loader.load_one(user_id).await
    }
}
