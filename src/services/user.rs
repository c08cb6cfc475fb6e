use std::collections::HashMap;

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::auth::Actor;
use crate::entities::{enums::UserRole, prelude::*, user};
use crate::error::{EngineError, EngineResult};

/// Read access to tenant users. Accounts are provisioned by the identity
/// provider; this service never creates them.
#[derive(Clone)]
pub struct UserService {
    db: DatabaseConnection,
}

impl UserService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_user(&self, user_id: Uuid) -> EngineResult<Option<user::Model>> {
        Ok(User::find_by_id(user_id).one(&self.db).await?)
    }

    /// Current role and tenant of a token's subject.
    pub async fn load_actor(&self, user_id: Uuid) -> EngineResult<Actor> {
        self.get_user(user_id)
            .await?
            .map(|user| Actor::from(&user))
            .ok_or_else(|| EngineError::user_not_found(user_id))
    }

    /// A user of `tenant_id`. Users of other tenants are reported as missing.
    pub async fn find_in_tenant(&self, tenant_id: Uuid, user_id: Uuid) -> EngineResult<user::Model> {
        User::find_by_id(user_id)
            .filter(user::Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| EngineError::user_not_found(user_id))
    }

    pub async fn list_users(&self, tenant_id: Uuid, role: Option<UserRole>) -> EngineResult<Vec<user::Model>> {
        let mut query = User::find().filter(user::Column::TenantId.eq(tenant_id));
        if let Some(role) = role {
            query = query.filter(user::Column::Role.eq(role));
        }

        Ok(query
            .order_by_asc(user::Column::LastName)
            .order_by_asc(user::Column::Email)
            .all(&self.db)
            .await?)
    }

    /// Batch lookup used by the lead DataLoader.
    pub async fn users_by_ids(&self, ids: &[Uuid]) -> EngineResult<HashMap<Uuid, user::Model>> {
        let users = User::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await?;

        Ok(users.into_iter().map(|user| (user.id, user)).collect())
    }
}
