use std::collections::BTreeSet;
use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::auth::Actor;
use crate::entities::{prelude::*, user_notification};
use crate::error::{EngineError, EngineResult};
use crate::notifier::{InvalidateKey, InvalidationEvent, InvalidationSink};

const DEFAULT_LIMIT: u64 = 50;

/// In-app notices written by lifecycle transitions.
#[derive(Clone)]
pub struct NotificationService {
    db: DatabaseConnection,
    sink: Arc<dyn InvalidationSink>,
}

impl NotificationService {
    pub fn new(db: DatabaseConnection, sink: Arc<dyn InvalidationSink>) -> Self {
        Self { db, sink }
    }

    /// Newest first.
    pub async fn for_user(
        &self,
        actor: &Actor,
        unread_only: bool,
        limit: Option<u64>,
    ) -> EngineResult<Vec<user_notification::Model>> {
        let mut query = UserNotification::find()
            .filter(user_notification::Column::UserId.eq(actor.id))
            .filter(user_notification::Column::TenantId.eq(actor.tenant_id));

        if unread_only {
            query = query.filter(user_notification::Column::IsRead.eq(false));
        }

        Ok(query
            .order_by_desc(user_notification::Column::CreatedAt)
            .limit(limit.unwrap_or(DEFAULT_LIMIT))
            .all(&self.db)
            .await?)
    }

    pub async fn mark_read(&self, actor: &Actor, notification_id: Uuid) -> EngineResult<user_notification::Model> {
        let notification = UserNotification::find_by_id(notification_id)
            .filter(user_notification::Column::UserId.eq(actor.id))
            .one(&self.db)
            .await?
            .ok_or(EngineError::NotFound {
                entity: "Notification",
                id: notification_id,
            })?;

        if notification.is_read {
            return Ok(notification);
        }

        let mut active = notification.into_active_model();
        active.is_read = Set(true);
        let notification = active.update(&self.db).await?;

        self.sink.notify(InvalidationEvent {
            tenant_id: actor.tenant_id,
            keys: BTreeSet::from([InvalidateKey::Notifications]),
        });

        Ok(notification)
    }
}
