use async_graphql::{EmptySubscription, Schema};

use crate::graphql::{MutationRoot, QueryRoot};
use crate::services::AppServices;

pub type ApiSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Services are shared schema data; the authenticated user and the
/// per-request DataLoader are attached by the HTTP handler.
pub fn create_schema(services: &AppServices) -> ApiSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(services.users.clone())
        .data(services.projects.clone())
        .data(services.lifecycle.clone())
        .data(services.checklists.clone())
        .data(services.history.clone())
        .data(services.scores.clone())
        .data(services.batch.clone())
        .data(services.notifications.clone())
        .finish()
}
