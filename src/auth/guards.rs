use async_graphql::{Context, Error, ErrorExtensions, Result};

use crate::auth::{Actor, AuthenticatedUser};
use crate::services::UserService;

/// Authorization guard for checking if user is authenticated
pub fn require_auth<'ctx>(ctx: &'ctx Context<'_>) -> Result<&'ctx AuthenticatedUser> {
    ctx.data::<AuthenticatedUser>().map_err(|_| {
        Error::new("Authentication required").extend_with(|_, e| e.set("code", "UNAUTHENTICATED"))
    })
}

/// Resolve the authenticated user to an [`Actor`] using the stored role and
/// tenant. A token for a user that no longer exists is treated as
/// unauthenticated.
pub async fn require_actor(ctx: &Context<'_>) -> Result<Actor> {
    let user = require_auth(ctx)?;
    let user_service = ctx.data::<UserService>()?;

    let actor = user_service
        .load_actor(user.id)
        .await
        .map_err(|e| e.extend())?;

    if actor.tenant_id != user.tenant_id {
        return Err(Error::new("Authentication required")
            .extend_with(|_, e| e.set("code", "UNAUTHENTICATED")));
    }

    Ok(actor)
}
