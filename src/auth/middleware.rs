use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::auth::{AuthenticatedUser, JwtService};

/// Attaches `Option<AuthenticatedUser>` to the request. Missing or invalid
/// tokens continue unauthenticated; resolvers decide what needs a user.
pub async fn optional_auth_middleware(
    State(jwt_service): State<JwtService>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "));

    let user = match auth_header {
        Some(token) => match jwt_service.verify_token(token) {
            Ok(claims) => Some(AuthenticatedUser::from(claims)),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected bearer token");
                None
            }
        },
        None => None,
    };

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
