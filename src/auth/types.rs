use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{enums::UserRole, user};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // user id
    pub tenant_id: Uuid,
    pub email: String,
    pub exp: i64,   // expiration timestamp
    pub iat: i64,   // issued at timestamp
}

/// Identity taken from a verified token. Role and tenant are not trusted
/// from the token; see [`Actor`].
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            tenant_id: claims.tenant_id,
            email: claims.email,
        }
    }
}

/// The user performing a mutation, as currently stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub role: UserRole,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl From<&user::Model> for Actor {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.id,
            tenant_id: user.tenant_id,
            role: user.role,
        }
    }
}
