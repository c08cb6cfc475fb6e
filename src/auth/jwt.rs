use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::auth::types::Claims;

/// Verifies bearer tokens issued by the identity provider.
#[derive(Clone)]
pub struct JwtService {
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
        }
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use uuid::Uuid;

    fn sign(secret: &str, user_id: Uuid, tenant_id: Uuid, expires_in: Duration) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            tenant_id,
            email: "lead@example.com".to_string(),
            exp: (now + expires_in).timestamp(),
            iat: now.timestamp(),
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_ref())).unwrap()
    }

    #[test]
    fn provider_token_yields_user_and_tenant() {
        let jwt = JwtService::new("test-secret");
        let user_id = Uuid::new_v4();
        let tenant_id = Uuid::new_v4();

        let claims = jwt
            .verify_token(&sign("test-secret", user_id, tenant_id, Duration::hours(1)))
            .unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.tenant_id, tenant_id);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let jwt = JwtService::new("secret-b");
        let token = sign("secret-a", Uuid::new_v4(), Uuid::new_v4(), Duration::hours(1));

        assert!(jwt.verify_token(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt = JwtService::new("test-secret");
        let token = sign("test-secret", Uuid::new_v4(), Uuid::new_v4(), -Duration::hours(2));

        assert!(jwt.verify_token(&token).is_err());
    }
}
