use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::models::admin::AdminRole;

const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: AdminRole,
    pub iat: usize,
    pub exp: usize,
}

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

pub fn create_jwt(
    id: &str,
    email: &str,
    role: AdminRole,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: id.to_owned(),
        email: email.to_owned(),
        role,
        iat: now.timestamp() as usize,
        exp: (now + chrono::Duration::days(TOKEN_TTL_DAYS)).timestamp() as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_ref()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
}

impl AuthError {
    pub fn message(self) -> &'static str {
        match self {
            AuthError::MissingToken => "Missing bearer token",
            AuthError::InvalidToken => "Invalid token",
            AuthError::ExpiredToken => "Token expired",
        }
    }
}

/// Stashed in request-local state by the guards so the 401 catcher can
/// report which of the three rejection reasons applied.
#[derive(Debug, Default, Clone)]
pub struct AuthFailure(pub Option<AuthError>);

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_ref()), &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        })
}

#[derive(Debug, Clone)]
pub struct AdminAuth {
    pub id: String,
    pub email: String,
    pub role: AdminRole,
}

fn reject(request: &Request<'_>, reason: AuthError) -> Outcome<AdminAuth, AuthError> {
    request.local_cache(|| AuthFailure(Some(reason)));
    Outcome::Error((Status::Unauthorized, reason))
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminAuth {
    type Error = AuthError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let config = match request.rocket().state::<Config>() {
            Some(c) => c,
            None => return Outcome::Error((Status::InternalServerError, AuthError::InvalidToken)),
        };

        let token = request
            .headers()
            .get_one("Authorization")
            .and_then(|header| header.strip_prefix("Bearer "));
        let Some(token) = token else {
            return reject(request, AuthError::MissingToken);
        };

        match decode_token(token, &config.jwt_secret) {
            Ok(claims) => Outcome::Success(AdminAuth {
                id: claims.sub,
                email: claims.email,
                role: claims.role,
            }),
            Err(reason) => reject(request, reason),
        }
    }
}

/// Role-restricted variant of [`AdminAuth`]; fails with 403 for plain admins.
#[derive(Debug, Clone)]
pub struct SuperAdminAuth(pub AdminAuth);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for SuperAdminAuth {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let admin = match request.guard::<AdminAuth>().await {
            Outcome::Success(admin) => admin,
            Outcome::Error((status, _)) => return Outcome::Error((status, ())),
            Outcome::Forward(f) => return Outcome::Forward(f),
        };
        if admin.role == AdminRole::SuperAdmin {
            Outcome::Success(SuperAdminAuth(admin))
        } else {
            Outcome::Error((Status::Forbidden, ()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
    }

    #[test]
    fn verify_tolerates_garbage_hashes() {
        assert!(!verify_password("hunter2", "not-a-bcrypt-hash"));
    }

    #[test]
    fn token_round_trip_carries_identity() {
        let token = create_jwt("abc123", "root@agency.dev", AdminRole::SuperAdmin, SECRET).unwrap();
        let claims = decode_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "abc123");
        assert_eq!(claims.email, "root@agency.dev");
        assert_eq!(claims.role, AdminRole::SuperAdmin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_distinct_from_invalid() {
        let now = Utc::now();
        let stale = Claims {
            sub: "abc123".to_string(),
            email: "root@agency.dev".to_string(),
            role: AdminRole::Admin,
            iat: (now - chrono::Duration::days(8)).timestamp() as usize,
            exp: (now - chrono::Duration::days(1)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &stale,
            &EncodingKey::from_secret(SECRET.as_ref()),
        )
        .unwrap();
        assert_eq!(decode_token(&token, SECRET).unwrap_err(), AuthError::ExpiredToken);
    }

    #[test]
    fn tampered_token_is_invalid() {
        let token = create_jwt("abc123", "root@agency.dev", AdminRole::Admin, SECRET).unwrap();
        assert_eq!(
            decode_token(&token, "other-secret").unwrap_err(),
            AuthError::InvalidToken
        );
        assert_eq!(
            decode_token("definitely.not.a.jwt", SECRET).unwrap_err(),
            AuthError::InvalidToken
        );
    }
}
