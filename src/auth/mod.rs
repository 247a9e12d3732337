use actix_web::{
    Error as ActixError, FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized,
    web::Data,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::future::{Ready, ready};
use uuid::Uuid;

use crate::config::Config;
use crate::database::models::User;
use crate::error::AppError;

pub mod permissions;
pub mod supabase;

pub const AUDIENCE: &str = "authenticated";

/// Access-token claims as issued by the hosted auth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub aud: String,
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> Uuid {
        self.sub
    }
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[AUDIENCE]);
    validation
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation(),
    )?;

    Ok(token_data.claims)
}

/// Signs a token locally. Used for demo-mode sessions, where the hosted
/// auth service is unreachable.
pub fn issue_token(user: &User, config: &Config) -> Result<String, AppError> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(config.jwt_expiration_hours))
        .ok_or_else(|| AppError::internal_server_error_message("Invalid token expiration"))?
        .timestamp() as usize;

    let claims = Claims {
        sub: user.id,
        email: Some(user.email.clone()),
        role: Some(AUDIENCE.to_string()),
        aud: AUDIENCE.to_string(),
        exp: expiration,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_ref()),
    )
    .map_err(|e| AppError::internal_server_error_message(e.to_string()))?;

    Ok(token)
}

pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

impl FromRequest for Claims {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(token) = bearer_token(req) else {
            return ready(Err(ErrorUnauthorized(
                "Missing or invalid authorization header",
            )));
        };

        let Some(config) = req.app_data::<Data<Config>>() else {
            log::error!("Config missing from app data");
            return ready(Err(ErrorUnauthorized("Invalid token")));
        };

        match verify_token(token, &config.jwt_secret) {
            Ok(claims) => ready(Ok(claims)),
            Err(_) => ready(Err(ErrorUnauthorized("Invalid token"))),
        }
    }
}
