//! Client for the hosted authentication API.

use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;

/// Identity providers accepted for third-party sign-in.
const PROVIDERS: &[&str] = &["google", "github", "apple", "azure"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

/// Sign-up returns a session when e-mail confirmation is off, a bare user otherwise.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SignUpResponse {
    Session(AuthSession),
    Pending(AuthUser),
}

impl SignUpResponse {
    pub fn user(&self) -> &AuthUser {
        match self {
            SignUpResponse::Session(session) => &session.user,
            SignUpResponse::Pending(user) => user,
        }
    }

    pub fn session(&self) -> Option<&AuthSession> {
        match self {
            SignUpResponse::Session(session) => Some(session),
            SignUpResponse::Pending(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
}

#[derive(Clone)]
pub struct SupabaseAuth {
    http: Client,
    base_url: Url,
    anon_key: String,
}

impl SupabaseAuth {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let base_url = Url::parse(&config.supabase_url).map_err(|e| {
            AppError::internal_server_error_message(format!("Invalid SUPABASE_URL: {}", e))
        })?;

        let http = Client::builder()
            .timeout(config.bootstrap_timeout() * 5)
            .build()?;

        Ok(Self {
            http,
            base_url,
            anon_key: config.supabase_anon_key.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AppError> {
        self.base_url
            .join(&format!("auth/v1/{}", path))
            .map_err(|e| AppError::internal_server_error_message(e.to_string()))
    }

    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AppError> {
        let mut url = self.endpoint("token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let response = self
            .http
            .post(url)
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<SignUpResponse, AppError> {
        let response = self
            .http
            .post(self.endpoint("signup")?)
            .header("apikey", &self.anon_key)
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "name": name },
            }))
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    pub async fn sign_out(&self, access_token: &str) -> Result<(), AppError> {
        let response = self
            .http
            .post(self.endpoint("logout")?)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        check(response).await.map(|_| ())
    }

    /// Account behind `access_token`, as the hosted service sees it.
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, AppError> {
        let response = self
            .http
            .get(self.endpoint("user")?)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    /// URL the browser is sent to for third-party sign-in.
    pub fn authorize_url(&self, provider: &str, redirect_to: &str) -> Result<Url, AppError> {
        if !PROVIDERS.contains(&provider) {
            return Err(AppError::bad_request(format!(
                "Unsupported identity provider: {}",
                provider
            )));
        }

        let mut url = self.endpoint("authorize")?;
        url.query_pairs_mut()
            .append_pair("provider", provider)
            .append_pair("redirect_to", redirect_to);
        Ok(url)
    }
}

async fn check(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|e| e.error_description.or(e.msg).or(e.message))
        .unwrap_or(body);

    log::warn!("Authentication service returned {}: {}", status, message);

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Unauthorized,
        s if s.is_client_error() => AppError::BadRequest(message),
        _ => AppError::RemoteAuth(format!("{}: {}", status, message)),
    })
}
