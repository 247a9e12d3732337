//! Sign-in flows, session notifications and start-up probing.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::AppState;
use crate::auth::{
    issue_token,
    permissions::{Permission, allows},
    supabase::SupabaseAuth,
};
use crate::config::Config;
use crate::database::{
    models::{NewProfile, User, UserUpdate},
    repositories::profile,
};
use crate::error::AppError;
use crate::services::{
    backend::{Backend, ConnectionMode},
    demo,
    user_directory::UserDirectory,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AuthEvent {
    SignedIn { user_id: Uuid },
    SignedOut { user_id: Uuid },
    UserUpdated { user_id: Uuid },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_token: Option<String>,
    pub user: Option<User>,
    pub mode: ConnectionMode,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    pub user_id: Uuid,
    pub email: String,
    pub access_token: Option<String>,
    pub confirmation_required: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub user: User,
    pub mode: ConnectionMode,
}

#[derive(Clone)]
pub struct SessionService {
    config: Config,
    backend: Backend,
    auth: SupabaseAuth,
    users: UserDirectory,
    events: broadcast::Sender<AuthEvent>,
}

impl SessionService {
    pub fn new(config: Config, backend: Backend, auth: SupabaseAuth, users: UserDirectory) -> Self {
        let (events, _) = broadcast::channel(32);
        Self {
            config,
            backend,
            auth,
            users,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    fn notify(&self, event: AuthEvent) {
        log::debug!("Auth event: {:?}", event);
        // Nobody listening is fine.
        let _ = self.events.send(event);
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> Result<SignInResponse, AppError> {
        let email = credentials.email.trim();
        if email.is_empty() || credentials.password.is_empty() {
            return Err(AppError::bad_request("Email and password are required"));
        }

        if self.backend.is_offline() {
            return self.sign_in_demo(email).await;
        }

        let session = self
            .auth
            .sign_in_with_password(email, &credentials.password)
            .await?;

        let user = match self.users.profile(session.user.id).await {
            Ok(user) => user,
            Err(e) => {
                log::warn!("Signed in {} but could not load profile: {}", email, e);
                None
            }
        };

        log::info!("User {} signed in", session.user.id);
        self.notify(AuthEvent::SignedIn {
            user_id: session.user.id,
        });

        Ok(SignInResponse {
            access_token: session.access_token,
            token_type: session.token_type,
            expires_in: session.expires_in,
            refresh_token: session.refresh_token,
            user,
            mode: ConnectionMode::Online,
        })
    }

    /// Offline sign-in matches the e-mail against the loaded users only.
    async fn sign_in_demo(&self, email: &str) -> Result<SignInResponse, AppError> {
        let user = self
            .users
            .find_by_email(email)
            .await
            .filter(|u| u.is_active)
            .ok_or_else(|| AppError::bad_request("User not found in demo mode"))?;

        let access_token = issue_token(&user, &self.config)?;
        log::info!("Demo sign-in as {}", user.email);
        self.notify(AuthEvent::SignedIn { user_id: user.id });

        Ok(SignInResponse {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: self.config.jwt_expiration_hours * 3600,
            refresh_token: None,
            user: Some(user),
            mode: ConnectionMode::Offline,
        })
    }

    /// Creates the account and its `player` profile. A failed profile insert
    /// is logged and does not fail the sign-up.
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<SignUpResponse, AppError> {
        if self.backend.is_offline() {
            return Err(AppError::Offline(
                "sign-up is not available in demo mode".to_string(),
            ));
        }

        let email = request.email.trim();
        let name = request.name.trim();
        if email.is_empty() || name.is_empty() {
            return Err(AppError::bad_request("Name and email are required"));
        }
        if request.password.len() < 6 {
            return Err(AppError::bad_request(
                "Password must be at least 6 characters",
            ));
        }

        let response = self.auth.sign_up(email, &request.password, name).await?;
        let account = response.user();

        let new_profile = NewProfile::player(account.id, email, name);
        if let Err(e) = self.users.create_profile(&new_profile).await {
            log::error!("Account {} created without profile: {}", account.id, e);
        }

        Ok(SignUpResponse {
            user_id: account.id,
            email: new_profile.email,
            access_token: response.session().map(|s| s.access_token.clone()),
            confirmation_required: response.session().is_none(),
        })
    }

    /// Ends the session. A failing remote logout is logged; the caller is
    /// signed out locally either way.
    pub async fn sign_out(&self, user_id: Uuid, access_token: &str) {
        if !self.backend.is_offline() {
            if let Err(e) = self.auth.sign_out(access_token).await {
                log::warn!("Remote sign-out failed for {}: {}", user_id, e);
            }
        }

        log::info!("User {} signed out", user_id);
        self.notify(AuthEvent::SignedOut { user_id });
    }

    /// Current session. Online the token is also checked against the hosted
    /// service so that remotely revoked sessions end here too.
    pub async fn session(&self, user: User, access_token: &str) -> Result<SessionInfo, AppError> {
        if !self.backend.is_offline() {
            let account = self.auth.get_user(access_token).await?;
            if account.id != user.id {
                return Err(AppError::Unauthorized);
            }
        }

        Ok(SessionInfo {
            user,
            mode: self.backend.mode(),
        })
    }

    pub fn oauth_url(&self, provider: &str) -> Result<String, AppError> {
        if self.backend.is_offline() {
            return Err(AppError::Offline(
                "third-party sign-in is not available in demo mode".to_string(),
            ));
        }

        let redirect_to = format!("{}/", self.config.client_base_url.trim_end_matches('/'));
        Ok(self.auth.authorize_url(provider, &redirect_to)?.to_string())
    }

    /// Patches a profile on behalf of `actor`. Role and active-flag changes
    /// are dropped unless the actor may manage users.
    pub async fn update_profile(
        &self,
        actor: &User,
        target_id: Uuid,
        mut update: UserUpdate,
    ) -> Result<User, AppError> {
        if !allows(Some(actor), Permission::EditProfile, Some(target_id), None) {
            return Err(AppError::PermissionDenied(
                "You can only edit your own profile".to_string(),
            ));
        }
        if !allows(Some(actor), Permission::ManageUsers, None, None) {
            update.roles = None;
        }
        if update.is_empty() {
            return Err(AppError::bad_request("Nothing to update"));
        }

        let user = self.users.update_user(target_id, &update).await?;
        self.notify(AuthEvent::UserUpdated { user_id: user.id });
        Ok(user)
    }

    /// Keeps the user mirror fresh after every sign-in.
    pub fn spawn_refresh_on_sign_in(&self) -> tokio::task::JoinHandle<()> {
        let mut events = self.subscribe();
        let users = self.users.clone();

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(AuthEvent::SignedIn { .. }) => {
                        // Failures are already logged by the mirror.
                        let _ = users.refresh().await;
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        log::warn!("Auth listener skipped {} events", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

/// Loads the static dataset into every mirror.
pub async fn load_demo_data(state: &AppState) {
    state.users.seed(demo::users()).await;
    state.teams.seed(demo::teams()).await;
    state.events.seed(demo::events()).await;
    state.helper_tasks.seed(demo::helper_tasks()).await;
}

async fn prime(state: &AppState) -> Result<(), AppError> {
    let pool = state
        .backend
        .pool()
        .ok_or_else(|| AppError::Offline("no remote store configured".to_string()))?;

    profile::ping(pool).await?;
    state.users.refresh().await?;
    state.teams.refresh().await?;
    state.events.refresh().await?;
    state.helper_tasks.refresh().await?;
    Ok(())
}

/// Probes the remote store and primes the mirrors within `timeout`.
/// Any failure switches the process to demo mode for good.
pub async fn bootstrap(state: &AppState, timeout: Duration) -> ConnectionMode {
    if state.backend.is_offline() {
        log::info!("Starting in demo mode");
        load_demo_data(state).await;
        return ConnectionMode::Offline;
    }

    let reason = match tokio::time::timeout(timeout, prime(state)).await {
        Ok(Ok(())) => {
            log::info!(
                "Connected to remote store ({} users, {} teams)",
                state.users.list().await.len(),
                state.teams.list().await.len()
            );
            return ConnectionMode::Online;
        }
        Ok(Err(e)) => e.to_string(),
        Err(_) => format!("no answer within {:?}", timeout),
    };

    state.backend.go_offline(&reason);
    load_demo_data(state).await;
    ConnectionMode::Offline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_token;
    use crate::database::models::Role;
    use pretty_assertions::assert_eq;

    async fn demo_state() -> AppState {
        let state = AppState::new(&Config::test_config(), Backend::demo()).unwrap();
        bootstrap(&state, Duration::from_secs(3)).await;
        state
    }

    fn credentials(email: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: "anything".to_string(),
        }
    }

    #[tokio::test]
    async fn bootstrap_without_remote_loads_demo_data() {
        let state = demo_state().await;

        assert_eq!(state.users.list().await.len(), 3);
        assert_eq!(state.teams.list().await.len(), 3);
        assert_eq!(state.events.list().await.len(), 3);
        assert_eq!(state.backend.mode(), ConnectionMode::Offline);
    }

    #[tokio::test]
    async fn unreachable_remote_falls_back_within_timeout() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy("postgres://nobody@127.0.0.1:1/none")
            .unwrap();
        let state = AppState::new(&Config::test_config(), Backend::remote(pool)).unwrap();

        let mode = bootstrap(&state, Duration::from_secs(3)).await;

        assert_eq!(mode, ConnectionMode::Offline);
        assert!(state.backend.is_offline());
        assert_eq!(state.users.list().await.len(), 3);
    }

    #[tokio::test]
    async fn demo_sign_in_issues_local_token_and_notifies() {
        let state = demo_state().await;
        let mut events = state.session.subscribe();

        let response = state
            .session
            .sign_in(&credentials("Trainer@example.com"))
            .await
            .unwrap();

        let claims = verify_token(&response.access_token, &Config::test_config().jwt_secret).unwrap();
        assert_eq!(claims.user_id(), demo::TRAINER_ID);
        assert_eq!(response.mode, ConnectionMode::Offline);
        assert_eq!(
            events.recv().await.unwrap(),
            AuthEvent::SignedIn {
                user_id: demo::TRAINER_ID
            }
        );
    }

    #[tokio::test]
    async fn demo_sign_in_rejects_unknown_email() {
        let state = demo_state().await;
        let result = state.session.sign_in(&credentials("ghost@example.com")).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn sign_up_and_oauth_are_refused_offline() {
        let state = demo_state().await;

        let sign_up = state
            .session
            .sign_up(&SignUpRequest {
                email: "new@example.com".to_string(),
                password: "secret123".to_string(),
                name: "New".to_string(),
            })
            .await;

        assert!(matches!(sign_up, Err(AppError::Offline(_))));
        assert!(matches!(
            state.session.oauth_url("google"),
            Err(AppError::Offline(_))
        ));
    }

    #[tokio::test]
    async fn players_cannot_grant_themselves_roles() {
        let state = demo_state().await;
        let player = state.users.find(demo::PLAYER_ID).await.unwrap();

        let updated = state
            .session
            .update_profile(
                &player,
                player.id,
                UserUpdate {
                    name: Some("Max Mustermann".to_string()),
                    roles: Some(vec![Role::Admin]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Max Mustermann");
        assert_eq!(updated.roles, vec![Role::Player]);

        let other = state
            .session
            .update_profile(&player, demo::ADMIN_ID, UserUpdate::default())
            .await;
        assert!(matches!(other, Err(AppError::PermissionDenied(_))));
    }
}
