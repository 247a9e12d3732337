use std::sync::Arc;

use uuid::Uuid;

use crate::database::{
    models::{NewProfile, Role, User, UserUpdate},
    repositories::profile,
};
use crate::error::AppError;
use crate::services::{backend::Backend, mirror::Mirror};

/// Mirror of the active club members.
#[derive(Clone)]
pub struct UserDirectory {
    backend: Backend,
    users: Arc<Mirror<User>>,
    page_size: i64,
}

impl UserDirectory {
    pub fn new(backend: Backend, page_size: i64) -> Self {
        Self {
            backend,
            users: Arc::new(Mirror::default()),
            page_size,
        }
    }

    /// Replaces the cache with a dataset that never touches the remote store.
    pub async fn seed(&self, users: Vec<User>) {
        self.users.replace_all(users).await;
    }

    /// Reloads the first page of active users. Offline this is a no-op.
    pub async fn refresh(&self) -> Result<(), AppError> {
        let Some(pool) = self.backend.pool() else {
            return Ok(());
        };

        match profile::list_active(pool, self.page_size).await {
            Ok(users) => {
                log::debug!("Loaded {} users", users.len());
                self.users.replace_all(users).await;
                Ok(())
            }
            Err(e) => {
                log::warn!("Failed to load users: {}", e);
                Err(e.into())
            }
        }
    }

    pub async fn list(&self) -> Vec<User> {
        self.users.all().await
    }

    /// Every profile including inactive ones, for the admin table.
    pub async fn list_all(&self) -> Result<Vec<User>, AppError> {
        match self.backend.pool() {
            Some(pool) => profile::list_all(pool).await.map_err(|e| {
                log::warn!("Failed to load all users: {}", e);
                e.into()
            }),
            None => Ok(self.users.all().await),
        }
    }

    pub async fn find(&self, id: Uuid) -> Option<User> {
        self.users.get(id).await
    }

    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        let email = email.trim().to_lowercase();
        self.users
            .find(|u| u.email.to_lowercase() == email)
            .await
    }

    /// Profile of a signed-in user. Online this reads the remote row so that
    /// users beyond the cached page can still authenticate.
    pub async fn profile(&self, id: Uuid) -> Result<Option<User>, AppError> {
        match self.backend.pool() {
            Some(pool) => Ok(profile::find_by_id(pool, id).await?),
            None => Ok(self.users.get(id).await),
        }
    }

    pub async fn users_by_role(&self, role: Role) -> Vec<User> {
        self.users
            .filter(|u| u.is_active && u.has_role(role))
            .await
    }

    /// Whether the club has an active admin. Online this asks the remote
    /// store, since the cached page may not reach back to the oldest accounts.
    pub async fn has_active_admin(&self) -> Result<bool, AppError> {
        match self.backend.pool() {
            Some(pool) => profile::any_active_admin(pool).await.map_err(|e| {
                log::warn!("Failed to look up admins: {}", e);
                e.into()
            }),
            None => Ok(!self.users_by_role(Role::Admin).await.is_empty()),
        }
    }

    pub async fn search(&self, term: &str) -> Vec<User> {
        let term = term.trim();
        self.users
            .filter(|u| u.is_active && u.matches(term))
            .await
    }

    pub async fn update_user(&self, id: Uuid, update: &UserUpdate) -> Result<User, AppError> {
        if update.roles.as_ref().is_some_and(|r| r.is_empty()) {
            return Err(AppError::bad_request("A user needs at least one role"));
        }
        let update = &update.clone().normalized();

        let Some(pool) = self.backend.pool() else {
            return self
                .users
                .patch(id, |u| update.apply(u))
                .await
                .ok_or_else(|| AppError::not_found("User not found"));
        };

        let user = profile::update_profile(pool, id, update)
            .await
            .map_err(|e| {
                log::error!("Failed to update user {}: {}", id, e);
                AppError::from(e)
            })?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        self.users.patch(id, |u| *u = user.clone()).await;
        Ok(user)
    }

    pub async fn set_roles(&self, id: Uuid, roles: Vec<Role>) -> Result<User, AppError> {
        self.update_user(
            id,
            &UserUpdate {
                roles: Some(roles),
                ..Default::default()
            },
        )
        .await
    }

    /// Toggles the active flag. Inactive users leave the mirror; reactivated
    /// users join it again.
    pub async fn set_active(&self, id: Uuid, is_active: bool) -> Result<User, AppError> {
        let user = match self.backend.pool() {
            Some(pool) => profile::set_active(pool, id, is_active)
                .await
                .map_err(|e| {
                    log::error!("Failed to change active flag of user {}: {}", id, e);
                    AppError::from(e)
                })?
                .ok_or_else(|| AppError::not_found("User not found"))?,
            None => {
                let mut user = self
                    .users
                    .get(id)
                    .await
                    .ok_or_else(|| AppError::not_found("User not found"))?;
                user.is_active = is_active;
                user
            }
        };

        if is_active {
            self.users.upsert(user.clone()).await;
        } else {
            self.users.remove(id).await;
        }
        Ok(user)
    }

    /// Soft delete.
    pub async fn deactivate_user(&self, id: Uuid) -> Result<User, AppError> {
        self.set_active(id, false).await
    }

    /// Grants the admin role to the profile registered under `email`.
    pub async fn promote_to_admin(&self, email: &str) -> Result<User, AppError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AppError::bad_request("Please enter an email address"));
        }

        let user = match self.backend.pool() {
            Some(pool) => profile::find_by_email(pool, email).await?,
            None => self.find_by_email(email).await,
        }
        .ok_or_else(|| AppError::not_found(format!("No user registered as {}", email)))?;

        if user.is_admin() {
            return Ok(user);
        }

        let mut roles = user.roles.clone();
        roles.push(Role::Admin);
        let promoted = self.set_roles(user.id, roles).await?;

        log::info!("Granted admin role to {}", promoted.email);
        Ok(promoted)
    }

    /// Inserts the profile row of a freshly signed-up account.
    pub async fn create_profile(&self, new_profile: &NewProfile) -> Result<User, AppError> {
        let Some(pool) = self.backend.pool() else {
            return Err(AppError::Offline(
                "profiles cannot be created without the remote store".to_string(),
            ));
        };

        let user = profile::insert_profile(pool, new_profile)
            .await
            .map_err(|e| {
                log::error!("Failed to create profile for {}: {}", new_profile.email, e);
                AppError::from(e)
            })?;

        self.users.upsert(user.clone()).await;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::demo;
    use pretty_assertions::assert_eq;

    async fn directory() -> UserDirectory {
        let directory = UserDirectory::new(Backend::demo(), 50);
        directory.seed(demo::users()).await;
        directory
    }

    #[tokio::test]
    async fn refresh_offline_keeps_local_state() {
        let directory = directory().await;
        directory.refresh().await.unwrap();
        assert_eq!(directory.list().await.len(), 3);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_over_name_and_email() {
        let directory = directory().await;

        let by_name: Vec<Uuid> = directory.search("hans").await.iter().map(|u| u.id).collect();
        let by_email: Vec<Uuid> = directory.search("PLAYER@").await.iter().map(|u| u.id).collect();

        assert_eq!(by_name, vec![demo::TRAINER_ID]);
        assert_eq!(by_email, vec![demo::PLAYER_ID]);
    }

    #[tokio::test]
    async fn deactivated_users_leave_the_directory() {
        let directory = directory().await;

        let user = directory.deactivate_user(demo::PLAYER_ID).await.unwrap();

        assert!(!user.is_active);
        assert!(directory.find(demo::PLAYER_ID).await.is_none());
        assert!(directory.users_by_role(Role::Player).await.is_empty());
    }

    #[tokio::test]
    async fn promote_adds_admin_to_existing_roles() {
        let directory = directory().await;

        let user = directory
            .promote_to_admin("Trainer@Example.com")
            .await
            .unwrap();

        assert_eq!(user.roles, vec![Role::Admin, Role::Trainer]);
        assert_eq!(directory.users_by_role(Role::Admin).await.len(), 2);
    }

    #[tokio::test]
    async fn promote_unknown_email_is_not_found() {
        let directory = directory().await;
        let result = directory.promote_to_admin("nobody@example.com").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn empty_role_set_is_rejected() {
        let directory = directory().await;
        let result = directory.set_roles(demo::PLAYER_ID, vec![]).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(
            directory.find(demo::PLAYER_ID).await.unwrap().roles,
            vec![Role::Player]
        );
    }

    #[tokio::test]
    async fn role_updates_are_stored_sorted_without_duplicates() {
        let directory = directory().await;

        let user = directory
            .update_user(
                demo::PLAYER_ID,
                &UserUpdate {
                    roles: Some(vec![Role::Player, Role::Parent, Role::Player]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(user.roles, vec![Role::Player, Role::Parent]);
        assert_eq!(
            directory.find(demo::PLAYER_ID).await.unwrap().roles,
            vec![Role::Player, Role::Parent]
        );
    }

    #[tokio::test]
    async fn admin_presence_follows_the_active_flag() {
        let directory = directory().await;
        assert!(directory.has_active_admin().await.unwrap());

        directory.set_active(demo::ADMIN_ID, false).await.unwrap();
        assert!(!directory.has_active_admin().await.unwrap());
    }

    #[tokio::test]
    async fn profiles_cannot_be_created_offline() {
        let directory = directory().await;
        let result = directory
            .create_profile(&NewProfile::player(Uuid::new_v4(), "new@example.com", "New"))
            .await;
        assert!(matches!(result, Err(AppError::Offline(_))));
    }
}
