use std::sync::Arc;

use uuid::Uuid;

use crate::database::{
    models::{MemberKind, Role, Team, TeamInput, TeamUpdate, User},
    repositories::team,
};
use crate::error::AppError;
use crate::services::{backend::Backend, mirror::Mirror};

/// Mirror of the active teams and their rosters.
#[derive(Clone)]
pub struct TeamRoster {
    backend: Backend,
    teams: Arc<Mirror<Team>>,
}

impl TeamRoster {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            teams: Arc::new(Mirror::default()),
        }
    }

    pub async fn seed(&self, teams: Vec<Team>) {
        self.teams.replace_all(teams).await;
    }

    pub async fn refresh(&self) -> Result<(), AppError> {
        let Some(pool) = self.backend.pool() else {
            return Ok(());
        };

        match team::list_active(pool).await {
            Ok(teams) => {
                log::debug!("Loaded {} teams", teams.len());
                self.teams.replace_all(teams).await;
                Ok(())
            }
            Err(e) => {
                log::warn!("Failed to load teams: {}", e);
                Err(e.into())
            }
        }
    }

    pub async fn list(&self) -> Vec<Team> {
        self.teams.all().await
    }

    pub async fn find(&self, id: Uuid) -> Result<Team, AppError> {
        self.teams
            .get(id)
            .await
            .ok_or_else(|| AppError::not_found("Team not found"))
    }

    pub async fn create(&self, input: TeamInput) -> Result<Team, AppError> {
        input.validate()?;
        let draft = input.into_team(Uuid::new_v4());

        let created = match self.backend.pool() {
            Some(pool) => team::create_team(pool, &draft).await.map_err(|e| {
                log::error!("Failed to create team '{}': {}", draft.name, e);
                AppError::from(e)
            })?,
            None => draft,
        };

        self.teams.upsert(created.clone()).await;
        Ok(created)
    }

    pub async fn update(&self, id: Uuid, update: &TeamUpdate) -> Result<Team, AppError> {
        update.validate()?;

        let Some(pool) = self.backend.pool() else {
            return self
                .teams
                .patch(id, |t| update.apply(t))
                .await
                .ok_or_else(|| AppError::not_found("Team not found"));
        };

        let updated = team::update_team(pool, id, update)
            .await
            .map_err(|e| {
                log::error!("Failed to update team {}: {}", id, e);
                AppError::from(e)
            })?
            .ok_or_else(|| AppError::not_found("Team not found"))?;

        self.teams.upsert(updated.clone()).await;
        Ok(updated)
    }

    /// Soft delete; the team disappears from the roster.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let Some(pool) = self.backend.pool() else {
            return self
                .teams
                .remove(id)
                .await
                .map(|_| ())
                .ok_or_else(|| AppError::not_found("Team not found"));
        };

        team::deactivate_team(pool, id)
            .await
            .map_err(|e| {
                log::error!("Failed to delete team {}: {}", id, e);
                AppError::from(e)
            })?
            .ok_or_else(|| AppError::not_found("Team not found"))?;

        self.teams.remove(id).await;
        Ok(())
    }

    /// Adds `user_id` to the players or trainers. Existing members are left as is.
    pub async fn add_member(
        &self,
        team_id: Uuid,
        kind: MemberKind,
        user_id: Uuid,
    ) -> Result<Team, AppError> {
        let team = self.find(team_id).await?;
        if team.members(kind).contains(&user_id) {
            return Ok(team);
        }

        let mut members = team.members(kind).clone();
        members.push(user_id);
        self.write_members(team_id, kind, members).await
    }

    pub async fn remove_member(
        &self,
        team_id: Uuid,
        kind: MemberKind,
        user_id: Uuid,
    ) -> Result<Team, AppError> {
        let team = self.find(team_id).await?;
        if !team.members(kind).contains(&user_id) {
            return Ok(team);
        }

        let members: Vec<Uuid> = team
            .members(kind)
            .iter()
            .copied()
            .filter(|id| *id != user_id)
            .collect();
        self.write_members(team_id, kind, members).await
    }

    async fn write_members(
        &self,
        team_id: Uuid,
        kind: MemberKind,
        members: Vec<Uuid>,
    ) -> Result<Team, AppError> {
        let Some(pool) = self.backend.pool() else {
            return self
                .teams
                .patch(team_id, |t| *t.members_mut(kind) = members)
                .await
                .ok_or_else(|| AppError::not_found("Team not found"));
        };

        let updated = team::set_members(pool, team_id, kind, &members)
            .await
            .map_err(|e| {
                log::error!("Failed to update {} of team {}: {}", kind.column(), team_id, e);
                AppError::from(e)
            })?
            .ok_or_else(|| AppError::not_found("Team not found"))?;

        self.teams.upsert(updated.clone()).await;
        Ok(updated)
    }

    /// Teams visible to `user`, unioned over their roles.
    pub async fn teams_for_user(&self, user: &User) -> Vec<Team> {
        if user.is_admin() {
            return self.teams.all().await;
        }

        let children = user.parent_of.clone();
        let user_id = user.id;
        let is_trainer = user.has_role(Role::Trainer);
        let is_player = user.has_role(Role::Player);
        let is_parent = user.has_role(Role::Parent);

        self.teams
            .filter(|team| {
                (is_trainer && team.has_trainer(user_id))
                    || (is_player && team.has_player(user_id))
                    || (is_parent && children.iter().any(|child| team.has_player(*child)))
            })
            .await
    }

    /// Resolves the member ids of a team against `users`, keeping roster order.
    pub async fn members(
        &self,
        team_id: Uuid,
        kind: MemberKind,
        users: &[User],
    ) -> Result<Vec<User>, AppError> {
        let team = self.find(team_id).await?;
        Ok(team
            .members(kind)
            .iter()
            .filter_map(|id| users.iter().find(|u| u.id == *id).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Gender, TeamCategory};
    use crate::services::demo;
    use pretty_assertions::assert_eq;

    async fn roster() -> TeamRoster {
        let roster = TeamRoster::new(Backend::demo());
        roster.seed(demo::teams()).await;
        roster
    }

    fn ids(teams: &[Team]) -> Vec<Uuid> {
        teams.iter().map(|t| t.id).collect()
    }

    #[tokio::test]
    async fn adding_an_existing_player_is_a_no_op() {
        let roster = roster().await;

        let team = roster
            .add_member(demo::TEAM_U14_M, MemberKind::Player, demo::PLAYER_ID)
            .await
            .unwrap();

        assert_eq!(team.players, vec![demo::PLAYER_ID]);
    }

    #[tokio::test]
    async fn remove_then_add_restores_the_roster() {
        let roster = roster().await;
        let before = roster.find(demo::TEAM_U14_M).await.unwrap().trainers;

        roster
            .remove_member(demo::TEAM_U14_M, MemberKind::Trainer, demo::TRAINER_ID)
            .await
            .unwrap();
        let after = roster
            .add_member(demo::TEAM_U14_M, MemberKind::Trainer, demo::TRAINER_ID)
            .await
            .unwrap();

        assert_eq!(after.trainers, before);
    }

    #[tokio::test]
    async fn teams_for_user_follow_role_membership() {
        let roster = roster().await;
        let users = demo::users();
        let (admin, trainer, player) = (&users[0], &users[1], &users[2]);

        assert_eq!(roster.teams_for_user(admin).await.len(), 3);
        assert_eq!(
            ids(&roster.teams_for_user(trainer).await),
            vec![demo::TEAM_U14_M, demo::TEAM_U16_F]
        );
        assert_eq!(
            ids(&roster.teams_for_user(player).await),
            vec![demo::TEAM_U14_M]
        );
    }

    #[tokio::test]
    async fn parents_see_their_childrens_teams() {
        let roster = roster().await;
        let mut parent = demo::users().remove(2);
        parent.id = Uuid::new_v4();
        parent.roles = vec![Role::Parent];
        parent.parent_of = vec![demo::PLAYER_ID];

        assert_eq!(
            ids(&roster.teams_for_user(&parent).await),
            vec![demo::TEAM_U14_M]
        );
    }

    #[tokio::test]
    async fn create_requires_season_and_soft_delete_hides_team() {
        let roster = roster().await;
        let input = TeamInput {
            name: "U20 Mixed".to_string(),
            category: TeamCategory::U20,
            gender: Gender::Mixed,
            season: " ".to_string(),
            trainers: vec![],
            players: vec![],
            captain: None,
            description: None,
            training_times: vec![],
        };
        assert!(matches!(
            roster.create(input.clone()).await,
            Err(AppError::BadRequest(_))
        ));

        let team = roster
            .create(TeamInput {
                season: demo::SEASON.to_string(),
                ..input
            })
            .await
            .unwrap();
        assert_eq!(roster.list().await.len(), 4);

        roster.delete(team.id).await.unwrap();
        assert!(roster.find(team.id).await.is_err());
    }

    #[tokio::test]
    async fn members_resolve_against_user_list() {
        let roster = roster().await;
        let users = demo::users();

        let players = roster
            .members(demo::TEAM_U14_M, MemberKind::Player, &users)
            .await
            .unwrap();

        assert_eq!(players.len(), 1);
        assert_eq!(players[0].name, "Player Max");
    }
}
