use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::{Role, normalize_roles, roles_from_tags};

/// Row shape of the remote `profiles` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub roles: Option<Vec<String>>,
    pub teams: Option<Vec<Uuid>>,
    pub assigned_teams: Option<Vec<Uuid>>,
    pub parent_of: Option<Vec<Uuid>>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub profile_image: Option<String>,
    pub is_active: Option<bool>,
    pub created_at: DateTime<Utc>,
}

/// Application-level user record mirrored from `profiles`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub roles: Vec<Role>,
    pub teams: Vec<Uuid>,
    pub assigned_teams: Vec<Uuid>,
    pub parent_of: Vec<Uuid>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub profile_image: Option<String>,
    pub is_active: bool,
    pub registration_date: DateTime<Utc>,
}

impl From<ProfileRow> for User {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            name: row.name.unwrap_or_default(),
            email: row.email,
            roles: roles_from_tags(row.roles),
            teams: row.teams.unwrap_or_default(),
            assigned_teams: row.assigned_teams.unwrap_or_default(),
            parent_of: row.parent_of.unwrap_or_default(),
            phone: row.phone,
            date_of_birth: row.date_of_birth,
            profile_image: row.profile_image,
            is_active: row.is_active.unwrap_or(true),
            registration_date: row.created_at,
        }
    }
}

impl User {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|r| self.has_role(*r))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    /// Case-insensitive substring match on name or email.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.email.to_lowercase().contains(&term)
    }
}

/// Partial update of a profile; `None` leaves the field untouched.
///
/// The active flag is not part of it: deactivation also drops the user from
/// the directory and goes through `UserDirectory::set_active`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub name: Option<String>,
    pub roles: Option<Vec<Role>>,
    pub teams: Option<Vec<Uuid>>,
    pub assigned_teams: Option<Vec<Uuid>>,
    pub parent_of: Option<Vec<Uuid>>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub profile_image: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.roles.is_none()
            && self.teams.is_none()
            && self.assigned_teams.is_none()
            && self.parent_of.is_none()
            && self.phone.is_none()
            && self.date_of_birth.is_none()
            && self.profile_image.is_none()
    }

    /// Sorts and de-duplicates the role set, if one is given.
    pub fn normalized(mut self) -> Self {
        self.roles = self.roles.map(normalize_roles);
        self
    }

    pub fn apply(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(roles) = &self.roles {
            user.roles = roles.clone();
        }
        if let Some(teams) = &self.teams {
            user.teams = teams.clone();
        }
        if let Some(assigned_teams) = &self.assigned_teams {
            user.assigned_teams = assigned_teams.clone();
        }
        if let Some(parent_of) = &self.parent_of {
            user.parent_of = parent_of.clone();
        }
        if let Some(phone) = &self.phone {
            user.phone = Some(phone.clone());
        }
        if let Some(date_of_birth) = self.date_of_birth {
            user.date_of_birth = Some(date_of_birth);
        }
        if let Some(profile_image) = &self.profile_image {
            user.profile_image = Some(profile_image.clone());
        }
    }
}

/// Insert shape for a freshly signed-up profile.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub roles: Vec<Role>,
}

impl NewProfile {
    pub fn player(id: Uuid, email: &str, name: &str) -> Self {
        Self {
            id,
            email: email.to_lowercase(),
            name: name.to_string(),
            roles: vec![Role::Player],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row() -> ProfileRow {
        ProfileRow {
            id: Uuid::from_u128(7),
            name: None,
            email: "anna@example.com".to_string(),
            roles: None,
            teams: None,
            assigned_teams: Some(vec![Uuid::from_u128(1)]),
            parent_of: None,
            phone: None,
            date_of_birth: NaiveDate::from_ymd_opt(2010, 5, 4),
            profile_image: None,
            is_active: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn profile_row_defaults_are_substituted() {
        let user = User::from(row());

        assert_eq!(user.name, "");
        assert_eq!(user.roles, vec![Role::Player]);
        assert!(user.teams.is_empty());
        assert_eq!(user.assigned_teams, vec![Uuid::from_u128(1)]);
        assert!(user.is_active);
        assert_eq!(user.date_of_birth, NaiveDate::from_ymd_opt(2010, 5, 4));
    }

    #[test]
    fn update_only_touches_given_fields() {
        let mut user = User::from(row());
        let update = UserUpdate {
            name: Some("Anna".to_string()),
            roles: Some(vec![Role::Player, Role::Parent]),
            ..Default::default()
        };

        update.apply(&mut user);

        assert_eq!(user.name, "Anna");
        assert_eq!(user.roles, vec![Role::Player, Role::Parent]);
        assert_eq!(user.email, "anna@example.com");
        assert!(!update.is_empty());
        assert!(UserUpdate::default().is_empty());
    }

    #[test]
    fn active_flag_is_not_a_profile_field() {
        let update: UserUpdate =
            serde_json::from_value(serde_json::json!({ "isActive": false })).unwrap();
        assert!(update.is_empty());
    }

    #[test]
    fn normalized_update_sorts_and_dedups_roles() {
        let update = UserUpdate {
            roles: Some(vec![Role::Player, Role::Admin, Role::Player]),
            ..Default::default()
        }
        .normalized();

        assert_eq!(update.roles, Some(vec![Role::Admin, Role::Player]));
    }

    #[test]
    fn user_serializes_in_camel_case() {
        let user = User::from(row());
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["isActive"], serde_json::json!(true));
        assert_eq!(json["roles"], serde_json::json!(["player"]));
        assert!(json.get("registrationDate").is_some());
    }
}
