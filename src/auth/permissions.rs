//! Role permission table.
//!
//! A fixed lookup from action name to the roles that may perform it. The
//! check is a pure function of the user's role set; unknown actions and
//! inactive or absent users are always denied.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{Role, User};

/// Actions guarded by the permission table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    CreateEvent,
    EditEvent,
    DeleteEvent,
    ManageUsers,
    ManageTeams,
    JoinEvent,
    ManageHelperTasks,
    EditProfile,
}

impl Permission {
    pub const ALL: &'static [Permission] = &[
        Permission::CreateEvent,
        Permission::EditEvent,
        Permission::DeleteEvent,
        Permission::ManageUsers,
        Permission::ManageTeams,
        Permission::JoinEvent,
        Permission::ManageHelperTasks,
        Permission::EditProfile,
    ];

    /// Parse an action name; unknown names yield `None`.
    #[must_use]
    pub fn from_action(action: &str) -> Option<Self> {
        match action {
            "create_event" => Some(Permission::CreateEvent),
            "edit_event" => Some(Permission::EditEvent),
            "delete_event" => Some(Permission::DeleteEvent),
            "manage_users" => Some(Permission::ManageUsers),
            "manage_teams" => Some(Permission::ManageTeams),
            "join_event" => Some(Permission::JoinEvent),
            "manage_helper_tasks" => Some(Permission::ManageHelperTasks),
            "edit_profile" => Some(Permission::EditProfile),
            _ => None,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            Permission::CreateEvent => "create_event",
            Permission::EditEvent => "edit_event",
            Permission::DeleteEvent => "delete_event",
            Permission::ManageUsers => "manage_users",
            Permission::ManageTeams => "manage_teams",
            Permission::JoinEvent => "join_event",
            Permission::ManageHelperTasks => "manage_helper_tasks",
            Permission::EditProfile => "edit_profile",
        }
    }

    /// Roles that grant this action unconditionally.
    pub fn granted_to(&self) -> &'static [Role] {
        match self {
            Permission::CreateEvent | Permission::EditEvent => &[Role::Admin, Role::Trainer],
            Permission::DeleteEvent | Permission::ManageUsers => &[Role::Admin],
            Permission::ManageTeams | Permission::ManageHelperTasks => {
                &[Role::Admin, Role::Trainer]
            }
            Permission::JoinEvent => &[Role::Admin, Role::Trainer, Role::Player],
            Permission::EditProfile => &[Role::Admin],
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.action())
    }
}

/// Table lookup for a typed action.
///
/// `target_user_id` only matters for `EditProfile`, where users may always
/// edit their own profile. `_team_id` is accepted for callers that carry a
/// team scope; the table does not consult it.
pub fn allows(
    user: Option<&User>,
    permission: Permission,
    target_user_id: Option<Uuid>,
    _team_id: Option<Uuid>,
) -> bool {
    let Some(user) = user else {
        return false;
    };
    if !user.is_active {
        return false;
    }

    if permission == Permission::EditProfile && target_user_id == Some(user.id) {
        return true;
    }

    user.has_any_role(permission.granted_to())
}

/// String-keyed entry point; unknown action names are denied.
pub fn has_permission(
    user: Option<&User>,
    action: &str,
    target_user_id: Option<Uuid>,
    team_id: Option<Uuid>,
) -> bool {
    match Permission::from_action(action) {
        Some(permission) => allows(user, permission, target_user_id, team_id),
        None => {
            log::debug!("Unknown permission action '{}' denied", action);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn user_with(roles: &[Role]) -> User {
        User {
            id: Uuid::from_u128(42),
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            roles: roles.to_vec(),
            teams: vec![],
            assigned_teams: vec![],
            parent_of: vec![],
            phone: None,
            date_of_birth: None,
            profile_image: None,
            is_active: true,
            registration_date: Utc::now(),
        }
    }

    #[test]
    fn trainer_cannot_delete_events_but_admin_can() {
        let trainer = user_with(&[Role::Trainer]);
        let admin = user_with(&[Role::Admin]);

        assert!(!has_permission(Some(&trainer), "delete_event", None, None));
        assert!(has_permission(Some(&admin), "delete_event", None, None));
    }

    #[test]
    fn admin_passes_every_entry_granting_admin() {
        let admin = user_with(&[Role::Admin]);
        for permission in Permission::ALL {
            if permission.granted_to().contains(&Role::Admin) {
                assert!(
                    has_permission(Some(&admin), permission.action(), None, None),
                    "admin denied {}",
                    permission
                );
            }
        }
    }

    #[test]
    fn inactive_users_are_always_denied() {
        let mut user = user_with(&[Role::Admin, Role::Trainer, Role::Player, Role::Parent]);
        user.is_active = false;

        for permission in Permission::ALL {
            assert!(!allows(Some(&user), *permission, Some(user.id), None));
        }
    }

    #[test]
    fn absent_user_and_unknown_actions_are_denied() {
        let admin = user_with(&[Role::Admin]);

        assert!(!has_permission(None, "create_event", None, None));
        assert!(!has_permission(Some(&admin), "launch_rocket", None, None));
        assert!(!has_permission(Some(&admin), "", None, None));
    }

    #[test]
    fn role_sets_are_unioned() {
        let parent = user_with(&[Role::Parent]);
        let parent_trainer = user_with(&[Role::Parent, Role::Trainer]);

        assert!(!has_permission(Some(&parent), "join_event", None, None));
        assert!(has_permission(Some(&parent_trainer), "join_event", None, None));
        assert!(has_permission(Some(&parent_trainer), "manage_teams", None, None));
        assert!(!has_permission(Some(&parent_trainer), "manage_users", None, None));
    }

    #[test]
    fn own_profile_is_editable_by_anyone_active() {
        let player = user_with(&[Role::Player]);

        assert!(has_permission(Some(&player), "edit_profile", Some(player.id), None));
        assert!(!has_permission(
            Some(&player),
            "edit_profile",
            Some(Uuid::from_u128(7)),
            None
        ));
    }

    #[test]
    fn action_names_round_trip() {
        for permission in Permission::ALL {
            assert_eq!(Permission::from_action(permission.action()), Some(*permission));
        }
    }
}
