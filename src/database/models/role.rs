use super::macros::string_enum;

string_enum! {
    /// Club role tag. A user holds a set of these.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub enum Role {
        Admin => "admin",
        Trainer => "trainer",
        Player => "player",
        Parent => "parent",
    }
}

/// Maps a remote `roles` array onto a role set.
///
/// Unknown tags are dropped and duplicates collapsed; a missing or empty
/// result falls back to `[Player]`.
pub fn roles_from_tags(tags: Option<Vec<String>>) -> Vec<Role> {
    let mut roles: Vec<Role> = tags
        .unwrap_or_default()
        .iter()
        .filter_map(|tag| match tag.parse::<Role>() {
            Ok(role) => Some(role),
            Err(e) => {
                log::warn!("Ignoring role tag: {}", e);
                None
            }
        })
        .collect();

    roles = normalize_roles(roles);
    if roles.is_empty() {
        roles.push(Role::Player);
    }
    roles
}

/// Role sets are kept sorted and free of duplicates.
pub fn normalize_roles(mut roles: Vec<Role>) -> Vec<Role> {
    roles.sort();
    roles.dedup();
    roles
}

pub fn roles_to_tags(roles: &[Role]) -> Vec<String> {
    roles.iter().map(|r| r.to_string()).collect()
}
