//! Role-based access rules.
//!
//! Pure functions over [`User`] and [`RoleName`] so they can be tested
//! without a repository or HTTP layer. The rules:
//!
//! - MD can modify anyone and assign any role.
//! - HR can modify anyone except MDs, and assign non-MD roles.
//! - Everyone can modify themselves.

use crate::models::{PermissionName, RoleName, User};
use std::collections::BTreeSet;

/// Can `actor` modify (update or delete) `target`?
pub fn can_modify(actor: &User, target: &User) -> bool {
    if actor.has_role(RoleName::Md) {
        return true;
    }
    if actor.has_role(RoleName::Hr) && !target.has_role(RoleName::Md) {
        return true;
    }
    actor.id == target.id
}

/// Can `actor` assign `role` to another user?
pub fn can_assign_role(actor: &User, role: RoleName) -> bool {
    match role {
        RoleName::Md => actor.has_role(RoleName::Md),
        _ => actor.has_role(RoleName::Md) || actor.has_role(RoleName::Hr),
    }
}

/// Union of permissions granted by the user's roles, sorted for stable output.
pub fn permissions_of(user: &User) -> BTreeSet<PermissionName> {
    user.roles
        .iter()
        .flat_map(|r| r.permissions.iter().map(|p| p.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Permission, Role};
    use uuid::Uuid;

    fn role(name: RoleName, permissions: &[PermissionName]) -> Role {
        Role {
            id: Uuid::now_v7(),
            name,
            permissions: permissions
                .iter()
                .map(|&name| Permission {
                    id: Uuid::now_v7(),
                    name,
                })
                .collect(),
        }
    }

    fn user_with(roles: Vec<Role>) -> User {
        User::new(
            "Test".into(),
            "User".into(),
            format!("{}@example.com", Uuid::new_v4()),
            roles,
            None,
        )
    }

    #[test]
    fn test_md_can_modify_anyone() {
        let md = user_with(vec![role(RoleName::Md, &[])]);
        let other_md = user_with(vec![role(RoleName::Md, &[])]);
        let worker = user_with(vec![role(RoleName::Worker, &[])]);

        assert!(can_modify(&md, &other_md));
        assert!(can_modify(&md, &worker));
    }

    #[test]
    fn test_hr_cannot_modify_md() {
        let hr = user_with(vec![role(RoleName::Hr, &[])]);
        let md = user_with(vec![role(RoleName::Md, &[])]);
        let worker = user_with(vec![role(RoleName::Worker, &[])]);

        assert!(!can_modify(&hr, &md));
        assert!(can_modify(&hr, &worker));
    }

    #[test]
    fn test_worker_can_only_modify_self() {
        let worker = user_with(vec![role(RoleName::Worker, &[])]);
        let other = user_with(vec![role(RoleName::Worker, &[])]);

        assert!(can_modify(&worker, &worker));
        assert!(!can_modify(&worker, &other));
    }

    #[test]
    fn test_md_role_assignable_only_by_md() {
        let md = user_with(vec![role(RoleName::Md, &[])]);
        let hr = user_with(vec![role(RoleName::Hr, &[])]);
        let worker = user_with(vec![role(RoleName::Worker, &[])]);

        assert!(can_assign_role(&md, RoleName::Md));
        assert!(!can_assign_role(&hr, RoleName::Md));
        assert!(!can_assign_role(&worker, RoleName::Md));
    }

    #[test]
    fn test_non_md_roles_assignable_by_md_and_hr() {
        let md = user_with(vec![role(RoleName::Md, &[])]);
        let hr = user_with(vec![role(RoleName::Hr, &[])]);
        let worker = user_with(vec![role(RoleName::Worker, &[])]);

        for r in [RoleName::Hr, RoleName::Worker] {
            assert!(can_assign_role(&md, r));
            assert!(can_assign_role(&hr, r));
            assert!(!can_assign_role(&worker, r));
        }
    }

    #[test]
    fn test_permissions_union_deduplicates() {
        let user = user_with(vec![
            role(
                RoleName::Hr,
                &[
                    PermissionName::CreateStaff,
                    PermissionName::ViewStaff,
                    PermissionName::EditStaffDetails,
                ],
            ),
            role(RoleName::Worker, &[PermissionName::ViewStaff]),
        ]);

        let permissions = permissions_of(&user);
        assert_eq!(permissions.len(), 3);
        assert!(permissions.contains(&PermissionName::ViewStaff));
        assert!(!permissions.contains(&PermissionName::DeleteStaff));
    }
}
