use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{StaffError, StaffResult};
use crate::models::{Permission, PermissionName, Role, RoleName, User};

/// Repository trait for staff persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StaffRepository: Send + Sync {
    /// Create a new user
    async fn create(&self, user: User) -> StaffResult<User>;

    /// Get a user by ID, roles and permissions loaded
    async fn get_by_id(&self, id: Uuid) -> StaffResult<Option<User>>;

    /// Get a user by email (case-insensitive)
    async fn get_by_email(&self, email: &str) -> StaffResult<Option<User>>;

    /// Get a user by their pending activation token
    async fn get_by_activation_token(&self, token: &str) -> StaffResult<Option<User>>;

    /// List all users, newest first
    async fn list(&self) -> StaffResult<Vec<User>>;

    /// Update an existing user
    async fn update(&self, user: User) -> StaffResult<User>;

    /// Delete a user by ID, returning whether a row was removed
    async fn delete(&self, id: Uuid) -> StaffResult<bool>;

    /// Resolve role names to stored roles with their permissions
    async fn resolve_roles(&self, names: &[RoleName]) -> StaffResult<Vec<Role>>;

    /// Check if an email already exists
    async fn exists_by_email(&self, email: &str) -> StaffResult<bool>;
}

/// In-memory implementation of StaffRepository (for development/testing)
///
/// Seeds the standard role catalog so role resolution behaves like a
/// migrated database.
#[derive(Debug, Clone)]
pub struct InMemoryStaffRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    roles: Arc<Vec<Role>>,
}

fn seeded_roles() -> Vec<Role> {
    let permission = |name: PermissionName| Permission {
        id: Uuid::now_v7(),
        name,
    };

    vec![
        Role {
            id: Uuid::now_v7(),
            name: RoleName::Md,
            permissions: vec![
                permission(PermissionName::CreateStaff),
                permission(PermissionName::ViewStaff),
                permission(PermissionName::EditStaffDetails),
                permission(PermissionName::DeleteStaff),
            ],
        },
        Role {
            id: Uuid::now_v7(),
            name: RoleName::Hr,
            permissions: vec![
                permission(PermissionName::CreateStaff),
                permission(PermissionName::ViewStaff),
                permission(PermissionName::EditStaffDetails),
            ],
        },
        Role {
            id: Uuid::now_v7(),
            name: RoleName::Worker,
            permissions: vec![permission(PermissionName::ViewStaff)],
        },
    ]
}

impl Default for InMemoryStaffRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStaffRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            roles: Arc::new(seeded_roles()),
        }
    }
}

#[async_trait]
impl StaffRepository for InMemoryStaffRepository {
    async fn create(&self, user: User) -> StaffResult<User> {
        let mut users = self.users.write().await;

        let email_exists = users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email));
        if email_exists {
            return Err(StaffError::DuplicateEmail(user.email));
        }

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, email = %user.email, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> StaffResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> StaffResult<Option<User>> {
        let users = self.users.read().await;
        let user = users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned();
        Ok(user)
    }

    async fn get_by_activation_token(&self, token: &str) -> StaffResult<Option<User>> {
        let users = self.users.read().await;
        let user = users
            .values()
            .find(|u| u.activation_token.as_deref() == Some(token))
            .cloned();
        Ok(user)
    }

    async fn list(&self) -> StaffResult<Vec<User>> {
        let users = self.users.read().await;

        let mut result: Vec<User> = users.values().cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(result)
    }

    async fn update(&self, user: User) -> StaffResult<User> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(StaffError::NotFound(user.id));
        }

        let email_exists = users
            .values()
            .any(|u| u.id != user.id && u.email.eq_ignore_ascii_case(&user.email));
        if email_exists {
            return Err(StaffError::DuplicateEmail(user.email));
        }

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, "Updated user");
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> StaffResult<bool> {
        let mut users = self.users.write().await;

        if users.remove(&id).is_some() {
            tracing::info!(user_id = %id, "Deleted user");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn resolve_roles(&self, names: &[RoleName]) -> StaffResult<Vec<Role>> {
        let resolved: Vec<Role> = self
            .roles
            .iter()
            .filter(|r| names.contains(&r.name))
            .cloned()
            .collect();
        Ok(resolved)
    }

    async fn exists_by_email(&self, email: &str) -> StaffResult<bool> {
        let users = self.users.read().await;
        let exists = users.values().any(|u| u.email.eq_ignore_ascii_case(email));
        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(email: &str) -> User {
        User::new("Test".into(), "User".into(), email.into(), vec![], None)
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let repo = InMemoryStaffRepository::new();

        let created = repo.create(sample_user("test@example.com")).await.unwrap();
        assert_eq!(created.email, "test@example.com");

        let fetched = repo.get_by_id(created.id).await.unwrap();
        assert!(fetched.is_some());
        assert_eq!(fetched.unwrap().id, created.id);
    }

    #[tokio::test]
    async fn test_get_by_email_is_case_insensitive() {
        let repo = InMemoryStaffRepository::new();
        repo.create(sample_user("test@example.com")).await.unwrap();

        let fetched = repo.get_by_email("TEST@EXAMPLE.COM").await.unwrap();
        assert!(fetched.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email_error() {
        let repo = InMemoryStaffRepository::new();

        repo.create(sample_user("test@example.com")).await.unwrap();

        let result = repo.create(sample_user("Test@Example.com")).await;
        assert!(matches!(result, Err(StaffError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_get_by_activation_token() {
        let repo = InMemoryStaffRepository::new();

        let mut user = sample_user("pending@example.com");
        user.activation_token = Some("tok-abc".into());
        repo.create(user).await.unwrap();

        let found = repo.get_by_activation_token("tok-abc").await.unwrap();
        assert!(found.is_some());

        let missing = repo.get_by_activation_token("tok-xyz").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_resolve_roles_returns_seeded_permissions() {
        let repo = InMemoryStaffRepository::new();

        let roles = repo
            .resolve_roles(&[RoleName::Hr, RoleName::Worker])
            .await
            .unwrap();
        assert_eq!(roles.len(), 2);

        let hr = roles.iter().find(|r| r.name == RoleName::Hr).unwrap();
        assert_eq!(hr.permissions.len(), 3);

        let unknown = repo.resolve_roles(&[]).await.unwrap();
        assert!(unknown.is_empty());
    }

    #[tokio::test]
    async fn test_delete_returns_false_for_missing() {
        let repo = InMemoryStaffRepository::new();

        let created = repo.create(sample_user("gone@example.com")).await.unwrap();
        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
    }
}
