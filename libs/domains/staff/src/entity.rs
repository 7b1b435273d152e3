//! Sea-ORM entities for the staff schema.
//!
//! Five tables: `users`, `roles`, `permissions`, plus the `user_roles` and
//! `role_permissions` join tables. Status, role and permission names are
//! stored as text and parsed into the domain enums on load.

use crate::error::{StaffError, StaffResult};
use crate::models::{Permission, Role, User};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

pub mod users {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub first_name: String,
        pub last_name: String,
        #[sea_orm(unique)]
        pub email: String,
        pub password_hash: Option<String>,
        pub status: String,
        pub activation_token: Option<String>,
        pub activation_token_expires: Option<DateTimeWithTimeZone>,
        pub refresh_token_digest: Option<String>,
        pub created_by: Option<Uuid>,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::user_roles::Entity")]
        UserRoles,
    }

    impl Related<super::user_roles::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::UserRoles.def()
        }
    }

    impl Related<super::roles::Entity> for Entity {
        fn to() -> RelationDef {
            super::user_roles::Relation::Roles.def()
        }

        fn via() -> Option<RelationDef> {
            Some(super::user_roles::Relation::Users.def().rev())
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod roles {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "roles")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(unique)]
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::user_roles::Entity")]
        UserRoles,
        #[sea_orm(has_many = "super::role_permissions::Entity")]
        RolePermissions,
    }

    impl Related<super::permissions::Entity> for Entity {
        fn to() -> RelationDef {
            super::role_permissions::Relation::Permissions.def()
        }

        fn via() -> Option<RelationDef> {
            Some(super::role_permissions::Relation::Roles.def().rev())
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod permissions {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "permissions")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(unique)]
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::role_permissions::Entity")]
        RolePermissions,
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod user_roles {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "user_roles")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub user_id: Uuid,
        #[sea_orm(primary_key, auto_increment = false)]
        pub role_id: Uuid,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::users::Entity",
            from = "Column::UserId",
            to = "super::users::Column::Id"
        )]
        Users,
        #[sea_orm(
            belongs_to = "super::roles::Entity",
            from = "Column::RoleId",
            to = "super::roles::Column::Id"
        )]
        Roles,
    }

    impl Related<super::users::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Users.def()
        }
    }

    impl Related<super::roles::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Roles.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod role_permissions {
    use super::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "role_permissions")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub role_id: Uuid,
        #[sea_orm(primary_key, auto_increment = false)]
        pub permission_id: Uuid,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::roles::Entity",
            from = "Column::RoleId",
            to = "super::roles::Column::Id"
        )]
        Roles,
        #[sea_orm(
            belongs_to = "super::permissions::Entity",
            from = "Column::PermissionId",
            to = "super::permissions::Column::Id"
        )]
        Permissions,
    }

    impl Related<super::roles::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Roles.def()
        }
    }

    impl Related<super::permissions::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Permissions.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

impl permissions::Model {
    pub fn into_permission(self) -> StaffResult<Permission> {
        let name = self
            .name
            .parse()
            .map_err(|e: String| StaffError::Database(e))?;
        Ok(Permission { id: self.id, name })
    }
}

impl roles::Model {
    pub fn into_role(self, permissions: Vec<permissions::Model>) -> StaffResult<Role> {
        let name = self
            .name
            .parse()
            .map_err(|e: String| StaffError::Database(e))?;
        let permissions = permissions
            .into_iter()
            .map(|p| p.into_permission())
            .collect::<StaffResult<Vec<_>>>()?;
        Ok(Role {
            id: self.id,
            name,
            permissions,
        })
    }
}

impl users::Model {
    /// Convert a row plus its loaded roles into the domain user.
    pub fn into_user(self, roles: Vec<Role>) -> StaffResult<User> {
        let status = self
            .status
            .parse()
            .map_err(|e: String| StaffError::Database(e))?;
        Ok(User {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password_hash: self.password_hash,
            status,
            activation_token: self.activation_token,
            activation_token_expires: self.activation_token_expires.map(Into::into),
            refresh_token_digest: self.refresh_token_digest,
            created_by: self.created_by,
            roles,
            created_at: self.created_at.into(),
            updated_at: self.updated_at.into(),
        })
    }
}

/// Build a full ActiveModel from a domain user (insert or update).
pub fn user_active_model(user: &User) -> users::ActiveModel {
    users::ActiveModel {
        id: Set(user.id),
        first_name: Set(user.first_name.clone()),
        last_name: Set(user.last_name.clone()),
        email: Set(user.email.clone()),
        password_hash: Set(user.password_hash.clone()),
        status: Set(user.status.to_string()),
        activation_token: Set(user.activation_token.clone()),
        activation_token_expires: Set(user.activation_token_expires.map(Into::into)),
        refresh_token_digest: Set(user.refresh_token_digest.clone()),
        created_by: Set(user.created_by),
        created_at: Set(user.created_at.into()),
        updated_at: Set(user.updated_at.into()),
    }
}
