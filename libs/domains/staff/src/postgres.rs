use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, QueryOrder, SqlErr,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    entity,
    error::{StaffError, StaffResult},
    models::{Role, RoleName, User},
    repository::StaffRepository,
};

/// Postgres-backed staff repository.
///
/// Roles and permissions form a small, migration-seeded catalog, so it is
/// loaded in one query and joined in memory instead of per-row subqueries.
pub struct PgStaffRepository {
    db: DatabaseConnection,
}

impl PgStaffRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn role_catalog(&self) -> StaffResult<HashMap<Uuid, Role>> {
        let rows = entity::roles::Entity::find()
            .find_with_related(entity::permissions::Entity)
            .all(&self.db)
            .await?;

        let mut catalog = HashMap::with_capacity(rows.len());
        for (role, permissions) in rows {
            let id = role.id;
            catalog.insert(id, role.into_role(permissions)?);
        }
        Ok(catalog)
    }

    async fn attach_roles(&self, model: entity::users::Model) -> StaffResult<User> {
        let catalog = self.role_catalog().await?;
        let role_models = model
            .find_related(entity::roles::Entity)
            .all(&self.db)
            .await?;

        let roles = role_models
            .iter()
            .filter_map(|r| catalog.get(&r.id).cloned())
            .collect();

        model.into_user(roles)
    }

    async fn replace_user_roles(&self, user_id: Uuid, roles: &[Role]) -> StaffResult<()> {
        entity::user_roles::Entity::delete_many()
            .filter(entity::user_roles::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        if roles.is_empty() {
            return Ok(());
        }

        let links = roles.iter().map(|role| entity::user_roles::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role.id),
        });
        entity::user_roles::Entity::insert_many(links)
            .exec(&self.db)
            .await?;

        Ok(())
    }
}

fn map_insert_err(err: sea_orm::DbErr, email: &str) -> StaffError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => StaffError::DuplicateEmail(email.to_string()),
        _ => StaffError::Database(err.to_string()),
    }
}

#[async_trait]
impl StaffRepository for PgStaffRepository {
    async fn create(&self, user: User) -> StaffResult<User> {
        entity::users::Entity::insert(entity::user_active_model(&user))
            .exec(&self.db)
            .await
            .map_err(|e| map_insert_err(e, &user.email))?;

        self.replace_user_roles(user.id, &user.roles).await?;

        tracing::info!(user_id = %user.id, email = %user.email, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> StaffResult<Option<User>> {
        let model = entity::users::Entity::find_by_id(id).one(&self.db).await?;

        match model {
            Some(model) => Ok(Some(self.attach_roles(model).await?)),
            None => Ok(None),
        }
    }

    async fn get_by_email(&self, email: &str) -> StaffResult<Option<User>> {
        let model = entity::users::Entity::find()
            .filter(entity::users::Column::Email.eq(email.to_lowercase()))
            .one(&self.db)
            .await?;

        match model {
            Some(model) => Ok(Some(self.attach_roles(model).await?)),
            None => Ok(None),
        }
    }

    async fn get_by_activation_token(&self, token: &str) -> StaffResult<Option<User>> {
        let model = entity::users::Entity::find()
            .filter(entity::users::Column::ActivationToken.eq(token))
            .one(&self.db)
            .await?;

        match model {
            Some(model) => Ok(Some(self.attach_roles(model).await?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> StaffResult<Vec<User>> {
        let catalog = self.role_catalog().await?;

        let rows = entity::users::Entity::find()
            .find_with_related(entity::roles::Entity)
            .order_by_desc(entity::users::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let mut users = Vec::with_capacity(rows.len());
        for (model, role_models) in rows {
            let roles = role_models
                .iter()
                .filter_map(|r| catalog.get(&r.id).cloned())
                .collect();
            users.push(model.into_user(roles)?);
        }

        Ok(users)
    }

    async fn update(&self, user: User) -> StaffResult<User> {
        let result = entity::users::Entity::update(entity::user_active_model(&user))
            .exec(&self.db)
            .await;

        match result {
            Ok(_) => {}
            Err(sea_orm::DbErr::RecordNotUpdated) => return Err(StaffError::NotFound(user.id)),
            Err(e) => return Err(map_insert_err(e, &user.email)),
        }

        self.replace_user_roles(user.id, &user.roles).await?;

        tracing::info!(user_id = %user.id, "Updated user");
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> StaffResult<bool> {
        entity::user_roles::Entity::delete_many()
            .filter(entity::user_roles::Column::UserId.eq(id))
            .exec(&self.db)
            .await?;

        let result = entity::users::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(user_id = %id, "Deleted user");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn resolve_roles(&self, names: &[RoleName]) -> StaffResult<Vec<Role>> {
        let name_strings: Vec<String> = names.iter().map(|n| n.to_string()).collect();

        let rows = entity::roles::Entity::find()
            .filter(entity::roles::Column::Name.is_in(name_strings))
            .find_with_related(entity::permissions::Entity)
            .all(&self.db)
            .await?;

        rows.into_iter()
            .map(|(role, permissions)| role.into_role(permissions))
            .collect()
    }

    async fn exists_by_email(&self, email: &str) -> StaffResult<bool> {
        let exists = entity::users::Entity::find()
            .filter(entity::users::Column::Email.eq(email.to_lowercase()))
            .one(&self.db)
            .await?
            .is_some();

        Ok(exists)
    }
}
