use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Insert permissions
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            INSERT INTO permissions (id, name)
            VALUES
                ('01985a00-0000-7000-8000-000000000001', 'CREATE_STAFF'),
                ('01985a00-0000-7000-8000-000000000002', 'VIEW_STAFF'),
                ('01985a00-0000-7000-8000-000000000003', 'EDIT_STAFF_DETAILS'),
                ('01985a00-0000-7000-8000-000000000004', 'DELETE_STAFF')
            ON CONFLICT (id) DO NOTHING
            "#,
            )
            .await?;

        // Insert roles
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            INSERT INTO roles (id, name)
            VALUES
                ('01985a00-0000-7000-8000-000000000011', 'MD'),
                ('01985a00-0000-7000-8000-000000000012', 'HR'),
                ('01985a00-0000-7000-8000-000000000013', 'WORKER')
            ON CONFLICT (id) DO NOTHING
            "#,
            )
            .await?;

        // MD gets everything, HR everything but delete, WORKER read-only
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            INSERT INTO role_permissions (role_id, permission_id)
            VALUES
                ('01985a00-0000-7000-8000-000000000011', '01985a00-0000-7000-8000-000000000001'),
                ('01985a00-0000-7000-8000-000000000011', '01985a00-0000-7000-8000-000000000002'),
                ('01985a00-0000-7000-8000-000000000011', '01985a00-0000-7000-8000-000000000003'),
                ('01985a00-0000-7000-8000-000000000011', '01985a00-0000-7000-8000-000000000004'),
                ('01985a00-0000-7000-8000-000000000012', '01985a00-0000-7000-8000-000000000001'),
                ('01985a00-0000-7000-8000-000000000012', '01985a00-0000-7000-8000-000000000002'),
                ('01985a00-0000-7000-8000-000000000012', '01985a00-0000-7000-8000-000000000003'),
                ('01985a00-0000-7000-8000-000000000013', '01985a00-0000-7000-8000-000000000002')
            ON CONFLICT (role_id, permission_id) DO NOTHING
            "#,
            )
            .await?;

        // Bootstrap MD account so a fresh deployment can log in
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            INSERT INTO users (id, first_name, last_name, email, password_hash, status, created_at, updated_at)
            VALUES
                (
                    '01985a00-0000-7000-8000-000000000021',
                    'System',
                    'Admin',
                    'admin@staffhub.com',
                    '$argon2id$v=19$m=19456,t=2,p=1$VE0rHYzGbYjDhGgvhdzFPw$CJpleaNYKGFpc44EFOyWTE+fG2Z0A+6Ka2SlQQzroYA',
                    'ACTIVE',
                    NOW(),
                    NOW()
                )
            ON CONFLICT (id) DO NOTHING
            "#,
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
            INSERT INTO user_roles (user_id, role_id)
            VALUES
                ('01985a00-0000-7000-8000-000000000021', '01985a00-0000-7000-8000-000000000011')
            ON CONFLICT (user_id, role_id) DO NOTHING
            "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Delete in reverse order of foreign key dependencies
        manager
            .get_connection()
            .execute_unprepared("DELETE FROM user_roles WHERE user_id LIKE '01985a00-0000-7%'")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DELETE FROM users WHERE id LIKE '01985a00-0000-7%'")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DELETE FROM role_permissions WHERE role_id LIKE '01985a00-0000-7%'")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DELETE FROM roles WHERE id LIKE '01985a00-0000-7%'")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DELETE FROM permissions WHERE id LIKE '01985a00-0000-7%'")
            .await?;

        Ok(())
    }
}
