use crate::auth::repo_types::Household;
use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

impl Household {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<Household>> {
        let household = sqlx::query_as::<_, Household>(
            r#"
            SELECT id, email, name, password_hash, created_at
            FROM households
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
        .context("find household by email")?;
        Ok(household)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Household>> {
        let household = sqlx::query_as::<_, Household>(
            r#"
            SELECT id, email, name, password_hash, created_at
            FROM households
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("find household by id")?;
        Ok(household)
    }

    /// Inserts a new household. Returns `None` when the email is taken.
    pub async fn create(
        db: &PgPool,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> anyhow::Result<Option<Household>> {
        let household = sqlx::query_as::<_, Household>(
            r#"
            INSERT INTO households (email, name, password_hash)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, name, password_hash, created_at
            "#,
        )
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .fetch_optional(db)
        .await
        .context("insert household")?;
        Ok(household)
    }
}
