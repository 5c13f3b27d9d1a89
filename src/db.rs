use sqlx::{postgres::PgPoolOptions, PgPool};

pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        // Connection sanity check
        sqlx::query("SELECT 1").execute(&pool).await?;

        Ok(Self { pool })
    }

    /// Create the tables when they do not exist yet.
    ///
    /// Idempotent; runs at startup and before the seed binary writes.
    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                password_salt TEXT NOT NULL,
                api_token TEXT NOT NULL UNIQUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS companies (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                industry TEXT NOT NULL,
                city TEXT NOT NULL,
                website TEXT,
                employees TEXT,
                funding TEXT,
                email TEXT,
                linkedin TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS leads (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                company TEXT,
                email TEXT,
                website TEXT,
                linkedin TEXT,
                industry TEXT,
                city TEXT,
                size TEXT,
                revenue DOUBLE PRECISION,
                score INTEGER NOT NULL DEFAULT 0,
                message TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS leads_user_created_idx ON leads (user_id, created_at DESC)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS companies_name_idx ON companies (name)")
            .execute(&self.pool)
            .await?;

        tracing::info!("Database schema ensured");
        Ok(())
    }
}
