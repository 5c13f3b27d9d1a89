use crate::errors::AppError;
use crate::models::{Company, Lead, NewLead, User};
use sqlx::PgPool;
use uuid::Uuid;

/// Database storage service for saved leads.
pub struct LeadStorage {
    pool: PgPool,
}

impl LeadStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a single lead for a user and return the stored row.
    pub async fn insert(&self, user_id: Uuid, lead: &NewLead) -> Result<Lead, AppError> {
        let stored = sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads
                (id, user_id, name, company, email, website, linkedin,
                 industry, city, size, revenue, score, message)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&lead.name)
        .bind(&lead.company)
        .bind(&lead.email)
        .bind(&lead.website)
        .bind(&lead.linkedin)
        .bind(&lead.industry)
        .bind(&lead.city)
        .bind(lead.size.map(|s| s.as_str().to_string()))
        .bind(lead.revenue)
        .bind(lead.score)
        .bind(&lead.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    /// Bulk-insert enriched leads for a user.
    ///
    /// Sequential inserts inside one transaction; either every row lands or
    /// none do.
    pub async fn insert_many(&self, user_id: Uuid, leads: &[NewLead]) -> Result<usize, AppError> {
        let mut tx = self.pool.begin().await?;

        for lead in leads {
            sqlx::query(
                r#"
                INSERT INTO leads
                    (id, user_id, name, company, email, website, linkedin,
                     industry, city, size, revenue, score, message)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(&lead.name)
            .bind(&lead.company)
            .bind(&lead.email)
            .bind(&lead.website)
            .bind(&lead.linkedin)
            .bind(&lead.industry)
            .bind(&lead.city)
            .bind(lead.size.map(|s| s.as_str().to_string()))
            .bind(lead.revenue)
            .bind(lead.score)
            .bind(&lead.message)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::info!("✓ Stored {} lead(s) for user {}", leads.len(), user_id);
        Ok(leads.len())
    }

    /// All leads owned by a user, newest first.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Lead>, AppError> {
        let leads = sqlx::query_as::<_, Lead>(
            "SELECT * FROM leads WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(leads)
    }

    /// Whether the user already saved a lead with this name.
    pub async fn exists_for_user(&self, user_id: Uuid, name: &str) -> Result<bool, AppError> {
        let row: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM leads WHERE user_id = $1 AND name = $2 LIMIT 1")
                .bind(user_id)
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.is_some())
    }

    /// Delete one lead if it is owned by the user. Returns whether a row
    /// was removed.
    pub async fn delete_for_user(&self, user_id: Uuid, lead_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM leads WHERE id = $1 AND user_id = $2")
            .bind(lead_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every lead owned by the user. Returns the removed count.
    pub async fn clear_for_user(&self, user_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM leads WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Read access to the seeded company directory.
pub struct CompanyStorage {
    pool: PgPool,
}

impl CompanyStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// First `limit` companies, name order.
    pub async fn list(&self, limit: i64) -> Result<Vec<Company>, AppError> {
        let companies =
            sqlx::query_as::<_, Company>("SELECT * FROM companies ORDER BY name LIMIT $1")
                .bind(limit)
                .fetch_all(&self.pool)
                .await?;

        Ok(companies)
    }

    /// Case-insensitive substring search on industry and/or city.
    pub async fn search(
        &self,
        industry: Option<&str>,
        city: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Company>, AppError> {
        let companies = sqlx::query_as::<_, Company>(
            r#"
            SELECT * FROM companies
            WHERE ($1::text IS NULL OR industry ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR city ILIKE '%' || $2 || '%')
            ORDER BY name
            LIMIT $3
            "#,
        )
        .bind(industry)
        .bind(city)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(companies)
    }

    /// One company by id.
    pub async fn get(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(company)
    }

    /// Loose directory match used to backfill city/website on a lead:
    /// case-insensitive name equality, narrowed by industry when the lead
    /// has one. First match wins.
    pub async fn find_match(
        &self,
        name: &str,
        industry: Option<&str>,
    ) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            SELECT * FROM companies
            WHERE LOWER(name) = LOWER($1)
              AND ($2::text IS NULL OR industry = $2)
            LIMIT 1
            "#,
        )
        .bind(name)
        .bind(industry)
        .fetch_optional(&self.pool)
        .await?;

        Ok(company)
    }

    /// Wipe and reload the directory. Used by the seed binary.
    pub async fn replace_all(&self, companies: &[Company]) -> Result<usize, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM companies").execute(&mut *tx).await?;

        for company in companies {
            sqlx::query(
                r#"
                INSERT INTO companies
                    (id, name, industry, city, website, employees, funding, email, linkedin)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(company.id)
            .bind(&company.name)
            .bind(&company.industry)
            .bind(&company.city)
            .bind(&company.website)
            .bind(&company.employees)
            .bind(&company.funding)
            .bind(&company.email)
            .bind(&company.linkedin)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(companies.len())
    }
}

/// Account storage.
pub struct UserStorage {
    pool: PgPool,
}

impl UserStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an account. A duplicate email maps to `Conflict`.
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        password_salt: &str,
        api_token: &str,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, password_hash, password_salt, api_token)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .bind(password_salt)
        .bind(api_token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("Email already registered".to_string())
            }
            _ => AppError::DatabaseError(e),
        })?;

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_token(&self, token: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE api_token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }
}
