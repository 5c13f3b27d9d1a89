use crate::auth::{self, AuthUser};
use crate::config::Config;
use crate::csv_ingest;
use crate::db_storage::{CompanyStorage, LeadStorage, UserStorage};
use crate::enrichment;
use crate::errors::AppError;
use crate::models::*;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use moka::future::Cache;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: PgPool,
    /// Application configuration.
    pub config: Config,
    /// Cache for bearer token -> (user id, email).
    /// None means checked and invalid, so bad tokens skip the database too.
    pub token_cache: Cache<String, Option<(Uuid, String)>>,
    /// Cache for directory lookups used by the city/website auto-fill.
    /// Key: "name|industry" lowercased, Value: Option<Company> (None means
    /// checked and no match).
    pub directory_cache: Cache<String, Option<Company>>,
}

/// Health check endpoint.
///
/// Returns the service status, version, and health information.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "prospect-api",
            "version": "0.1.0"
        })),
    )
}

// ============ Auth ============

/// POST /api/v1/auth/register
///
/// Creates an account and returns the API token used on protected routes.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `req` - JSON body with email and password.
///
/// # Returns
///
/// * `Result<(StatusCode, Json<AuthResponse>), AppError>` - 201 with the token, or an error.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("A valid email is required".to_string()));
    }
    if req.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let salt = auth::generate_salt();
    let password_hash = auth::hash_password(&req.password, &salt);
    let token = auth::generate_token();

    let user = UserStorage::new(state.db.clone())
        .create(&email, &password_hash, &salt, &token)
        .await?;

    tracing::info!("✓ Registered user {}", user.email);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token: user.api_token,
            user_id: user.id,
            email: user.email,
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Verifies credentials and returns the account's API token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = req.email.trim().to_lowercase();

    let user = UserStorage::new(state.db.clone())
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    if !auth::verify_password(&req.password, &user.password_salt, &user.password_hash) {
        return Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    Ok(Json(AuthResponse {
        token: user.api_token,
        user_id: user.id,
        email: user.email,
    }))
}

// ============ Leads ============

/// Backfill city/website from the company directory when the lead is
/// missing them. Keyed on name (+ industry when present); the first match
/// wins and a no-match is remembered. This is a separate step from the
/// engine's size/revenue fill-in.
pub async fn fill_from_directory(
    state: &Arc<AppState>,
    lead: &mut NewLead,
) -> Result<(), AppError> {
    if lead.city.is_some() && lead.website.is_some() {
        return Ok(());
    }

    let cache_key = format!(
        "{}|{}",
        lead.name.to_lowercase(),
        lead.industry.as_deref().unwrap_or("").to_lowercase()
    );

    let matched = if let Some(cached) = state.directory_cache.get(&cache_key).await {
        cached
    } else {
        let found = CompanyStorage::new(state.db.clone())
            .find_match(&lead.name, lead.industry.as_deref())
            .await?;
        state.directory_cache.insert(cache_key, found.clone()).await;
        found
    };

    if let Some(company) = matched {
        if lead.city.is_none() {
            lead.city = Some(company.city);
        }
        if lead.website.is_none() {
            lead.website = company.website;
        }
    }

    Ok(())
}

/// POST /api/v1/leads
///
/// Saves a lead picked from a company-search result. The row is stored
/// as-is; this path does not run enrichment.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `user` - The authenticated caller.
/// * `req` - JSON body with at least name and industry.
///
/// # Returns
///
/// * `Result<(StatusCode, Json<serde_json::Value>), AppError>` - 201 with the stored lead, or an error.
pub async fn save_lead(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<SaveLeadRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    if req.name.trim().is_empty() || req.industry.trim().is_empty() {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    }

    let storage = LeadStorage::new(state.db.clone());

    // Prevent duplicate saves of the same company for one user
    if storage.exists_for_user(user.id, &req.name).await? {
        return Err(AppError::Conflict(
            "Lead already saved for this company".to_string(),
        ));
    }

    let mut lead = NewLead::named(req.name);
    lead.industry = Some(req.industry);
    lead.city = req.city;
    lead.website = req.website;
    lead.revenue = req.revenue;

    let stored = storage.insert(user.id, &lead).await?;
    tracing::info!("✓ Lead saved for user {}: {}", user.id, stored.name);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Lead saved successfully",
            "lead": stored,
        })),
    ))
}

/// POST /api/v1/leads/manual
///
/// Adds one manually entered lead: enriches it, backfills city/website
/// from the directory, then persists it.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `user` - The authenticated caller.
/// * `lead` - Partial lead record; only name is required.
///
/// # Returns
///
/// * `Result<(StatusCode, Json<Lead>), AppError>` - 201 with the stored lead, or an error.
pub async fn add_manual_lead(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(mut lead): Json<NewLead>,
) -> Result<(StatusCode, Json<Lead>), AppError> {
    if lead.name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Missing required field: name".to_string(),
        ));
    }

    enrichment::enrich(&mut lead);
    fill_from_directory(&state, &mut lead).await?;

    let stored = LeadStorage::new(state.db.clone())
        .insert(user.id, &lead)
        .await?;

    Ok((StatusCode::CREATED, Json(stored)))
}

/// POST /api/v1/leads/upload
///
/// Multipart CSV upload. Every row is parsed into a lead record, enriched,
/// backfilled from the directory, and bulk-persisted for the caller.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `user` - The authenticated caller.
/// * `multipart` - Multipart form data carrying the CSV file.
///
/// # Returns
///
/// * `Result<Json<UploadSummary>, AppError>` - Inserted row count, or an error.
pub async fn upload_leads(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<UploadSummary>, AppError> {
    let mut csv_bytes = None;
    while let Some(field) = multipart.next_field().await? {
        let is_file = field.name() == Some("file") || field.file_name().is_some();
        if is_file {
            csv_bytes = Some(field.bytes().await?);
            break;
        }
    }

    let csv_bytes =
        csv_bytes.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;

    let mut leads = csv_ingest::parse_lead_rows(csv_bytes.as_ref())?;
    tracing::info!("Parsed {} lead row(s) from upload", leads.len());

    enrichment::enrich_batch(&mut leads);
    for lead in leads.iter_mut() {
        fill_from_directory(&state, lead).await?;
    }

    let count = LeadStorage::new(state.db.clone())
        .insert_many(user.id, &leads)
        .await?;

    Ok(Json(UploadSummary {
        message: "Leads uploaded successfully".to_string(),
        count,
    }))
}

/// GET /api/v1/leads
///
/// Lists the caller's leads, newest first.
pub async fn list_leads(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<Lead>>, AppError> {
    let leads = LeadStorage::new(state.db.clone())
        .list_for_user(user.id)
        .await?;

    Ok(Json(leads))
}

/// GET /api/v1/leads/export
///
/// The caller's leads as a CSV attachment; 404 when there are none.
pub async fn export_leads(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Response, AppError> {
    let leads = LeadStorage::new(state.db.clone())
        .list_for_user(user.id)
        .await?;

    if leads.is_empty() {
        return Err(AppError::NotFound(
            "No leads available to export".to_string(),
        ));
    }

    let mut buffer = Vec::new();
    csv_ingest::write_leads_csv(&mut buffer, &leads)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"ProspectPro_Leads.csv\"",
            ),
        ],
        buffer,
    )
        .into_response())
}

/// DELETE /api/v1/leads/:id
///
/// Deletes one lead if the caller owns it.
pub async fn delete_lead(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let removed = LeadStorage::new(state.db.clone())
        .delete_for_user(user.id, id)
        .await?;

    if !removed {
        return Err(AppError::NotFound(
            "Lead not found or not owned by you".to_string(),
        ));
    }

    Ok(Json(json!({ "message": "Lead removed successfully" })))
}

/// DELETE /api/v1/leads
///
/// Clears every lead owned by the caller.
pub async fn clear_leads(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let removed = LeadStorage::new(state.db.clone())
        .clear_for_user(user.id)
        .await?;

    tracing::info!("Cleared {} lead(s) for user {}", removed, user.id);

    Ok(Json(
        json!({ "message": "All saved leads cleared successfully" }),
    ))
}

// ============ Companies ============

/// GET /api/v1/companies
///
/// First 50 companies from the seeded directory.
pub async fn list_companies(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<Json<Vec<Company>>, AppError> {
    let companies = CompanyStorage::new(state.db.clone()).list(50).await?;
    Ok(Json(companies))
}

/// GET /api/v1/companies/search
///
/// Case-insensitive substring search on industry and/or city, limit 50.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `params` - Query parameters (industry, city), both optional.
///
/// # Returns
///
/// * `Result<Json<Vec<Company>>, AppError>` - Matching companies.
pub async fn search_companies(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(params): Query<CompanySearchParams>,
) -> Result<Json<Vec<Company>>, AppError> {
    let companies = CompanyStorage::new(state.db.clone())
        .search(params.industry.as_deref(), params.city.as_deref(), 50)
        .await?;

    Ok(Json(companies))
}

/// GET /api/v1/companies/:id
///
/// One directory entry by id.
pub async fn get_company(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Company>, AppError> {
    let company = CompanyStorage::new(state.db.clone())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;

    Ok(Json(company))
}
