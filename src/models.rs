use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::ops::Range;
use uuid::Uuid;

// ============ Domain Types ============

/// Company size bucket used by the scoring engine.
///
/// Each bucket implies a revenue bracket; generated size/revenue pairs are
/// always drawn together so they stay consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompanySize {
    /// Up to roughly 1M in revenue.
    #[serde(alias = "small")]
    Small,
    /// 1M to 10M in revenue.
    #[serde(alias = "medium")]
    Medium,
    /// 10M and above.
    #[serde(alias = "large")]
    Large,
}

impl CompanySize {
    /// Canonical display form ("Small", "Medium", "Large").
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanySize::Small => "Small",
            CompanySize::Medium => "Medium",
            CompanySize::Large => "Large",
        }
    }

    /// Lenient parse: trims and ignores case. Anything unrecognized is
    /// `None`, which the engine treats as absent.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "small" => Some(CompanySize::Small),
            "medium" => Some(CompanySize::Medium),
            "large" => Some(CompanySize::Large),
            _ => None,
        }
    }

    /// Revenue bracket implied by this size, in whole currency units.
    /// Half-open: the upper bound is excluded.
    pub fn revenue_bracket(&self) -> Range<u64> {
        match self {
            CompanySize::Small => 50_000..1_050_000,
            CompanySize::Medium => 1_000_000..10_000_000,
            CompanySize::Large => 10_000_000..100_000_000,
        }
    }
}

impl fmt::Display for CompanySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lead record before persistence.
///
/// Built by one of the ingestion paths (CSV row, manual entry, company-search
/// save) and handed to the enrichment engine, which fills missing
/// size/revenue and overwrites `score` and `message`. Only `name` is
/// required; every other field may be absent and simply contributes zero to
/// the presence-based sub-scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLead {
    /// Contact or company name; used verbatim in the outreach message.
    pub name: String,
    /// Display alias for the message; falls back to `name` when absent.
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    /// Size bucket; generated together with `revenue` when either is absent.
    #[serde(default, deserialize_with = "lenient_size")]
    pub size: Option<CompanySize>,
    /// Annual revenue in whole currency units.
    #[serde(default, deserialize_with = "lenient_revenue")]
    pub revenue: Option<f64>,
    /// Overwritten by the engine on every enrichment.
    #[serde(default)]
    pub score: i32,
    /// Overwritten by the engine on every enrichment.
    #[serde(default)]
    pub message: Option<String>,
}

impl NewLead {
    /// A lead with only the name populated.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            company: None,
            email: None,
            website: None,
            linkedin: None,
            industry: None,
            city: None,
            size: None,
            revenue: None,
            score: 0,
            message: None,
        }
    }

    /// The company name to show in messages: `company` when set and
    /// non-empty, otherwise `name`.
    pub fn display_company(&self) -> &str {
        self.company
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(&self.name)
    }
}

/// Accepts any casing of the bucket names; junk degrades to absent so the
/// fill-in takes over instead of rejecting the record.
fn lenient_size<'de, D>(deserializer: D) -> Result<Option<CompanySize>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.as_deref().and_then(CompanySize::parse))
}

/// Accepts a number or a formatted string ("$1,200,000"); anything
/// unparseable degrades to absent.
fn lenient_revenue<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Number(n)) if n.is_finite() => Some(n),
        Some(NumberOrText::Text(s)) => parse_revenue(&s),
        _ => None,
    })
}

/// Lenient revenue parse: strips currency symbols, separators, and
/// whitespace. Anything that still fails to parse is absent.
pub fn parse_revenue(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' ' | '_'))
        .collect();
    cleaned.parse::<f64>().ok().filter(|r| r.is_finite())
}

// ============ Database Models ============

/// A saved lead, scoped to the user who owns it.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Lead {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Contact or company name.
    pub name: String,
    /// Display alias used in the outreach message.
    pub company: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub industry: Option<String>,
    pub city: Option<String>,
    /// Size bucket as stored ("Small", "Medium", "Large").
    pub size: Option<String>,
    /// Annual revenue in whole currency units.
    pub revenue: Option<f64>,
    /// Enrichment score, 0-100.
    pub score: i32,
    /// Generated outreach message.
    pub message: Option<String>,
    /// Timestamp of creation.
    pub created_at: DateTime<Utc>,
    /// Timestamp of last update.
    pub updated_at: Option<DateTime<Utc>>,
}

/// A company directory entry (seeded reference data).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Company {
    /// Unique identifier.
    pub id: Uuid,
    /// Company name.
    pub name: String,
    /// Industry sector.
    pub industry: String,
    /// Headquarters city.
    pub city: String,
    pub website: Option<String>,
    /// Employee count as recorded in the source data (free-form).
    pub employees: Option<String>,
    /// Funding as recorded in the source data (free-form, e.g. "$12M").
    pub funding: Option<String>,
    pub email: Option<String>,
    pub linkedin: Option<String>,
}

/// An account. Password material and the API token never leave the
/// database layer, so this type is deliberately not serializable.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub password_salt: String,
    pub api_token: String,
    pub created_at: DateTime<Utc>,
}

// ============ Request / Response Types ============

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Returned by register and login. The token goes into the
/// `Authorization: Bearer` header on protected routes.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: Uuid,
    pub email: String,
}

/// Body of POST /api/v1/leads (save from company search).
#[derive(Debug, Deserialize)]
pub struct SaveLeadRequest {
    pub name: String,
    pub industry: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub revenue: Option<f64>,
}

/// Result of a CSV upload.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadSummary {
    pub message: String,
    pub count: usize,
}

/// Query parameters for GET /api/v1/companies/search.
#[derive(Debug, Default, Deserialize)]
pub struct CompanySearchParams {
    pub industry: Option<String>,
    pub city: Option<String>,
}
