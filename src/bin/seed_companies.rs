//! Script to seed the company directory from a CSV file.
//!
//! Wipes the companies table and reloads it. Rows missing any of
//! Company/Industry/City are skipped with a warning.

use dotenvy::dotenv;
use prospect_api::db::Database;
use prospect_api::db_storage::CompanyStorage;
use prospect_api::models::Company;
use serde::Deserialize;
use std::env;
use std::fs::File;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct CompanyRow {
    #[serde(rename = "Company")]
    company: Option<String>,
    #[serde(rename = "Industry")]
    industry: Option<String>,
    #[serde(rename = "City")]
    city: Option<String>,
    #[serde(rename = "Website")]
    website: Option<String>,
    #[serde(rename = "Employees")]
    employees: Option<String>,
    #[serde(rename = "Funding")]
    funding: Option<String>,
    #[serde(rename = "Email")]
    email: Option<String>,
    #[serde(rename = "LinkedIn")]
    linkedin: Option<String>,
}

/// Main entry point for the seed script.
///
/// Reads the CSV (path from the first argument or COMPANIES_CSV, default
/// companies_list.csv), then replaces the directory contents in one
/// transaction.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let csv_path = env::args()
        .nth(1)
        .or_else(|| env::var("COMPANIES_CSV").ok())
        .unwrap_or_else(|| "companies_list.csv".to_string());

    let file = File::open(&csv_path)?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut companies = Vec::new();
    for record in reader.deserialize::<CompanyRow>() {
        let row = record?;
        match (&row.company, &row.industry, &row.city) {
            (Some(name), Some(industry), Some(city))
                if !name.is_empty() && !industry.is_empty() && !city.is_empty() =>
            {
                companies.push(Company {
                    id: Uuid::new_v4(),
                    name: name.clone(),
                    industry: industry.clone(),
                    city: city.clone(),
                    website: row.website.filter(|v| !v.is_empty()),
                    employees: row.employees.filter(|v| !v.is_empty()),
                    funding: row.funding.filter(|v| !v.is_empty()),
                    email: row.email.filter(|v| !v.is_empty()),
                    linkedin: row.linkedin.filter(|v| !v.is_empty()),
                });
            }
            _ => tracing::warn!("⚠ Skipped incomplete row: {:?}", row),
        }
    }

    if companies.is_empty() {
        tracing::warn!("No companies to insert.");
        return Ok(());
    }

    let database_url = env::var("DB_URL").or_else(|_| env::var("DATABASE_URL"))?;
    let db = Database::new(&database_url).await?;
    db.ensure_schema().await?;

    let inserted = CompanyStorage::new(db.pool.clone())
        .replace_all(&companies)
        .await
        .map_err(|e| e.to_string())?;

    tracing::info!("✓ {} companies inserted successfully from {}", inserted, csv_path);

    Ok(())
}
