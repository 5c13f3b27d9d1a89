//! CSV ingest and export for lead lists.
//!
//! Ingest is deliberately permissive: headers are trimmed and matched
//! case-insensitively against the common spellings, empty cells become
//! absent fields, and unparseable size/revenue values degrade to absent so
//! the enrichment fill-in takes over instead of failing the row.

use crate::errors::AppError;
use crate::models::{parse_revenue, CompanySize, Lead, NewLead};
use serde::{Deserialize, Deserializer, Serialize};
use std::io::{Read, Write};

/// Parse uploaded CSV content into lead records.
///
/// A row needs a name (or a company, which then doubles as the name);
/// rows with neither are skipped with a warning, mirroring how the seed
/// data loader treats incomplete rows. A structurally broken row fails the
/// whole upload.
pub fn parse_lead_rows<R: Read>(reader: R) -> Result<Vec<NewLead>, AppError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut leads = Vec::new();
    for (index, record) in csv_reader.deserialize::<LeadRow>().enumerate() {
        // +2: one for the header line, one for 1-based numbering
        let row = record.map_err(|e| AppError::CsvError(format!("row {}: {}", index + 2, e)))?;
        match row.into_lead() {
            Some(lead) => leads.push(lead),
            None => tracing::warn!("⚠ Skipped CSV row {} with no name", index + 2),
        }
    }

    Ok(leads)
}

#[derive(Debug, Deserialize)]
struct LeadRow {
    #[serde(default, alias = "Name", deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(default, alias = "Company", deserialize_with = "empty_string_as_none")]
    company: Option<String>,
    #[serde(default, alias = "Email", deserialize_with = "empty_string_as_none")]
    email: Option<String>,
    #[serde(default, alias = "Website", deserialize_with = "empty_string_as_none")]
    website: Option<String>,
    #[serde(
        default,
        alias = "LinkedIn",
        alias = "Linkedin",
        deserialize_with = "empty_string_as_none"
    )]
    linkedin: Option<String>,
    #[serde(default, alias = "Industry", deserialize_with = "empty_string_as_none")]
    industry: Option<String>,
    #[serde(default, alias = "City", deserialize_with = "empty_string_as_none")]
    city: Option<String>,
    #[serde(default, alias = "Size", deserialize_with = "empty_string_as_none")]
    size: Option<String>,
    #[serde(default, alias = "Revenue", deserialize_with = "empty_string_as_none")]
    revenue: Option<String>,
}

impl LeadRow {
    fn into_lead(self) -> Option<NewLead> {
        let name = self.name.or_else(|| self.company.clone())?;
        Some(NewLead {
            name,
            company: self.company,
            email: self.email,
            website: self.website,
            linkedin: self.linkedin,
            industry: self.industry,
            city: self.city,
            size: self.size.as_deref().and_then(CompanySize::parse),
            revenue: self.revenue.as_deref().and_then(parse_revenue),
            score: 0,
            message: None,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[derive(Serialize)]
struct ExportRow<'a> {
    name: &'a str,
    email: Option<&'a str>,
    company: Option<&'a str>,
    website: Option<&'a str>,
    linkedin: Option<&'a str>,
    industry: Option<&'a str>,
    city: Option<&'a str>,
    size: Option<&'a str>,
    revenue: Option<f64>,
    score: i32,
    message: Option<&'a str>,
}

/// Write stored leads as CSV in the fixed export column order.
pub fn write_leads_csv<W: Write>(writer: W, leads: &[Lead]) -> Result<(), AppError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for lead in leads {
        csv_writer.serialize(ExportRow {
            name: &lead.name,
            email: lead.email.as_deref(),
            company: lead.company.as_deref(),
            website: lead.website.as_deref(),
            linkedin: lead.linkedin.as_deref(),
            industry: lead.industry.as_deref(),
            city: lead.city.as_deref(),
            size: lead.size.as_deref(),
            revenue: lead.revenue,
            score: lead.score,
            message: lead.message.as_deref(),
        })?;
    }

    csv_writer
        .flush()
        .map_err(|e| AppError::CsvError(e.to_string()))?;
    Ok(())
}

/// Write enriched (not yet persisted) leads as CSV. Used by the offline
/// CLI, which never touches the database.
pub fn write_enriched_csv<W: Write>(writer: W, leads: &[NewLead]) -> Result<(), AppError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for lead in leads {
        csv_writer.serialize(lead)?;
    }

    csv_writer
        .flush()
        .map_err(|e| AppError::CsvError(e.to_string()))?;
    Ok(())
}
