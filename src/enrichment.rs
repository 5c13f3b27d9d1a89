//! Shared enrichment logic for CSV upload, manual entry, and the offline CLI.
//!
//! The enrichment workflow for a single lead:
//! 1. Fill in size/revenue when either is missing (random draw, bracketed)
//! 2. Compute the six sub-scores
//! 3. Combine them into a 0-100 total
//! 4. Generate the outreach message for the score tier
//!
//! Everything here is pure apart from the random draw, which is
//! parameterized over `rand::Rng` so callers (and tests) can supply their
//! own generator. `enrich` is the default entry point on the thread-local
//! generator.

use crate::models::{CompanySize, NewLead};
use rand::Rng;
use regex::Regex;
use std::sync::OnceLock;

/// Industries that score full marks on the industry signal.
pub const TARGET_INDUSTRIES: [&str; 3] = ["Tech", "Finance", "Healthcare"];

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Loose on purpose: local@domain.tld with no RFC strictness, matched
    // anywhere in the string.
    PATTERN.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").unwrap())
}

/// Email sub-score: 25 points when the value looks like an address.
pub fn email_score(email: Option<&str>) -> f64 {
    match email {
        Some(value) if email_pattern().is_match(value) => 25.0,
        _ => 0.0,
    }
}

/// Website sub-score: 15 points for bare presence.
pub fn website_score(website: Option<&str>) -> f64 {
    match website {
        Some(value) if !value.is_empty() => 15.0,
        _ => 0.0,
    }
}

/// LinkedIn sub-score: 10 points for bare presence.
pub fn linkedin_score(linkedin: Option<&str>) -> f64 {
    match linkedin {
        Some(value) if !value.is_empty() => 10.0,
        _ => 0.0,
    }
}

/// Size sub-score, weighted at 0.2.
pub fn size_score(size: CompanySize) -> f64 {
    let base = match size {
        CompanySize::Small => 50.0,
        CompanySize::Medium => 70.0,
        CompanySize::Large => 100.0,
    };
    0.2 * base
}

/// Revenue sub-score, weighted at 0.2. Bands at 1M and 10M currency units.
pub fn revenue_score(revenue: f64) -> f64 {
    let base = if revenue < 1_000_000.0 {
        50.0
    } else if revenue < 10_000_000.0 {
        70.0
    } else {
        100.0
    };
    0.2 * base
}

/// Industry sub-score, weighted at 0.1. Target industries score 100,
/// everything else (including absent) scores 50.
pub fn industry_score(industry: Option<&str>) -> f64 {
    let base = match industry {
        Some(value) if TARGET_INDUSTRIES.contains(&value) => 100.0,
        _ => 50.0,
    };
    0.1 * base
}

/// Draw a company size uniformly, then a revenue uniformly from the
/// bracket that size implies. Always returned as a pair so the two stay
/// internally consistent.
pub fn draw_size_and_revenue<R: Rng + ?Sized>(rng: &mut R) -> (CompanySize, f64) {
    let size = match rng.gen_range(0..3) {
        0 => CompanySize::Small,
        1 => CompanySize::Medium,
        _ => CompanySize::Large,
    };
    let revenue = rng.gen_range(size.revenue_bracket()) as f64;
    (size, revenue)
}

/// Outreach message for a scored lead. Three tiers with boundaries at 60
/// and 80; `name` and `company` are interpolated verbatim.
pub fn outreach_message(name: &str, company: &str, score: i32) -> String {
    if score >= 80 {
        format!(
            "Hi {}, we see great potential for {} to benefit from our solutions. Let's connect!",
            name, company
        )
    } else if score >= 60 {
        format!(
            "Hi {}, we thought {} might find our solutions interesting. Would love to chat.",
            name, company
        )
    } else {
        format!(
            "Hi {}, reaching out from ProspectPro. Happy to discuss opportunities with {}.",
            name, company
        )
    }
}

/// Enrich a lead in place using the supplied generator.
///
/// Fills in size/revenue when either is missing, recomputes the score from
/// the six sub-scores, and overwrites the outreach message. Pre-populated
/// size/revenue pairs are left untouched. Total over its input: any lead
/// with a name produces a valid result.
pub fn enrich_with<R: Rng + ?Sized>(lead: &mut NewLead, rng: &mut R) {
    // Size and revenue are filled as a pair so a Large size never carries
    // a Small-bracket revenue.
    let (size, revenue) = match (lead.size, lead.revenue) {
        (Some(size), Some(revenue)) => (size, revenue),
        _ => {
            let (size, revenue) = draw_size_and_revenue(rng);
            lead.size = Some(size);
            lead.revenue = Some(revenue);
            (size, revenue)
        }
    };

    let total = email_score(lead.email.as_deref())
        + website_score(lead.website.as_deref())
        + linkedin_score(lead.linkedin.as_deref())
        + size_score(size)
        + revenue_score(revenue)
        + industry_score(lead.industry.as_deref());

    let score = (total.round() as i64).clamp(0, 100) as i32;
    let company = lead.display_company().to_string();

    lead.score = score;
    lead.message = Some(outreach_message(&lead.name, &company, score));
}

/// Enrich a lead in place on the thread-local generator.
pub fn enrich(lead: &mut NewLead) {
    enrich_with(lead, &mut rand::thread_rng());
}

/// Enrich a batch in place. Rows are independent; order and the
/// row-to-result association are preserved.
pub fn enrich_batch(leads: &mut [NewLead]) {
    let mut rng = rand::thread_rng();
    for lead in leads.iter_mut() {
        enrich_with(lead, &mut rng);
    }
}
