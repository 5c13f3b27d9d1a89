//! Unit tests for the enrichment/scoring engine.
//! Covers sub-scores, the size/revenue fill-in, total score bounds, and
//! message tier selection.

use prospect_api::enrichment::{
    draw_size_and_revenue, email_score, enrich_with, industry_score, linkedin_score,
    outreach_message, revenue_score, size_score, website_score,
};
use prospect_api::models::{CompanySize, NewLead};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[cfg(test)]
mod email_scoring_tests {
    use super::*;

    #[test]
    fn test_matching_emails_score_25() {
        assert_eq!(email_score(Some("user@example.com")), 25.0);
        assert_eq!(email_score(Some("a@b.co")), 25.0);
        assert_eq!(email_score(Some("first.last@sub.domain.io")), 25.0);
    }

    #[test]
    fn test_pattern_is_unanchored() {
        // The pattern matches anywhere in the value, like the loose
        // substring check it replaces
        assert_eq!(email_score(Some("reach me at a@b.co please")), 25.0);
    }

    #[test]
    fn test_non_matching_emails_score_0() {
        assert_eq!(email_score(Some("userexample.com")), 0.0);
        assert_eq!(email_score(Some("user@examplecom")), 0.0);
        assert_eq!(email_score(Some("user@")), 0.0);
        assert_eq!(email_score(Some("")), 0.0);
    }

    #[test]
    fn test_absent_email_scores_0() {
        assert_eq!(email_score(None), 0.0);
    }
}

#[cfg(test)]
mod presence_scoring_tests {
    use super::*;

    #[test]
    fn test_website_presence() {
        assert_eq!(website_score(Some("acme.com")), 15.0);
        assert_eq!(website_score(Some("")), 0.0);
        assert_eq!(website_score(None), 0.0);
    }

    #[test]
    fn test_linkedin_presence() {
        assert_eq!(linkedin_score(Some("https://linkedin.com/company/acme")), 10.0);
        assert_eq!(linkedin_score(Some("")), 0.0);
        assert_eq!(linkedin_score(None), 0.0);
    }
}

#[cfg(test)]
mod size_revenue_scoring_tests {
    use super::*;

    #[test]
    fn test_size_score_buckets() {
        assert_eq!(size_score(CompanySize::Small), 10.0);
        assert_eq!(size_score(CompanySize::Medium), 14.0);
        assert_eq!(size_score(CompanySize::Large), 20.0);
    }

    #[test]
    fn test_revenue_score_bands() {
        assert_eq!(revenue_score(0.0), 10.0);
        assert_eq!(revenue_score(999_999.0), 10.0);
        assert_eq!(revenue_score(1_000_000.0), 14.0);
        assert_eq!(revenue_score(9_999_999.0), 14.0);
        assert_eq!(revenue_score(10_000_000.0), 20.0);
        assert_eq!(revenue_score(50_000_000.0), 20.0);
    }

    #[test]
    fn test_industry_score_target_set() {
        assert_eq!(industry_score(Some("Tech")), 10.0);
        assert_eq!(industry_score(Some("Finance")), 10.0);
        assert_eq!(industry_score(Some("Healthcare")), 10.0);
    }

    #[test]
    fn test_industry_score_other_and_absent() {
        assert_eq!(industry_score(Some("Retail")), 5.0);
        // Membership is exact, matching the seeded directory labels
        assert_eq!(industry_score(Some("tech")), 5.0);
        assert_eq!(industry_score(None), 5.0);
    }
}

#[cfg(test)]
mod fill_in_tests {
    use super::*;

    #[test]
    fn test_draw_pairs_revenue_with_size_bracket() {
        for seed in 0..200u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let (size, revenue) = draw_size_and_revenue(&mut rng);
            let bracket = size.revenue_bracket();
            assert!(
                revenue >= bracket.start as f64 && revenue < bracket.end as f64,
                "seed {}: revenue {} outside bracket for {}",
                seed,
                revenue,
                size
            );
        }
    }

    #[test]
    fn test_missing_both_generates_both() {
        let mut lead = NewLead::named("Acme");
        let mut rng = StdRng::seed_from_u64(7);
        enrich_with(&mut lead, &mut rng);

        let size = lead.size.expect("size generated");
        let revenue = lead.revenue.expect("revenue generated");
        let bracket = size.revenue_bracket();
        assert!(revenue >= bracket.start as f64 && revenue < bracket.end as f64);
    }

    #[test]
    fn test_missing_revenue_regenerates_the_pair() {
        // A lone size with no revenue is replaced as a pair so the two
        // stay consistent
        let mut lead = NewLead::named("Acme");
        lead.size = Some(CompanySize::Small);
        let mut rng = StdRng::seed_from_u64(21);
        enrich_with(&mut lead, &mut rng);

        let size = lead.size.expect("size present");
        let revenue = lead.revenue.expect("revenue generated");
        let bracket = size.revenue_bracket();
        assert!(revenue >= bracket.start as f64 && revenue < bracket.end as f64);
    }

    #[test]
    fn test_present_pair_never_altered() {
        let mut lead = NewLead::named("Acme");
        lead.size = Some(CompanySize::Medium);
        lead.revenue = Some(2_500_000.0);

        for seed in 0..50u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            enrich_with(&mut lead, &mut rng);
            assert_eq!(lead.size, Some(CompanySize::Medium));
            assert_eq!(lead.revenue, Some(2_500_000.0));
        }
    }
}

#[cfg(test)]
mod message_tests {
    use super::*;

    #[test]
    fn test_high_tier_at_80() {
        let message = outreach_message("Ana", "Acme", 80);
        assert!(message.contains("great potential"));
        assert!(message.contains("Ana"));
        assert!(message.contains("Acme"));
    }

    #[test]
    fn test_mid_tier_between_60_and_79() {
        for score in [60, 70, 79] {
            let message = outreach_message("Ana", "Acme", score);
            assert!(message.contains("might find our solutions interesting"));
        }
    }

    #[test]
    fn test_low_tier_below_60() {
        for score in [0, 30, 59] {
            let message = outreach_message("Ana", "Acme", score);
            assert!(message.contains("reaching out from ProspectPro"));
        }
    }

    #[test]
    fn test_name_and_company_interpolated_verbatim() {
        // No escaping, even for odd characters
        let message = outreach_message("O'Brien & Co", "<Acme>", 90);
        assert!(message.contains("O'Brien & Co"));
        assert!(message.contains("<Acme>"));
    }

    #[test]
    fn test_company_falls_back_to_name() {
        let mut lead = NewLead::named("Solo Consulting");
        let mut rng = StdRng::seed_from_u64(3);
        enrich_with(&mut lead, &mut rng);

        let message = lead.message.expect("message generated");
        assert!(message.contains("Solo Consulting"));
    }

    #[test]
    fn test_message_overwritten_every_call() {
        let mut lead = NewLead::named("Acme");
        lead.message = Some("stale".to_string());
        lead.size = Some(CompanySize::Large);
        lead.revenue = Some(50_000_000.0);

        let mut rng = StdRng::seed_from_u64(4);
        enrich_with(&mut lead, &mut rng);

        let message = lead.message.expect("message generated");
        assert_ne!(message, "stale");
    }
}

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[test]
    fn test_fully_populated_record_scores_90() {
        let mut lead = NewLead::named("Acme");
        lead.email = Some("a@b.co".to_string());
        lead.website = Some("acme.com".to_string());
        lead.industry = Some("Tech".to_string());
        lead.size = Some(CompanySize::Large);
        lead.revenue = Some(50_000_000.0);

        let mut rng = StdRng::seed_from_u64(0);
        enrich_with(&mut lead, &mut rng);

        // email 25 + website 15 + linkedin 0 + size 20 + revenue 20 + industry 10
        assert_eq!(lead.score, 90);
        let message = lead.message.expect("message generated");
        assert!(message.contains("great potential"));
        assert!(message.contains("Acme"));
    }

    #[test]
    fn test_name_only_record_stays_in_low_tier() {
        for seed in 0..100u64 {
            let mut lead = NewLead::named("Bob");
            let mut rng = StdRng::seed_from_u64(seed);
            enrich_with(&mut lead, &mut rng);

            // presence signals all zero; size 10-20 + revenue 10-20 + industry 5
            assert!(lead.score >= 25, "seed {}: score {}", seed, lead.score);
            assert!(lead.score <= 45, "seed {}: score {}", seed, lead.score);

            let message = lead.message.expect("message generated");
            assert!(message.contains("reaching out from ProspectPro"));
            assert!(message.contains("Bob"));
        }
    }

    #[test]
    fn test_score_clamped_to_100() {
        // Maximum possible raw total is exactly 100; the clamp is a
        // defensive ceiling
        let mut lead = NewLead::named("Acme");
        lead.email = Some("a@b.co".to_string());
        lead.website = Some("acme.com".to_string());
        lead.linkedin = Some("https://linkedin.com/company/acme".to_string());
        lead.industry = Some("Tech".to_string());
        lead.size = Some(CompanySize::Large);
        lead.revenue = Some(50_000_000.0);

        let mut rng = StdRng::seed_from_u64(0);
        enrich_with(&mut lead, &mut rng);

        assert_eq!(lead.score, 100);
    }
}

#[cfg(test)]
mod error_handling_tests {
    use prospect_api::errors::AppError;

    #[test]
    fn test_app_error_types() {
        let db_error = AppError::DatabaseError(sqlx::Error::RowNotFound);
        assert!(matches!(db_error, AppError::DatabaseError(_)));

        let conflict = AppError::Conflict("Lead already saved for this company".to_string());
        assert!(matches!(conflict, AppError::Conflict(_)));

        let csv_error = AppError::CsvError("row 3: malformed".to_string());
        assert!(matches!(csv_error, AppError::CsvError(_)));

        let not_found = AppError::NotFound("Lead not found".to_string());
        assert!(matches!(not_found, AppError::NotFound(_)));
    }

    #[test]
    fn test_error_display() {
        let error = AppError::Conflict("Lead already saved for this company".to_string());
        let display = format!("{}", error);
        assert!(display.contains("Conflict"));
        assert!(display.contains("Lead already saved"));

        let error = AppError::CsvError("row 2: missing field".to_string());
        let display = format!("{}", error);
        assert!(display.contains("CSV error"));
        assert!(display.contains("row 2"));
    }
}
