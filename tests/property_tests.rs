//! Property-based tests using proptest.
//! Tests invariants that should hold for all inputs to the scoring engine.

use proptest::prelude::*;
use prospect_api::enrichment::{
    draw_size_and_revenue, email_score, enrich_with, outreach_message,
};
use prospect_api::models::{CompanySize, NewLead};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn optional(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

// Property: scoring never panics and the total is always an integer in [0, 100]
proptest! {
    #[test]
    fn score_always_within_bounds(
        name in "\\PC{1,30}",
        email in "\\PC{0,30}",
        website in "\\PC{0,30}",
        linkedin in "\\PC{0,30}",
        industry in "\\PC{0,20}",
        seed in any::<u64>()
    ) {
        let mut lead = NewLead::named(name);
        lead.email = optional(email);
        lead.website = optional(website);
        lead.linkedin = optional(linkedin);
        lead.industry = optional(industry);

        let mut rng = StdRng::seed_from_u64(seed);
        enrich_with(&mut lead, &mut rng);

        prop_assert!(lead.score >= 0 && lead.score <= 100);
        prop_assert!(lead.message.is_some());
    }

    #[test]
    fn email_score_never_panics(email in "\\PC*") {
        let _ = email_score(Some(&email));
    }

    #[test]
    fn well_formed_emails_always_score_25(
        local in "[a-z0-9]{1,12}",
        domain in "[a-z0-9]{1,12}",
        tld in "[a-z]{2,6}"
    ) {
        let email = format!("{}@{}.{}", local, domain, tld);
        prop_assert_eq!(email_score(Some(&email)), 25.0);
    }
}

// Property: the fill-in draw keeps the size/revenue pair consistent
proptest! {
    #[test]
    fn generated_revenue_matches_generated_size(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let (size, revenue) = draw_size_and_revenue(&mut rng);
        let bracket = size.revenue_bracket();
        prop_assert!(revenue >= bracket.start as f64);
        prop_assert!(revenue < bracket.end as f64);
    }

    #[test]
    fn preset_pair_survives_enrichment(
        size_index in 0usize..3,
        offset in 0u64..40_000_000,
        seed in any::<u64>()
    ) {
        let size = [CompanySize::Small, CompanySize::Medium, CompanySize::Large][size_index];
        let revenue = 50_000.0 + offset as f64;

        let mut lead = NewLead::named("Acme");
        lead.size = Some(size);
        lead.revenue = Some(revenue);

        let mut rng = StdRng::seed_from_u64(seed);
        enrich_with(&mut lead, &mut rng);

        prop_assert_eq!(lead.size, Some(size));
        prop_assert_eq!(lead.revenue, Some(revenue));
    }
}

// Property: the message always carries the interpolated names
proptest! {
    #[test]
    fn message_contains_name_and_company(
        name in "[a-zA-Z0-9 ]{1,20}",
        company in "[a-zA-Z0-9 ]{1,20}",
        score in 0i32..=100
    ) {
        let message = outreach_message(&name, &company, score);
        prop_assert!(message.contains(&name));
        prop_assert!(message.contains(&company));
    }

    #[test]
    fn message_tier_boundaries_hold(score in 0i32..=100) {
        let message = outreach_message("Ana", "Acme", score);
        if score >= 80 {
            prop_assert!(message.contains("great potential"));
        } else if score >= 60 {
            prop_assert!(message.contains("might find our solutions interesting"));
        } else {
            prop_assert!(message.contains("reaching out from ProspectPro"));
        }
    }
}
