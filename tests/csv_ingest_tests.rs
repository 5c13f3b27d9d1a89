//! Unit tests for CSV ingest and export.

use chrono::Utc;
use prospect_api::csv_ingest::{parse_lead_rows, write_enriched_csv, write_leads_csv};
use prospect_api::models::{CompanySize, Lead, NewLead};
use uuid::Uuid;

#[cfg(test)]
mod ingest_tests {
    use super::*;

    #[test]
    fn test_parse_basic_rows() {
        let csv = "name,email,website,industry\n\
                   Acme,a@b.co,acme.com,Tech\n\
                   Globex,,globex.io,Retail\n";

        let leads = parse_lead_rows(csv.as_bytes()).expect("parse");
        assert_eq!(leads.len(), 2);

        assert_eq!(leads[0].name, "Acme");
        assert_eq!(leads[0].email.as_deref(), Some("a@b.co"));
        assert_eq!(leads[0].industry.as_deref(), Some("Tech"));

        // Empty cells become absent fields
        assert_eq!(leads[1].name, "Globex");
        assert_eq!(leads[1].email, None);
    }

    #[test]
    fn test_capitalized_headers_accepted() {
        let csv = "Name,Email,Company,Website,LinkedIn,Industry,City\n\
                   Acme,a@b.co,Acme Inc,acme.com,linkedin.com/company/acme,Tech,Austin\n";

        let leads = parse_lead_rows(csv.as_bytes()).expect("parse");
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].name, "Acme");
        assert_eq!(leads[0].company.as_deref(), Some("Acme Inc"));
        assert_eq!(leads[0].linkedin.as_deref(), Some("linkedin.com/company/acme"));
        assert_eq!(leads[0].city.as_deref(), Some("Austin"));
    }

    #[test]
    fn test_size_parsed_leniently() {
        let csv = "name,size\nA,Large\nB,medium\nC,SMALL\nD,huge\n";

        let leads = parse_lead_rows(csv.as_bytes()).expect("parse");
        assert_eq!(leads[0].size, Some(CompanySize::Large));
        assert_eq!(leads[1].size, Some(CompanySize::Medium));
        assert_eq!(leads[2].size, Some(CompanySize::Small));
        // Unrecognized bucket degrades to absent, not an error
        assert_eq!(leads[3].size, None);
    }

    #[test]
    fn test_revenue_parsed_leniently() {
        let csv = "name,revenue\n\
                   A,1200000\n\
                   B,\"$1,200,000\"\n\
                   C,n/a\n\
                   D,2500000.50\n";

        let leads = parse_lead_rows(csv.as_bytes()).expect("parse");
        assert_eq!(leads[0].revenue, Some(1_200_000.0));
        assert_eq!(leads[1].revenue, Some(1_200_000.0));
        // Unparseable value degrades to absent so the fill-in takes over
        assert_eq!(leads[2].revenue, None);
        assert_eq!(leads[3].revenue, Some(2_500_000.5));
    }

    #[test]
    fn test_company_doubles_as_name() {
        let csv = "company,email\nAcme Inc,a@b.co\n";

        let leads = parse_lead_rows(csv.as_bytes()).expect("parse");
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].name, "Acme Inc");
        assert_eq!(leads[0].company.as_deref(), Some("Acme Inc"));
    }

    #[test]
    fn test_nameless_rows_skipped() {
        let csv = "name,email\nAcme,a@b.co\n,orphan@b.co\n";

        let leads = parse_lead_rows(csv.as_bytes()).expect("parse");
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].name, "Acme");
    }

    #[test]
    fn test_structurally_broken_csv_errors() {
        // Unclosed quote
        let csv = "name,email\n\"Acme,a@b.co\n";

        let result = parse_lead_rows(csv.as_bytes());
        assert!(result.is_err());
    }
}

#[cfg(test)]
mod export_tests {
    use super::*;

    fn stored_lead(name: &str, score: i32) -> Lead {
        Lead {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: name.to_string(),
            company: None,
            email: Some(format!("{}@example.com", name.to_lowercase())),
            website: Some("example.com".to_string()),
            linkedin: None,
            industry: Some("Tech".to_string()),
            city: Some("Austin".to_string()),
            size: Some("Large".to_string()),
            revenue: Some(25_000_000.0),
            score,
            message: Some(format!("Hi {}, hello.", name)),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_export_header_and_rows() {
        let leads = vec![stored_lead("Acme", 90), stored_lead("Globex", 45)];

        let mut buffer = Vec::new();
        write_leads_csv(&mut buffer, &leads).expect("export");
        let output = String::from_utf8(buffer).expect("utf8");

        let mut lines = output.lines();
        assert_eq!(
            lines.next(),
            Some("name,email,company,website,linkedin,industry,city,size,revenue,score,message")
        );
        let first = lines.next().expect("first row");
        assert!(first.starts_with("Acme,"));
        assert!(first.contains("90"));
        assert_eq!(lines.count(), 1);
    }

    #[test]
    fn test_export_then_reingest_keeps_fields() {
        let leads = vec![stored_lead("Acme", 90)];

        let mut buffer = Vec::new();
        write_leads_csv(&mut buffer, &leads).expect("export");

        let parsed = parse_lead_rows(buffer.as_slice()).expect("reingest");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "Acme");
        assert_eq!(parsed[0].size, Some(CompanySize::Large));
        assert_eq!(parsed[0].revenue, Some(25_000_000.0));
    }

    #[test]
    fn test_enriched_csv_includes_score_and_message() {
        let mut lead = NewLead::named("Acme");
        lead.score = 90;
        lead.message = Some("Hi Acme, hello.".to_string());

        let mut buffer = Vec::new();
        write_enriched_csv(&mut buffer, &[lead]).expect("export");
        let output = String::from_utf8(buffer).expect("utf8");

        assert!(output.lines().next().unwrap_or("").contains("score"));
        assert!(output.contains("Hi Acme, hello."));
    }
}
