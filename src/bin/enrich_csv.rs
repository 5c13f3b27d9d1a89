//! Offline enrichment CLI: read a lead CSV, enrich every row, write the
//! result CSV. No database required.

use prospect_api::csv_ingest::{parse_lead_rows, write_enriched_csv};
use prospect_api::enrichment::enrich_batch;
use std::env;
use std::fs::File;
use std::io::{self, Write};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let mut args = env::args().skip(1);
    let input_path = args.next().ok_or("usage: enrich_csv <input.csv> [output.csv]")?;
    let output_path = args.next();

    let input = File::open(&input_path)?;
    let mut leads = parse_lead_rows(input).map_err(|e| e.to_string())?;
    tracing::info!("Parsed {} lead row(s) from {}", leads.len(), input_path);

    enrich_batch(&mut leads);

    match output_path {
        Some(path) => {
            let output = File::create(&path)?;
            write_enriched_csv(output, &leads).map_err(|e| e.to_string())?;
            tracing::info!("✓ Wrote {} enriched lead(s) to {}", leads.len(), path);
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_enriched_csv(&mut handle, &leads).map_err(|e| e.to_string())?;
            handle.flush()?;
        }
    }

    Ok(())
}
