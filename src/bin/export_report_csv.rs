// src/bin/export_report_csv.rs

use std::env;
use chrono::NaiveDate;

use megler_backend::models::report::RapportPeriode;
use megler_backend::services::{csv_export, report_api::ReportApiService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    // Usage: cargo run --bin export_report_csv -- kunder 2026-01-01 2026-03-31 > kunder.csv
    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <kunder|skader> <fra YYYY-MM-DD> <til YYYY-MM-DD>", args[0]);
        std::process::exit(1);
    }

    let periode = RapportPeriode {
        fra: NaiveDate::parse_from_str(&args[2], "%Y-%m-%d")?,
        til: NaiveDate::parse_from_str(&args[3], "%Y-%m-%d")?,
    };

    let report_api = ReportApiService::new(
        env::var("REPORT_API_URL").ok(),
        env::var("REPORT_API_KEY").ok(),
        60,
    );

    let csv = match args[1].as_str() {
        "kunder" => {
            let rows = report_api.garantikunde_rader(&periode).await?;
            eprintln!("Exporting {} customer rows", rows.len());
            csv_export::kunder_csv(&rows)?
        }
        "skader" => {
            let rows = report_api.skade_rader(&periode).await?;
            eprintln!("Exporting {} claim rows", rows.len());
            csv_export::skader_csv(&rows)?
        }
        other => {
            eprintln!("Unknown report '{}', expected kunder or skader", other);
            std::process::exit(1);
        }
    };

    print!("{}", csv);
    Ok(())
}
