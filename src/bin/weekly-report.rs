//! weekly-report - render a JSON report request to a PDF file

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use weekly_report_pdf::report::{render_branding, render_request};
use weekly_report_pdf::{Branding, ReportRequest, Result};

#[derive(Parser)]
#[command(name = "weekly-report")]
#[command(version)]
#[command(about = "Render a weekly report request to PDF", long_about = None)]
struct Cli {
    /// JSON request file; omit to render a branding-only document
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file
    #[arg(short, long, value_name = "FILE", default_value = "weekly-report.pdf")]
    output: PathBuf,

    /// Reject malformed JSON instead of falling back to defaults
    #[arg(long)]
    strict: bool,

    /// Company name for the branding-only document
    #[arg(long)]
    company: Option<String>,

    /// Logo URL for the branding-only document
    #[arg(long)]
    logo_url: Option<String>,

    /// Contact email for the branding-only document
    #[arg(long)]
    contact_email: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let bytes = match &cli.input {
        Some(path) => {
            let body = fs::read(path)?;
            let request = if cli.strict {
                ReportRequest::parse_strict(&body)?
            } else {
                ReportRequest::parse_lenient(&body)
            };
            render_request(&request, Utc::now())
        }
        None => {
            let branding = Branding {
                company_name: cli.company,
                logo_url: cli.logo_url,
                contact_email: cli.contact_email,
            };
            render_branding(&branding, Utc::now())
        }
    };

    fs::write(&cli.output, &bytes)?;
    info!("Wrote {} bytes to {}", bytes.len(), cli.output.display());
    Ok(())
}
