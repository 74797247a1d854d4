//! Request adapter: turns a report request into blocks, pages and a PDF
//! response body.

use crate::block::{Block, BlockList};
use crate::constants::DEFAULT_REPORT_TITLE;
use crate::cover::CoverDescriptor;
use crate::flow::PageFlow;
use crate::format::{format_amount, format_hours, format_minor_units, numeric_value};
use crate::request::{Branding, ReportPayload, ReportRequest, non_blank};
use crate::writer::write_pdf;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info, instrument};

/// Media type of the response body
pub const CONTENT_TYPE: &str = "application/pdf";

/// Download filename offered to the client
pub const FILENAME: &str = "weekly-report.pdf";

const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 11.0;
const DETAIL_SIZE: f32 = 9.0;
const TABLE_SIZE: f32 = 10.0;

const NO_REPORT: &str = "Report content was not provided.";
const NO_SUMMARY: &str = "No executive summary provided.";
const NO_CLIENTS: &str = "No client reports provided.";
const UNNAMED_CLIENT: &str = "Unnamed client";

/// A finished HTTP-style response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub content_disposition: String,
    pub body: Vec<u8>,
}

impl ReportResponse {
    /// A 200 response carrying a PDF attachment
    pub fn pdf(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: CONTENT_TYPE,
            content_disposition: format!("attachment; filename=\"{FILENAME}\""),
            body,
        }
    }

    /// Header name/value pairs for the hosting layer
    pub fn headers(&self) -> [(&'static str, String); 2] {
        [
            ("Content-Type", self.content_type.to_string()),
            ("Content-Disposition", self.content_disposition.clone()),
        ]
    }
}

/// Banner title: `"{company} — Weekly AI Report"`, or the generic title
pub fn report_title(branding: &Branding) -> String {
    match branding.company_name() {
        Some(company) => format!("{company} \u{2014} {DEFAULT_REPORT_TITLE}"),
        None => DEFAULT_REPORT_TITLE.to_string(),
    }
}

/// Branding lines shown at the top of the first page
pub fn branding_blocks(branding: &Branding) -> BlockList {
    let mut blocks = BlockList::new();
    if let Some(company) = branding.company_name() {
        blocks.push(Block::text(format!("Prepared for {company}"), BODY_SIZE));
    }
    if let Some(email) = branding.contact_email() {
        blocks.push(Block::text(format!("Contact: {email}"), TABLE_SIZE));
    }
    if let Some(logo) = branding.logo_url() {
        blocks.push(Block::text(format!("Logo: {logo}"), DETAIL_SIZE));
    }
    blocks
}

/// Build the full block sequence for a POST request
#[instrument(skip_all)]
pub fn build_blocks(request: &ReportRequest) -> BlockList {
    let mut blocks = branding_blocks(&request.branding());

    if let Some(period) = non_blank(request.period.as_deref()) {
        blocks.push(Block::text(format!("Period: {period}"), BODY_SIZE));
    }

    match &request.report {
        Some(report) => push_report_sections(&mut blocks, report, request),
        None => blocks.push(Block::text(NO_REPORT, BODY_SIZE)),
    }

    debug!("Built {} blocks", blocks.len());
    blocks
}

fn push_report_sections(blocks: &mut BlockList, report: &ReportPayload, request: &ReportRequest) {
    let locale = request.options.locale();
    let currency = request.options.currency();

    blocks.push(Block::text("Executive Summary", HEADING_SIZE));
    let summary = non_blank(report.executive_summary.as_deref()).unwrap_or(NO_SUMMARY);
    blocks.push(Block::text(summary, BODY_SIZE));

    blocks.push(Block::text("Client Breakdown", HEADING_SIZE));
    if report.reports.is_empty() {
        blocks.push(Block::text(NO_CLIENTS, BODY_SIZE));
    } else {
        blocks.push(Block::header("Client", "Hours", "Amount", TABLE_SIZE));
        for client in &report.reports {
            let totals = client.totals.clone().unwrap_or_default();
            blocks.push(Block::row(
                client_name(client.client.as_deref()),
                format_hours(totals.hours.as_ref(), locale),
                format_amount(totals.amount.as_ref(), locale, currency),
                TABLE_SIZE,
            ));
        }
    }

    let with_highlights: Vec<_> = report
        .reports
        .iter()
        .filter(|r| r.highlights.iter().any(|h| !h.trim().is_empty()))
        .collect();
    if !with_highlights.is_empty() {
        blocks.push(Block::text("Highlights", HEADING_SIZE));
        for client in with_highlights {
            blocks.push(Block::text(client_name(client.client.as_deref()), BODY_SIZE));
            for highlight in client.highlights.iter().filter(|h| !h.trim().is_empty()) {
                blocks.push(Block::text(format!("\u{2022} {}", highlight.trim()), TABLE_SIZE));
            }
        }
    }

    let (hours, cents) = report_totals(report);
    blocks.push(Block::text("Totals", HEADING_SIZE));
    blocks.push(Block::text(
        format!("Total hours: {}", format_hours(Some(&Value::from(hours)), locale)),
        BODY_SIZE,
    ));
    blocks.push(Block::text(
        format!("Total amount: {}", format_minor_units(cents, locale, currency)),
        BODY_SIZE,
    ));
}

fn client_name(name: Option<&str>) -> &str {
    non_blank(name).unwrap_or(UNNAMED_CLIENT)
}

/// Sum of numeric hours and amounts (minor units) across all clients
pub fn report_totals(report: &ReportPayload) -> (f64, f64) {
    report
        .reports
        .iter()
        .filter_map(|r| r.totals.as_ref())
        .fold((0.0, 0.0), |(hours, cents), totals| {
            (
                hours + totals.hours.as_ref().and_then(numeric_value).unwrap_or(0.0),
                cents + totals.amount.as_ref().and_then(numeric_value).unwrap_or(0.0),
            )
        })
}

/// Render a POST request to PDF bytes
#[instrument(skip_all)]
pub fn render_request(request: &ReportRequest, generated_at: DateTime<Utc>) -> Vec<u8> {
    let branding = request.branding();
    let blocks = build_blocks(request);
    let cover = request.options.include_cover.then(|| CoverDescriptor {
        company: branding.company_name().map(str::to_string),
        period: non_blank(request.period.as_deref()).map(str::to_string),
    });

    let pages = PageFlow::new(report_title(&branding), generated_at)
        .with_options(request.options.flow_options())
        .paginate(&blocks, cover.as_ref());
    write_pdf(&pages).bytes
}

/// Render the branding-only GET variant to PDF bytes
#[instrument(skip_all)]
pub fn render_branding(branding: &Branding, generated_at: DateTime<Utc>) -> Vec<u8> {
    let mut blocks = branding_blocks(branding);
    blocks.push(Block::text(NO_REPORT, BODY_SIZE));

    let pages = PageFlow::new(report_title(branding), generated_at).paginate(&blocks, None);
    write_pdf(&pages).bytes
}

/// Handle a POST body. Never fails: malformed JSON renders a default report.
pub fn handle_post(body: &[u8]) -> ReportResponse {
    handle_post_at(body, Utc::now())
}

/// Handle a POST body with an explicit generation time
pub fn handle_post_at(body: &[u8], generated_at: DateTime<Utc>) -> ReportResponse {
    let request = ReportRequest::parse_lenient(body);
    let bytes = render_request(&request, generated_at);
    info!("Generated weekly report ({} bytes)", bytes.len());
    ReportResponse::pdf(bytes)
}

/// Handle the GET variant with its branding query parameters
pub fn handle_get(query: &Branding) -> ReportResponse {
    handle_get_at(query, Utc::now())
}

/// Handle the GET variant with an explicit generation time
pub fn handle_get_at(query: &Branding, generated_at: DateTime<Utc>) -> ReportResponse {
    let bytes = render_branding(query, generated_at);
    info!("Generated branding-only report ({} bytes)", bytes.len());
    ReportResponse::pdf(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::escape_text;
    use crate::request::{ClientReport, Totals};
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 8, 9, 30, 0).unwrap()
    }

    fn contains(haystack: &[u8], needle: &str) -> bool {
        haystack
            .windows(needle.len())
            .any(|w| w == needle.as_bytes())
    }

    fn texts(blocks: &BlockList) -> Vec<String> {
        blocks
            .iter()
            .filter_map(|b| match b {
                Block::Text { text, .. } => Some(text.clone()),
                Block::Row { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_report_title() {
        assert_eq!(report_title(&Branding::default()), "Weekly AI Report");
        assert_eq!(
            report_title(&Branding::company("Acme")),
            "Acme \u{2014} Weekly AI Report"
        );
    }

    #[test]
    fn test_missing_report_yields_placeholder() {
        let blocks = build_blocks(&ReportRequest::default());
        assert_eq!(texts(&blocks), vec![NO_REPORT.to_string()]);
    }

    #[test]
    fn test_missing_summary_and_clients_yield_placeholders() {
        let request = ReportRequest {
            report: Some(ReportPayload::default()),
            ..ReportRequest::default()
        };
        let texts = texts(&build_blocks(&request));
        assert!(texts.contains(&NO_SUMMARY.to_string()));
        assert!(texts.contains(&NO_CLIENTS.to_string()));
        assert!(texts.contains(&"Total amount: $0.00".to_string()));
    }

    #[test]
    fn test_table_rows_and_totals() {
        let request: ReportRequest = serde_json::from_value(json!({
            "report": {
                "reports": [
                    { "client": "Acme", "totals": { "hours": 12.5, "amount": 150000 } },
                    { "client": "Globex", "totals": { "hours": "n/a", "amount": 2550 } },
                    { "totals": { "hours": 2 } }
                ]
            }
        }))
        .unwrap();
        let blocks = build_blocks(&request);

        let rows: Vec<&Block> = blocks.iter().filter(|b| matches!(b, Block::Row { .. })).collect();
        assert_eq!(rows.len(), 4);
        assert!(rows[0].is_header());
        assert_eq!(*rows[1], Block::row("Acme", "12.5", "$1,500.00", TABLE_SIZE));
        assert_eq!(*rows[2], Block::row("Globex", "n/a", "$25.50", TABLE_SIZE));
        assert_eq!(*rows[3], Block::row(UNNAMED_CLIENT, "2.0", "$0.00", TABLE_SIZE));

        let texts = texts(&blocks);
        assert!(texts.contains(&"Total hours: 14.5".to_string()));
        assert!(texts.contains(&"Total amount: $1,525.50".to_string()));
    }

    #[test]
    fn test_null_fields_keep_the_rest_of_the_report() {
        let body = json!({
            "report": {
                "executiveSummary": "Q1 was strong",
                "reports": [
                    { "client": "Acme", "totals": { "hours": 12.5, "amount": 150000 }, "highlights": null },
                    { "client": 42, "totals": { "hours": 1, "amount": 100 } }
                ]
            },
            "options": null
        });
        let request = ReportRequest::parse_lenient(body.to_string().as_bytes());
        let blocks = build_blocks(&request);

        let texts = texts(&blocks);
        assert!(!texts.contains(&NO_REPORT.to_string()));
        assert!(texts.contains(&"Q1 was strong".to_string()));
        let rows: Vec<&Block> = blocks.iter().filter(|b| matches!(b, Block::Row { .. })).collect();
        assert_eq!(*rows[1], Block::row("Acme", "12.5", "$1,500.00", TABLE_SIZE));
        assert_eq!(*rows[2], Block::row("42", "1.0", "$1.00", TABLE_SIZE));
    }

    #[test]
    fn test_highlights_are_bulleted() {
        let request = ReportRequest {
            report: Some(ReportPayload {
                executive_summary: None,
                reports: vec![ClientReport {
                    client: Some("Acme".to_string()),
                    totals: Some(Totals::default()),
                    highlights: vec!["Shipped v2".to_string(), " ".to_string()],
                }],
            }),
            ..ReportRequest::default()
        };
        let texts = texts(&build_blocks(&request));
        assert!(texts.contains(&"Highlights".to_string()));
        assert!(texts.contains(&"\u{2022} Shipped v2".to_string()));
        assert_eq!(texts.iter().filter(|t| t.starts_with('\u{2022}')).count(), 1);
    }

    #[test]
    fn test_branding_blocks() {
        let branding = Branding {
            company_name: Some("Acme".to_string()),
            logo_url: Some("https://acme.test/logo.png".to_string()),
            contact_email: Some("ops@acme.test".to_string()),
        };
        assert_eq!(
            texts(&branding_blocks(&branding)),
            vec![
                "Prepared for Acme",
                "Contact: ops@acme.test",
                "Logo: https://acme.test/logo.png"
            ]
        );
    }

    #[test]
    fn test_response_headers() {
        let response = handle_post_at(b"{}", now());
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type, "application/pdf");
        assert_eq!(
            response.content_disposition,
            "attachment; filename=\"weekly-report.pdf\""
        );
        assert!(response.body.starts_with(b"%PDF-"));
        assert_eq!(response.headers()[0].0, "Content-Type");
    }

    #[test]
    fn test_malformed_body_still_renders() {
        let response = handle_post_at(b"{\"report\": ", now());
        assert_eq!(response.status, 200);
        assert!(contains(&response.body, NO_REPORT));
    }

    #[test]
    fn test_get_with_company_name() {
        let response = handle_get_at(&Branding::company("Acme"), now());
        assert_eq!(response.status, 200);
        assert!(contains(&response.body, &escape_text("Acme \u{2014} Weekly AI Report")));
        assert!(contains(&response.body, NO_REPORT));
        // minimal document: no cover, one content page
        assert!(contains(&response.body, "/Count 1 >>"));
        assert!(contains(&response.body, "(Page 1 of 1)"));
    }

    #[test]
    fn test_options_disable_cover() {
        let with_cover = handle_post_at(b"{}", now());
        let without = handle_post_at(br#"{"options":{"includeCover":false}}"#, now());
        assert!(contains(&with_cover.body, "/Count 2 >>"));
        assert!(contains(&without.body, "/Count 1 >>"));
    }
}
