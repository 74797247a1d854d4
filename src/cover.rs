//! Cover page rendering

use crate::constants::*;
use crate::drawing::ContentBuilder;
use crate::flow::PageStream;
use crate::font::FontMetrics;
use crate::request::non_blank;
use crate::style::Color;
use tracing::debug;

/// Title and period shown on the unnumbered cover page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverDescriptor {
    pub company: Option<String>,
    pub period: Option<String>,
}

impl CoverDescriptor {
    /// Create an empty descriptor (generic title, no period)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the company name used as the cover title
    pub fn with_company<S: Into<String>>(mut self, company: S) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Set the reporting period shown in the subtitle
    pub fn with_period<S: Into<String>>(mut self, period: S) -> Self {
        self.period = Some(period.into());
        self
    }

    /// Large cover title, falling back to the generic report title
    pub fn title(&self) -> &str {
        non_blank(self.company.as_deref()).unwrap_or(DEFAULT_REPORT_TITLE)
    }

    /// Subtitle line, with the period appended when one is given
    pub fn subtitle(&self) -> String {
        match non_blank(self.period.as_deref()) {
            Some(period) => format!("Weekly Report \u{2014} {period}"),
            None => "Weekly Report".to_string(),
        }
    }
}

/// Left edge that centers `text` on the page, never left of the margin
pub fn centered_x(text: &str, font_size: f32, metrics: &dyn FontMetrics) -> f32 {
    ((PAGE_WIDTH - metrics.text_width(text, font_size)) / 2.0).max(MARGIN_LEFT)
}

/// Render the cover page.
///
/// The footer carries only the generation timestamp; the cover never holds a
/// page-number token.
pub fn render_cover(
    cover: &CoverDescriptor,
    timestamp: &str,
    metrics: &dyn FontMetrics,
) -> PageStream {
    debug!("Rendering cover page for {:?}", cover.title());

    let mut content = ContentBuilder::new();
    let band_bottom = PAGE_HEIGHT / 2.0 - 20.0;
    content.fill_rect(0.0, band_bottom, PAGE_WIDTH, 120.0, Color::banner());

    let title = cover.title();
    content.text(
        centered_x(title, COVER_TITLE_SIZE, metrics),
        band_bottom + 68.0,
        COVER_TITLE_SIZE,
        title,
        Color::white(),
    );

    let subtitle = cover.subtitle();
    content.text(
        centered_x(&subtitle, COVER_SUBTITLE_SIZE, metrics),
        band_bottom + 30.0,
        COVER_SUBTITLE_SIZE,
        &subtitle,
        Color::white(),
    );

    let footer = format!("Generated {timestamp}");
    content.text(
        centered_x(&footer, FOOTER_FONT_SIZE, metrics),
        FOOTER_Y,
        FOOTER_FONT_SIZE,
        &footer,
        Color::gray(0.4),
    );

    PageStream::cover(content.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::escape_text;
    use crate::font::EstimatedMetrics;

    #[test]
    fn test_title_falls_back_to_default() {
        assert_eq!(CoverDescriptor::new().title(), DEFAULT_REPORT_TITLE);
        assert_eq!(CoverDescriptor::new().with_company("  ").title(), DEFAULT_REPORT_TITLE);
        assert_eq!(CoverDescriptor::new().with_company("Acme").title(), "Acme");
    }

    #[test]
    fn test_subtitle_includes_period() {
        let cover = CoverDescriptor::new().with_period("Jan 1\u{2013}7");
        assert_eq!(cover.subtitle(), "Weekly Report \u{2014} Jan 1\u{2013}7");
        assert_eq!(CoverDescriptor::new().subtitle(), "Weekly Report");
    }

    #[test]
    fn test_centering_is_clamped_to_margin() {
        let metrics = EstimatedMetrics::default();
        // 10 chars * 10pt * 0.5 = 50pt wide
        assert_eq!(centered_x("abcdefghij", 10.0, &metrics), (PAGE_WIDTH - 50.0) / 2.0);
        let wide = "w".repeat(200);
        assert_eq!(centered_x(&wide, 10.0, &metrics), MARGIN_LEFT);
    }

    #[test]
    fn test_cover_has_no_page_tokens() {
        let page = render_cover(
            &CoverDescriptor::new().with_period("Q1"),
            "2026-01-08 09:00 UTC",
            &EstimatedMetrics::default(),
        );
        assert!(page.is_cover);
        assert_eq!(page.page_index, None);
        assert!(!page.content.contains(PAGE_NUMBER_TOKEN));
        assert!(!page.content.contains(PAGE_TOTAL_TOKEN));
        assert!(page.content.contains(&escape_text(DEFAULT_REPORT_TITLE)));
        assert!(page.content.contains("Generated 2026-01-08 09:00 UTC"));
    }
}
