//! Page flow: turns a block list into per-page content streams

use crate::block::{Block, BlockList};
use crate::constants::*;
use crate::cover::{CoverDescriptor, render_cover};
use crate::drawing::ContentBuilder;
use crate::font::{EstimatedMetrics, FontMetrics};
use crate::style::{Color, FlowOptions};
use crate::text::wrap_text_with_metrics;
use chrono::{DateTime, Utc};
use tracing::{debug, instrument, trace, warn};

/// The rendered content stream of one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageStream {
    /// Content-stream operators; footers still hold the deferred tokens
    pub content: String,
    /// Whether this is the unnumbered cover page
    pub is_cover: bool,
    /// 1-based content page index recorded when the page was sealed
    pub page_index: Option<usize>,
}

impl PageStream {
    /// A numbered content page
    pub fn content(content: String, page_index: usize) -> Self {
        Self {
            content,
            is_cover: false,
            page_index: Some(page_index),
        }
    }

    /// The cover page
    pub fn cover(content: String) -> Self {
        Self {
            content,
            is_cover: true,
            page_index: None,
        }
    }
}

/// How a table row is shaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowShade {
    Header,
    Shaded,
    Plain,
}

/// Alternating shade tracker for table rows.
///
/// Only non-header rows toggle the stripe. Drawing a header row resets it so
/// the next body row is unshaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripeState {
    odd: bool,
}

impl StripeState {
    /// Shade for the next row, advancing the toggle
    pub fn advance(&mut self, header: bool, striping: bool) -> RowShade {
        if header {
            self.odd = false;
            return RowShade::Header;
        }
        let shade = if striping && self.odd {
            RowShade::Shaded
        } else {
            RowShade::Plain
        };
        self.odd = !self.odd;
        shade
    }
}

/// Engine state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    AtCoverPage,
    RenderingContent,
    Done,
}

/// Lays blocks out onto fixed-size pages.
///
/// Each content page gets a banner with the report title and a footer with
/// the generation time and a "Page N of M" line written with deferred tokens.
pub struct PageFlow {
    title: String,
    timestamp: String,
    options: FlowOptions,
    metrics: Box<dyn FontMetrics>,
    cover: Option<CoverDescriptor>,
    state: FlowState,
    pages: Vec<PageStream>,
    current: ContentBuilder,
    cursor_y: f32,
    page_has_content: bool,
    content_pages: usize,
    last_header: Option<Block>,
    stripes: StripeState,
}

impl PageFlow {
    /// Create an engine for a report titled `title`
    pub fn new<S: Into<String>>(title: S, generated_at: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            timestamp: format_timestamp(&generated_at),
            options: FlowOptions::default(),
            metrics: Box::new(EstimatedMetrics::default()),
            cover: None,
            state: FlowState::RenderingContent,
            pages: Vec::new(),
            current: ContentBuilder::new(),
            cursor_y: content_top(),
            page_has_content: false,
            content_pages: 0,
            last_header: None,
            stripes: StripeState::default(),
        }
    }

    /// Set the table switches
    pub fn with_options(mut self, options: FlowOptions) -> Self {
        self.options = options;
        self
    }

    /// Measure text with custom metrics
    pub fn with_metrics(mut self, metrics: Box<dyn FontMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Current engine state
    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Precede the content pages with an unnumbered cover page
    pub fn with_cover(mut self, cover: CoverDescriptor) -> Self {
        self.cover = Some(cover);
        self.state = FlowState::AtCoverPage;
        self
    }

    /// Lay out all blocks, preceded by a cover page when one is given.
    ///
    /// Always returns at least one content page, even for an empty block list.
    #[instrument(skip_all, fields(blocks = blocks.len(), cover = cover.is_some()))]
    pub fn paginate(
        mut self,
        blocks: &BlockList,
        cover: Option<&CoverDescriptor>,
    ) -> Vec<PageStream> {
        debug!("Paginating {} blocks", blocks.len());
        if let Some(cover) = cover {
            self = self.with_cover(cover.clone());
        }
        for block in blocks {
            self.push_block(block);
        }
        let pages = self.finish();
        debug!("Produced {} pages", pages.len());
        pages
    }

    /// Lay out one more block, rendering the cover and opening the first
    /// content page on the first call
    pub fn push_block(&mut self, block: &Block) {
        if self.state == FlowState::Done {
            warn!("Ignoring block pushed after layout finished");
            return;
        }
        self.start_content();
        self.render_block(block);
    }

    /// Seal the last page and hand over every page laid out so far.
    ///
    /// Subsequent calls return an empty list.
    pub fn finish(&mut self) -> Vec<PageStream> {
        if self.state != FlowState::Done {
            self.start_content();
            self.seal_page();
            self.state = FlowState::Done;
        }
        std::mem::take(&mut self.pages)
    }

    fn start_content(&mut self) {
        if self.content_pages > 0 {
            return;
        }
        if let Some(cover) = self.cover.take() {
            let page = render_cover(&cover, &self.timestamp, self.metrics.as_ref());
            self.pages.push(page);
        }
        self.state = FlowState::RenderingContent;
        self.open_page();
    }

    fn render_block(&mut self, block: &Block) {
        match block {
            Block::Text { text, size } => {
                // a paragraph ends any table in progress
                self.last_header = None;
                self.render_text(text, *size);
            }
            Block::Row {
                cells,
                header,
                size,
            } => {
                let height = row_height(*size);
                let broke = self.ensure_space(height);
                if broke && !header && self.options.repeat_header {
                    if let Some(Block::Row { cells, size, .. }) = self.last_header.clone() {
                        trace!("Repeating table header on page {}", self.content_pages);
                        self.draw_row(&cells, true, size);
                    }
                }
                self.draw_row(cells, *header, *size);
                if *header {
                    self.last_header = Some(block.clone());
                }
            }
        }
    }

    fn render_text(&mut self, text: &str, size: f32) {
        let line_height = size * LINE_HEIGHT_MULTIPLIER;
        for line in wrap_text_with_metrics(text, size, CONTENT_WIDTH, self.metrics.as_ref()) {
            self.ensure_space(line_height);
            self.cursor_y -= line_height;
            let baseline = self.cursor_y + (line_height - size);
            self.current
                .text(MARGIN_LEFT, baseline, size, &line, Color::black());
            self.page_has_content = true;
        }
    }

    fn draw_row(&mut self, cells: &[String; 3], header: bool, size: f32) {
        let height = row_height(size);
        let bottom = self.cursor_y - height;

        match self.stripes.advance(header, self.options.row_striping) {
            RowShade::Header => {
                self.current
                    .fill_rect(MARGIN_LEFT, bottom, CONTENT_WIDTH, height, Color::header_band());
            }
            RowShade::Shaded => {
                self.current
                    .fill_rect(MARGIN_LEFT, bottom, CONTENT_WIDTH, height, Color::stripe());
            }
            RowShade::Plain => {}
        }

        let baseline = bottom + ROW_PADDING / 2.0 + size * 0.25;
        self.current.text(
            COL_CLIENT_LEFT + CELL_INSET,
            baseline,
            size,
            &cells[0],
            Color::black(),
        );
        let hours_x = self.right_aligned_x(&cells[1], size, COL_HOURS_LEFT, COL_HOURS_RIGHT);
        self.current
            .text(hours_x, baseline, size, &cells[1], Color::black());
        let amount_x = self.right_aligned_x(&cells[2], size, COL_AMOUNT_LEFT, COL_AMOUNT_RIGHT);
        self.current
            .text(amount_x, baseline, size, &cells[2], Color::black());

        self.cursor_y = bottom;
        self.page_has_content = true;
    }

    fn right_aligned_x(&self, text: &str, size: f32, left: f32, right: f32) -> f32 {
        right_aligned_x(text, size, left, right, self.metrics.as_ref())
    }

    /// Break the page when `height` more points would cross the bottom
    /// margin. Returns whether a break happened.
    fn ensure_space(&mut self, height: f32) -> bool {
        if self.cursor_y - height < BOTTOM_MARGIN && self.page_has_content {
            self.seal_page();
            self.open_page();
            return true;
        }
        false
    }

    fn open_page(&mut self) {
        self.content_pages += 1;
        self.current = ContentBuilder::new();
        self.current.fill_rect(
            0.0,
            PAGE_HEIGHT - BANNER_HEIGHT,
            PAGE_WIDTH,
            BANNER_HEIGHT,
            Color::banner(),
        );
        let title_y = PAGE_HEIGHT - BANNER_HEIGHT + (BANNER_HEIGHT - BANNER_FONT_SIZE) / 2.0 + 4.0;
        self.current.text(
            MARGIN_LEFT,
            title_y,
            BANNER_FONT_SIZE,
            &self.title,
            Color::white(),
        );
        self.cursor_y = content_top();
        self.page_has_content = false;
        trace!("Opened content page {}", self.content_pages);
    }

    fn seal_page(&mut self) {
        let footer_color = Color::gray(0.4);
        self.current.text(
            MARGIN_LEFT,
            FOOTER_Y,
            FOOTER_FONT_SIZE,
            &format!("Generated {}", self.timestamp),
            footer_color,
        );
        self.current.text_raw(
            FOOTER_PAGE_X,
            FOOTER_Y,
            FOOTER_FONT_SIZE,
            &page_footer_literal(),
            footer_color,
        );

        let content = std::mem::take(&mut self.current).finish();
        trace!(
            "Sealed content page {} ({} bytes)",
            self.content_pages,
            content.len()
        );
        self.pages
            .push(PageStream::content(content, self.content_pages));
    }
}

/// Literal body of the "Page N of M" footer before substitution
pub fn page_footer_literal() -> String {
    format!("Page {PAGE_NUMBER_TOKEN} of {PAGE_TOTAL_TOKEN}")
}

/// Timestamp format shown in every footer
pub fn format_timestamp(generated_at: &DateTime<Utc>) -> String {
    generated_at.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Left edge for text right-aligned at `right`, never left of `left`
pub fn right_aligned_x(
    text: &str,
    size: f32,
    left: f32,
    right: f32,
    metrics: &dyn FontMetrics,
) -> f32 {
    (right - CELL_INSET - metrics.text_width(text, size)).max(left)
}

/// Height of a table row at the given font size
pub fn row_height(size: f32) -> f32 {
    size * 1.2 + ROW_PADDING
}

fn content_top() -> f32 {
    PAGE_HEIGHT - BANNER_HEIGHT - BANNER_GAP
}

/// Lay out blocks with default metrics
pub fn paginate(
    blocks: &BlockList,
    cover: Option<&CoverDescriptor>,
    title: &str,
    options: FlowOptions,
    generated_at: DateTime<Utc>,
) -> Vec<PageStream> {
    PageFlow::new(title, generated_at)
        .with_options(options)
        .paginate(blocks, cover)
}
