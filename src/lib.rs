//! Paginated weekly-report PDFs without a PDF library
//!
//! This library lays a sequence of text and table blocks out onto fixed-size
//! pages and writes the result as a complete PDF file: object graph,
//! cross-reference table and trailer included. Footers carry "Page N of M",
//! where M is only known once layout has finished.

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

pub mod block;
pub mod constants;
pub mod cover;
pub mod document;
pub mod drawing;
pub mod error;
pub mod flow;
pub mod font;
pub mod format;
pub mod report;
pub mod request;
pub mod style;
pub mod text;
pub mod writer;

pub use block::{Block, BlockList};
pub use cover::CoverDescriptor;
pub use error::{ReportError, Result};
pub use flow::{PageFlow, PageStream};
pub use report::{ReportResponse, handle_get, handle_post};
pub use request::{Branding, ReportOptions, ReportRequest};
pub use style::{Color, FlowOptions};
pub use writer::SerializedDocument;

/// Extension trait for rendering a block list straight to PDF bytes
pub trait RenderPdf {
    /// Lay out and serialize with the given banner title and switches
    ///
    /// # Arguments
    /// * `title` - Title drawn in every content page's banner
    /// * `cover` - Optional unnumbered cover page
    /// * `options` - Header repetition and row striping switches
    /// * `generated_at` - Timestamp printed in every footer
    fn render_pdf(
        &self,
        title: &str,
        cover: Option<&CoverDescriptor>,
        options: FlowOptions,
        generated_at: DateTime<Utc>,
    ) -> SerializedDocument;
}

impl RenderPdf for BlockList {
    #[instrument(skip(self, cover, generated_at), fields(blocks = self.len()))]
    fn render_pdf(
        &self,
        title: &str,
        cover: Option<&CoverDescriptor>,
        options: FlowOptions,
        generated_at: DateTime<Utc>,
    ) -> SerializedDocument {
        let pages = PageFlow::new(title, generated_at)
            .with_options(options)
            .paginate(self, cover);
        debug!("Laid out {} pages", pages.len());
        writer::write_pdf(&pages)
    }
}
