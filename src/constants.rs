//! Constants for page geometry, layout metrics and deferred footer tokens

/// US Letter page width in points
pub const PAGE_WIDTH: f32 = 612.0;

/// US Letter page height in points
pub const PAGE_HEIGHT: f32 = 792.0;

/// Left page margin in points
pub const MARGIN_LEFT: f32 = 50.0;

/// Right page margin in points
pub const MARGIN_RIGHT: f32 = 50.0;

/// Content must stay above this line; crossing it forces a page break
pub const BOTTOM_MARGIN: f32 = 60.0;

/// Width available to wrapped paragraph text
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;

/// Height of the banner band drawn across the top of every content page
pub const BANNER_HEIGHT: f32 = 56.0;

/// Font size of the banner title
pub const BANNER_FONT_SIZE: f32 = 18.0;

/// Gap between the banner and the first line of content
pub const BANNER_GAP: f32 = 24.0;

/// Baseline of the footer line
pub const FOOTER_Y: f32 = 30.0;

/// Footer font size
pub const FOOTER_FONT_SIZE: f32 = 8.0;

/// X position of the "Page N of M" footer text
pub const FOOTER_PAGE_X: f32 = PAGE_WIDTH - MARGIN_RIGHT - 70.0;

/// Average character width as a fraction of font size
/// (the built-in font has no metrics table here)
pub const DEFAULT_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Line height multiplier for paragraph text
pub const LINE_HEIGHT_MULTIPLIER: f32 = 1.35;

/// Vertical padding added to a table row beyond its text line height
pub const ROW_PADDING: f32 = 8.0;

/// Horizontal inset of cell text from its column edge
pub const CELL_INSET: f32 = 6.0;

/// Left edge of the first (client) column
pub const COL_CLIENT_LEFT: f32 = MARGIN_LEFT;

/// Fixed left edge of the hours column
pub const COL_HOURS_LEFT: f32 = 330.0;

/// Fixed right edge of the hours column
pub const COL_HOURS_RIGHT: f32 = 440.0;

/// Fixed left edge of the amount column
pub const COL_AMOUNT_LEFT: f32 = 450.0;

/// Fixed right edge of the amount column
pub const COL_AMOUNT_RIGHT: f32 = PAGE_WIDTH - MARGIN_RIGHT;

/// Cover title font size
pub const COVER_TITLE_SIZE: f32 = 28.0;

/// Cover subtitle font size
pub const COVER_SUBTITLE_SIZE: f32 = 14.0;

/// Title used when no company name is supplied
pub const DEFAULT_REPORT_TITLE: &str = "Weekly AI Report";

/// Deferred token for the 1-based content page index
pub const PAGE_NUMBER_TOKEN: &str = "{{page}}";

/// Deferred token for the total number of content pages
pub const PAGE_TOTAL_TOKEN: &str = "{{pages}}";

/// Resource name of the single built-in font
pub const FONT_RESOURCE: &str = "F1";

/// PostScript name of the single built-in font
pub const BASE_FONT: &str = "Helvetica";
