//! Font metrics estimation and text encoding for the built-in font

use crate::constants::DEFAULT_CHAR_WIDTH_RATIO;

/// Trait for measuring text dimensions and encoding text for PDF rendering.
///
/// Layout code measures through this trait so a real metrics table can be
/// swapped in without touching the wrapper or the flow engine.
pub trait FontMetrics {
    /// Width of a single character in points at the given font size
    fn char_width(&self, ch: char, font_size: f32) -> f32;

    /// Total width of a string in points at the given font size
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().map(|ch| self.char_width(ch, font_size)).sum()
    }

    /// Encode text into the byte values shown by the Tj operator
    fn encode_text(&self, text: &str) -> Vec<u8>;
}

/// Constant-advance approximation of Helvetica.
///
/// Every character is assumed to be `ratio * font_size` wide. Wide strings
/// can overrun their estimate; callers rely on the estimate being stable, not
/// exact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatedMetrics {
    pub ratio: f32,
}

impl EstimatedMetrics {
    /// Create metrics with a custom width ratio
    pub fn with_ratio(ratio: f32) -> Self {
        Self { ratio }
    }
}

impl Default for EstimatedMetrics {
    fn default() -> Self {
        Self {
            ratio: DEFAULT_CHAR_WIDTH_RATIO,
        }
    }
}

impl FontMetrics for EstimatedMetrics {
    fn char_width(&self, _ch: char, font_size: f32) -> f32 {
        font_size * self.ratio
    }

    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * self.ratio
    }

    fn encode_text(&self, text: &str) -> Vec<u8> {
        text.chars().map(win_ansi_byte).collect()
    }
}

/// Estimate text width with the default metrics
pub fn estimate_text_width(text: &str, font_size: f32) -> f32 {
    EstimatedMetrics::default().text_width(text, font_size)
}

/// Map a character to its WinAnsiEncoding code, `?` when it has none
pub fn win_ansi_byte(ch: char) -> u8 {
    let code = ch as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => code as u8,
        0x09 | 0x0A | 0x0D => b' ',
        _ => match ch {
            '\u{20AC}' => 0x80,
            '\u{201A}' => 0x82,
            '\u{0192}' => 0x83,
            '\u{201E}' => 0x84,
            '\u{2026}' => 0x85,
            '\u{2020}' => 0x86,
            '\u{2021}' => 0x87,
            '\u{02C6}' => 0x88,
            '\u{2030}' => 0x89,
            '\u{0160}' => 0x8A,
            '\u{2039}' => 0x8B,
            '\u{0152}' => 0x8C,
            '\u{017D}' => 0x8E,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{02DC}' => 0x98,
            '\u{2122}' => 0x99,
            '\u{0161}' => 0x9A,
            '\u{203A}' => 0x9B,
            '\u{0153}' => 0x9C,
            '\u{017E}' => 0x9E,
            '\u{0178}' => 0x9F,
            // narrow no-break space used by some locales as a group separator
            '\u{202F}' => 0xA0,
            _ => b'?',
        },
    }
}
