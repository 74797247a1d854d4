//! Content-stream operators for text and filled rectangles

use crate::constants::FONT_RESOURCE;
use crate::font::win_ansi_byte;
use crate::style::Color;
use std::fmt::Write;

/// Accumulates the drawing operators of one page
#[derive(Debug, Clone, Default)]
pub struct ContentBuilder {
    ops: String,
}

impl ContentBuilder {
    /// Create an empty content stream
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a filled rectangle with its lower-left corner at (x, y)
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.set_fill_color(color);
        let _ = writeln!(
            self.ops,
            "{} {} {} {} re\nf",
            fmt_num(x),
            fmt_num(y),
            fmt_num(width),
            fmt_num(height)
        );
    }

    /// Draw a single left-aligned line of text with its baseline at y
    pub fn text(&mut self, x: f32, y: f32, size: f32, text: &str, color: Color) {
        self.show_literal(x, y, size, &escape_text(text), color);
    }

    /// Draw a line whose literal body is already escaped.
    ///
    /// Used for footers that carry deferred tokens, which must reach the
    /// stream verbatim so they can be substituted later.
    pub fn text_raw(&mut self, x: f32, y: f32, size: f32, literal: &str, color: Color) {
        self.show_literal(x, y, size, literal, color);
    }

    fn show_literal(&mut self, x: f32, y: f32, size: f32, literal: &str, color: Color) {
        self.ops.push_str("BT\n");
        let _ = writeln!(self.ops, "/{} {} Tf", FONT_RESOURCE, fmt_num(size));
        self.set_fill_color(color);
        let _ = writeln!(self.ops, "{} {} Td", fmt_num(x), fmt_num(y));
        let _ = writeln!(self.ops, "({literal}) Tj");
        self.ops.push_str("ET\n");
    }

    fn set_fill_color(&mut self, color: Color) {
        let _ = writeln!(
            self.ops,
            "{} {} {} rg",
            fmt_num(color.r),
            fmt_num(color.g),
            fmt_num(color.b)
        );
    }

    /// Operators written so far
    pub fn as_str(&self) -> &str {
        &self.ops
    }

    /// Finish the stream and return its text
    pub fn finish(self) -> String {
        self.ops
    }
}

/// Escape text for a PDF literal string in WinAnsiEncoding.
///
/// Delimiters are backslash-escaped; braces, control characters and bytes
/// above 0x7E are written as octal escapes so the result is pure ASCII and
/// never contains a raw `{`, which is reserved for deferred tokens.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        let byte = win_ansi_byte(ch);
        match byte {
            b'(' | b')' | b'\\' => {
                escaped.push('\\');
                escaped.push(byte as char);
            }
            b'{' | b'}' | 0x00..=0x1F | 0x7F..=0xFF => {
                let _ = write!(escaped, "\\{byte:03o}");
            }
            _ => escaped.push(byte as char),
        }
    }
    escaped
}

/// Format a coordinate with at most two decimals and no trailing zeros
pub fn fmt_num(value: f32) -> String {
    let formatted = format!("{value:.2}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}
