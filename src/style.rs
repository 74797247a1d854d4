//! Colors and per-request flow switches

/// RGB color representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values should be 0.0-1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// White color
    pub fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }

    /// Gray color
    pub fn gray(level: f32) -> Self {
        let l = level.clamp(0.0, 1.0);
        Self::rgb(l, l, l)
    }

    /// Fill behind the page banner and the cover title band
    pub fn banner() -> Self {
        Self::rgb(0.13, 0.22, 0.38)
    }

    /// Fill behind table header rows
    pub fn header_band() -> Self {
        Self::gray(0.82)
    }

    /// Fill behind shaded (odd) striped rows
    pub fn stripe() -> Self {
        Self::gray(0.94)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// Switches that change how the page flow engine treats tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowOptions {
    /// Redraw the last table header row at the top of a page when a table
    /// continues across a page break
    pub repeat_header: bool,
    /// Shade every other non-header table row
    pub row_striping: bool,
}

impl FlowOptions {
    /// Create options with both switches enabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable header repetition
    pub fn with_repeat_header(mut self, repeat: bool) -> Self {
        self.repeat_header = repeat;
        self
    }

    /// Enable or disable row striping
    pub fn with_row_striping(mut self, striping: bool) -> Self {
        self.row_striping = striping;
        self
    }
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            repeat_header: true,
            row_striping: true,
        }
    }
}
