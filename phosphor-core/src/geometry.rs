//! Panel geometry
//!
//! Describes the visible pixel region of a panel and where it sits in
//! the controller's RAM. Many ST7735 modules expose fewer pixels than
//! the controller addresses, hence the column/row start offsets.

use crate::error::BringupError;

/// Order of color components expected by the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorOrder {
    /// Red-green-blue component order
    #[default]
    Rgb,
    /// Blue-green-red component order (MADCTL BGR bit set)
    Bgr,
}

/// Maximum addressable frame for a given controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelLimits {
    /// Controller RAM width in pixels
    pub max_width: u16,
    /// Controller RAM height in pixels
    pub max_height: u16,
}

/// Panel geometry record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelGeometry {
    /// Visible width in pixels
    pub width: u16,
    /// Visible height in pixels
    pub height: u16,
    /// First visible column in controller RAM
    pub col_start: u16,
    /// First visible row in controller RAM
    pub row_start: u16,
    /// Component order of the pixel stream
    pub color_order: ColorOrder,
}

impl PanelGeometry {
    /// Create a geometry with no offsets and RGB color order
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            col_start: 0,
            row_start: 0,
            color_order: ColorOrder::Rgb,
        }
    }

    /// Set the column/row start offsets
    pub const fn with_offsets(mut self, col_start: u16, row_start: u16) -> Self {
        self.col_start = col_start;
        self.row_start = row_start;
        self
    }

    /// Set the color component order
    pub const fn with_color_order(mut self, color_order: ColorOrder) -> Self {
        self.color_order = color_order;
        self
    }

    /// Number of visible pixels
    pub const fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Validate against a controller's addressable frame
    ///
    /// Zero dimensions and frames that do not fit in controller RAM
    /// (including the start offsets) are rejected.
    pub fn validate(&self, limits: PanelLimits) -> Result<(), BringupError> {
        if self.width == 0 || self.height == 0 {
            return Err(BringupError::InvalidGeometry);
        }
        let end_col = self.col_start.checked_add(self.width);
        let end_row = self.row_start.checked_add(self.height);
        match (end_col, end_row) {
            (Some(c), Some(r)) if c <= limits.max_width && r <= limits.max_height => Ok(()),
            _ => Err(BringupError::InvalidGeometry),
        }
    }
}
