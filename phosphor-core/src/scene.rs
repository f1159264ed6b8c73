//! Scene composition
//!
//! A scene is an ordered, bounded container of visual elements owned by
//! the process. The panel driver borrows it at attach time and samples
//! the elements into its framebuffer; attaching transfers no ownership.

use heapless::Vec;

use crate::color::rgb565_to_rgb888;
use crate::error::BringupError;

/// Hard cap on elements per scene
pub const MAX_SCENE_ELEMENTS: usize = 10;

/// Pixel encoding of decoded bitmap data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelFormat {
    /// 16-bit RGB565, big-endian byte order
    Rgb565BigEndian,
    /// 24-bit RGB, one byte per component
    Rgb888,
}

impl PixelFormat {
    /// Bytes occupied by one pixel
    pub const fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Rgb565BigEndian => 2,
            PixelFormat::Rgb888 => 3,
        }
    }
}

/// Visual element backed by decoded bitmap data
///
/// The pixel buffer is borrowed from the process (decoded bitmaps
/// outlive the scene); the format selects the color-conversion function
/// applied when sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageElement<'a> {
    width: u16,
    height: u16,
    format: PixelFormat,
    data: &'a [u8],
}

impl<'a> ImageElement<'a> {
    /// Wrap decoded bitmap data
    ///
    /// Fails with `ImageDecodeFailure` if the dimensions are zero or
    /// the buffer does not hold exactly `width * height` pixels.
    pub fn new(
        width: u16,
        height: u16,
        format: PixelFormat,
        data: &'a [u8],
    ) -> Result<Self, BringupError> {
        if width == 0 || height == 0 {
            return Err(BringupError::ImageDecodeFailure);
        }
        let expected = width as usize * height as usize * format.bytes_per_pixel();
        if data.len() != expected {
            return Err(BringupError::ImageDecodeFailure);
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// Element width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Element height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Sample one pixel as 24-bit `0xRRGGBB`
    pub fn pixel(&self, x: u16, y: u16) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * self.format.bytes_per_pixel();
        match self.format {
            PixelFormat::Rgb565BigEndian => {
                let raw = u16::from_be_bytes([self.data[idx], self.data[idx + 1]]);
                Some(rgb565_to_rgb888(raw))
            }
            PixelFormat::Rgb888 => {
                let [r, g, b] = [self.data[idx], self.data[idx + 1], self.data[idx + 2]];
                Some(u32::from_be_bytes([0, r, g, b]))
            }
        }
    }
}

/// Fixed color lookup table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Palette<const N: usize> {
    colors: [u32; N],
}

impl<const N: usize> Palette<N> {
    /// Build a palette from 24-bit `0xRRGGBB` entries
    pub const fn new(colors: [u32; N]) -> Self {
        Self { colors }
    }

    /// Look up a palette entry
    pub fn get(&self, index: usize) -> Option<u32> {
        self.colors.get(index).copied()
    }

    /// Number of entries
    pub const fn len(&self) -> usize {
        N
    }

    /// Whether the palette has no entries
    pub const fn is_empty(&self) -> bool {
        N == 0
    }
}

/// Visual element filling a rectangular region from a 1-entry palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SolidElement {
    x: u16,
    y: u16,
    width: u16,
    height: u16,
    palette: Palette<1>,
}

impl SolidElement {
    /// Solid rectangle at the origin
    pub const fn new(width: u16, height: u16, palette: Palette<1>) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
            palette,
        }
    }

    /// Move the rectangle to the given panel position
    pub const fn at(mut self, x: u16, y: u16) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Element width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Element height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Sample one pixel as 24-bit `0xRRGGBB`
    ///
    /// Every in-bounds pixel samples to palette entry 0.
    pub fn pixel(&self, x: u16, y: u16) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.palette.get(0)
    }
}

/// A renderable scene element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualElement<'a> {
    /// Decoded bitmap
    Image(ImageElement<'a>),
    /// Flat-color rectangle
    Solid(SolidElement),
}

impl VisualElement<'_> {
    /// Element dimensions in pixels
    pub fn size(&self) -> (u16, u16) {
        match self {
            VisualElement::Image(image) => (image.width(), image.height()),
            VisualElement::Solid(solid) => (solid.width(), solid.height()),
        }
    }

    /// Element position on the panel
    pub fn position(&self) -> (u16, u16) {
        match self {
            // Images compose at the origin
            VisualElement::Image(_) => (0, 0),
            VisualElement::Solid(solid) => (solid.x, solid.y),
        }
    }

    /// Sample one element-local pixel as 24-bit `0xRRGGBB`
    pub fn pixel(&self, x: u16, y: u16) -> Option<u32> {
        match self {
            VisualElement::Image(image) => image.pixel(x, y),
            VisualElement::Solid(solid) => solid.pixel(x, y),
        }
    }
}

/// Ordered, bounded container of visual elements
pub struct Scene<'a> {
    elements: Vec<VisualElement<'a>, MAX_SCENE_ELEMENTS>,
    max_elements: usize,
}

impl<'a> Scene<'a> {
    /// Create an empty scene holding at most `max_elements`
    ///
    /// The configured maximum is capped at [`MAX_SCENE_ELEMENTS`].
    pub fn new(max_elements: usize) -> Self {
        Self {
            elements: Vec::new(),
            max_elements: max_elements.min(MAX_SCENE_ELEMENTS),
        }
    }

    /// Append an element
    ///
    /// Fails with `SceneOverflow` past the configured maximum.
    pub fn push(&mut self, element: VisualElement<'a>) -> Result<(), BringupError> {
        if self.elements.len() >= self.max_elements {
            return Err(BringupError::SceneOverflow);
        }
        self.elements
            .push(element)
            .map_err(|_| BringupError::SceneOverflow)
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the scene holds no elements
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Configured element maximum
    pub fn max_elements(&self) -> usize {
        self.max_elements
    }

    /// The element at `index`, if present
    pub fn element(&self, index: usize) -> Option<&VisualElement<'a>> {
        self.elements.get(index)
    }

    /// Iterate the elements in composition order
    pub fn elements(&self) -> impl Iterator<Item = &VisualElement<'a>> {
        self.elements.iter()
    }
}
