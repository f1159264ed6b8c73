//! ST7735 TFT panel driver
//!
//! Drives ST7735/ST7735R panels over blocking SPI with a dedicated
//! data/command pin and a reset pin. The driver owns a framebuffer
//! sized for the controller's full RAM and translates scene composition
//! into the controller's command stream.
//!
//! Controller communication is synchronous: every command blocks until
//! the bus transaction completes.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use phosphor_core::color::rgb888_to_rgb565;
use phosphor_core::geometry::{ColorOrder, PanelGeometry, PanelLimits};
use phosphor_core::phase::{BringupEvent, BringupPhase};
use phosphor_core::scene::Scene;
use phosphor_core::wiring::{init_ops, validate_sequence};

/// Addressable frame of the ST7735 controller
pub const ST7735_LIMITS: PanelLimits = PanelLimits {
    max_width: 132,
    max_height: 162,
};

/// Framebuffer sized for the full controller RAM at 2 bytes per pixel
const BUF_SIZE: usize = 132 * 162 * 2;

/// Reset pulse width and settle time
const RESET_PULSE_MS: u32 = 10;
const RESET_SETTLE_MS: u32 = 10;

/// ST7735 commands
#[allow(dead_code)]
mod cmd {
    pub const NOP: u8 = 0x00;
    pub const SWRESET: u8 = 0x01;
    pub const SLPIN: u8 = 0x10;
    pub const SLPOUT: u8 = 0x11;
    pub const NORON: u8 = 0x13;
    pub const INVOFF: u8 = 0x20;
    pub const INVON: u8 = 0x21;
    pub const DISPOFF: u8 = 0x28;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;
    pub const FRMCTR1: u8 = 0xB1;
    pub const FRMCTR2: u8 = 0xB2;
    pub const FRMCTR3: u8 = 0xB3;
    pub const INVCTR: u8 = 0xB4;
    pub const PWCTR1: u8 = 0xC0;
    pub const PWCTR2: u8 = 0xC1;
    pub const PWCTR3: u8 = 0xC2;
    pub const PWCTR4: u8 = 0xC3;
    pub const PWCTR5: u8 = 0xC4;
    pub const VMCTR1: u8 = 0xC5;
    pub const GMCTRP1: u8 = 0xE0;
    pub const GMCTRN1: u8 = 0xE1;
}

/// MADCTL BGR color order bit
const MADCTL_BGR: u8 = 0x08;

/// Panel driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelError<E> {
    /// Bus transaction failed
    Comm(E),
    /// Data/command or reset pin failed
    Pin,
    /// Operation requires an initialized controller
    NotReady,
    /// Canned init sequence is structurally invalid
    InvalidSequence,
}

/// ST7735 panel driver
///
/// Bound to one wiring binding (SPI device with chip-select, dc pin,
/// reset pin) and one geometry. Constructed once per bring-up, after
/// the display claim is taken.
pub struct St7735<SPI, DC, RST> {
    spi: SPI,
    dc: DC,
    rst: RST,
    geometry: PanelGeometry,
    phase: BringupPhase,
    buffer: [u8; BUF_SIZE],
}

impl<SPI, DC, RST> St7735<SPI, DC, RST>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
{
    /// Create a driver over a claimed bus
    pub fn new(spi: SPI, dc: DC, rst: RST, geometry: PanelGeometry) -> Self {
        Self {
            spi,
            dc,
            rst,
            geometry,
            phase: BringupPhase::Claimed,
            buffer: [0; BUF_SIZE],
        }
    }

    /// Panel geometry
    pub fn geometry(&self) -> &PanelGeometry {
        &self.geometry
    }

    /// Current bring-up phase
    pub fn phase(&self) -> BringupPhase {
        self.phase
    }

    /// Pixel bytes of the visible frame
    pub fn frame_data(&self) -> &[u8] {
        &self.buffer[..self.geometry.pixel_count() * 2]
    }

    /// Pulse the reset pin through its timing window
    pub fn hard_reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), PanelError<SPI::Error>> {
        self.rst.set_high().map_err(|_| PanelError::Pin)?;
        delay.delay_ms(RESET_PULSE_MS);
        self.rst.set_low().map_err(|_| PanelError::Pin)?;
        delay.delay_ms(RESET_PULSE_MS);
        self.rst.set_high().map_err(|_| PanelError::Pin)?;
        delay.delay_ms(RESET_SETTLE_MS);
        Ok(())
    }

    /// Send one command with parameters
    fn command(&mut self, opcode: u8, params: &[u8]) -> Result<(), PanelError<SPI::Error>> {
        self.dc.set_low().map_err(|_| PanelError::Pin)?;
        self.spi.write(&[opcode]).map_err(PanelError::Comm)?;
        if !params.is_empty() {
            self.dc.set_high().map_err(|_| PanelError::Pin)?;
            self.spi.write(params).map_err(PanelError::Comm)?;
        }
        Ok(())
    }

    /// Reset the controller and run the built-in ST7735R init table
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), PanelError<SPI::Error>> {
        self.hard_reset(delay)?;

        let madctl = match self.geometry.color_order {
            ColorOrder::Rgb => 0x00,
            ColorOrder::Bgr => MADCTL_BGR,
        };

        let sequence: &[(u8, &[u8], u32)] = &[
            (cmd::SWRESET, &[], 200),
            (cmd::SLPOUT, &[], 200),
            (cmd::FRMCTR1, &[0x01, 0x2C, 0x2D], 0),
            (cmd::FRMCTR2, &[0x01, 0x2C, 0x2D], 0),
            (cmd::FRMCTR3, &[0x01, 0x2C, 0x2D, 0x01, 0x2C, 0x2D], 0),
            (cmd::INVCTR, &[0x07], 0),
            (cmd::PWCTR1, &[0xA2, 0x02, 0x84], 0),
            (cmd::PWCTR2, &[0xC5], 0),
            (cmd::PWCTR3, &[0x0A, 0x00], 0),
            (cmd::PWCTR4, &[0x8A, 0x2A], 0),
            (cmd::PWCTR5, &[0x8A, 0xEE], 0),
            (cmd::VMCTR1, &[0x0E], 0),
            (cmd::INVOFF, &[], 0),
            (cmd::MADCTL, &[madctl], 0),
            (cmd::COLMOD, &[0x05], 0),
            (cmd::NORON, &[], 10),
            (cmd::DISPON, &[], 200),
        ];

        for &(opcode, params, delay_ms) in sequence {
            self.command(opcode, params)?;
            if delay_ms > 0 {
                delay.delay_ms(delay_ms);
            }
        }

        self.phase = self.phase.transition(BringupEvent::ControllerReady);
        Ok(())
    }

    /// Reset the controller and transmit a canned init sequence
    ///
    /// The sequence bytes go out unmodified: each decoded entry's
    /// opcode and parameters are sent as command and data, observing
    /// the entry's delay. Used for controllers wired without a known
    /// init table (see `phosphor_core::wiring::CommandSource`).
    pub fn init_with_sequence<D: DelayNs>(
        &mut self,
        delay: &mut D,
        sequence: &[u8],
    ) -> Result<(), PanelError<SPI::Error>> {
        validate_sequence(sequence).map_err(|_| PanelError::InvalidSequence)?;
        self.hard_reset(delay)?;

        for op in init_ops(sequence) {
            self.command(op.opcode, op.params)?;
            if op.delay_ms > 0 {
                delay.delay_ms(op.delay_ms);
            }
        }

        self.phase = self.phase.transition(BringupEvent::ControllerReady);
        Ok(())
    }

    /// Program the RAM window for the visible frame
    fn set_address_window(
        &mut self,
        sx: u16,
        sy: u16,
        ex: u16,
        ey: u16,
    ) -> Result<(), PanelError<SPI::Error>> {
        let cs = (sx + self.geometry.col_start).to_be_bytes();
        let ce = (ex + self.geometry.col_start).to_be_bytes();
        let rs = (sy + self.geometry.row_start).to_be_bytes();
        let re = (ey + self.geometry.row_start).to_be_bytes();
        self.command(cmd::CASET, &[cs[0], cs[1], ce[0], ce[1]])?;
        self.command(cmd::RASET, &[rs[0], rs[1], re[0], re[1]])
    }

    /// Write one RGB565 pixel into the framebuffer
    pub fn set_pixel(&mut self, x: u16, y: u16, color: u16) {
        if x >= self.geometry.width || y >= self.geometry.height {
            return;
        }
        let idx = (y as usize * self.geometry.width as usize + x as usize) * 2;
        let bytes = color.to_be_bytes();
        self.buffer[idx] = bytes[0];
        self.buffer[idx + 1] = bytes[1];
    }

    /// Stream the framebuffer to the panel
    pub fn flush(&mut self) -> Result<(), PanelError<SPI::Error>> {
        let (width, height) = (self.geometry.width, self.geometry.height);
        self.set_address_window(0, 0, width - 1, height - 1)?;
        self.command(cmd::RAMWR, &[])?;
        self.dc.set_high().map_err(|_| PanelError::Pin)?;
        let len = self.geometry.pixel_count() * 2;
        self.spi.write(&self.buffer[..len]).map_err(PanelError::Comm)
    }

    /// Attach a scene: compose its elements and start showing them
    ///
    /// This is the point the physical panel begins refreshing from the
    /// scene's contents. The scene stays owned by the caller.
    pub fn show(&mut self, scene: &Scene<'_>) -> Result<(), PanelError<SPI::Error>> {
        if !matches!(
            self.phase,
            BringupPhase::Initialized | BringupPhase::ShowingScene
        ) {
            return Err(PanelError::NotReady);
        }

        for element in scene.elements() {
            let (ex, ey) = element.position();
            let (width, height) = element.size();
            for y in 0..height {
                for x in 0..width {
                    // Pixels past the u16 coordinate space fall off the panel
                    let (px, py) = match (ex.checked_add(x), ey.checked_add(y)) {
                        (Some(px), Some(py)) => (px, py),
                        _ => continue,
                    };
                    if let Some(rgb) = element.pixel(x, y) {
                        self.set_pixel(px, py, rgb888_to_rgb565(rgb));
                    }
                }
            }
        }

        self.flush()?;
        self.phase = self.phase.transition(BringupEvent::SceneAttached);
        Ok(())
    }
}

extern crate embedded_graphics_core;
use embedded_graphics_core::{
    draw_target::DrawTarget,
    pixelcolor::{
        raw::{RawData, RawU16},
        Rgb565,
    },
    prelude::*,
};

impl<SPI, DC, RST> DrawTarget for St7735<SPI, DC, RST>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
{
    type Error = core::convert::Infallible;
    type Color = Rgb565;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        // set_pixel drops coordinates past the visible frame
        for Pixel(pos, color) in pixels {
            if let (Ok(x), Ok(y)) = (u16::try_from(pos.x), u16::try_from(pos.y)) {
                self.set_pixel(x, y, RawU16::from(color).into_inner());
            }
        }

        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let raw = RawU16::from(color).into_inner().to_be_bytes();
        let len = self.geometry.pixel_count() * 2;
        for (i, byte) in self.buffer[..len].iter_mut().enumerate() {
            *byte = raw[i % 2];
        }
        Ok(())
    }
}

impl<SPI, DC, RST> OriginDimensions for St7735<SPI, DC, RST>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
{
    fn size(&self) -> Size {
        Size::new(self.geometry.width as u32, self.geometry.height as u32)
    }
}
