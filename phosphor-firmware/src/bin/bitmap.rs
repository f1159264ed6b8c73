//! Bitmap bring-up scenario
//!
//! Drives a 128x160 ST7735 (BGR subpixel order) over SPI0 and shows a
//! full-screen splash bitmap decoded from a BMP embedded in flash.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::spi::{self, Spi};
use embedded_graphics::pixelcolor::{IntoStorage, Rgb565};
use embedded_hal_bus::spi::ExclusiveDevice;
use static_cell::StaticCell;
use tinybmp::Bmp;
use {defmt_rtt as _, panic_probe as _};

use phosphor_core::bus::{BusHandle, BusId, DisplayClaimRegistry};
use phosphor_core::geometry::{ColorOrder, PanelGeometry};
use phosphor_core::scene::{ImageElement, PixelFormat, Scene, VisualElement};
use phosphor_core::wiring::{PinId, WiringDescriptor};
use phosphor_drivers::bring_up;

const WIDTH: u16 = 128;
const HEIGHT: u16 = 160;
const SPI_FREQUENCY: u32 = 16_000_000;

/// Splash image embedded at compile time (RGB565 BMP)
const SPLASH_BMP: &[u8] = include_bytes!("../../assets/splash.bmp");

// Decoded frame must live for the program duration; the scene borrows it
static FRAME: StaticCell<[u8; WIDTH as usize * HEIGHT as usize * 2]> = StaticCell::new();

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Phosphor bitmap scenario starting...");

    let p = embassy_rp::init(Default::default());

    let mut spi_config = spi::Config::default();
    spi_config.frequency = SPI_FREQUENCY;
    let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config);

    let cs = Output::new(p.PIN_2, Level::High);
    let dc = Output::new(p.PIN_3, Level::Low);
    let rst = Output::new(p.PIN_4, Level::Low);

    let spi_device = match ExclusiveDevice::new_no_delay(spi, cs) {
        Ok(device) => device,
        Err(_) => defmt::panic!("SPI device setup failed"),
    };

    info!("SPI0 initialized at {} Hz", SPI_FREQUENCY);

    // Decode the BMP into a big-endian RGB565 frame
    let bmp: Bmp<'_, Rgb565> = match Bmp::from_slice(SPLASH_BMP) {
        Ok(bmp) => bmp,
        Err(_) => defmt::panic!("embedded splash BMP failed to decode"),
    };
    let frame = FRAME.init([0u8; WIDTH as usize * HEIGHT as usize * 2]);
    for pixel in bmp.pixels() {
        let (x, y) = (pixel.0.x, pixel.0.y);
        if x < 0 || y < 0 || x >= WIDTH as i32 || y >= HEIGHT as i32 {
            continue;
        }
        let idx = (y as usize * WIDTH as usize + x as usize) * 2;
        frame[idx..idx + 2].copy_from_slice(&pixel.1.into_storage().to_be_bytes());
    }

    info!("Splash bitmap decoded ({}x{})", WIDTH, HEIGHT);

    let image = match ImageElement::new(WIDTH, HEIGHT, PixelFormat::Rgb565BigEndian, frame) {
        Ok(image) => image,
        Err(_) => defmt::panic!("decoded frame rejected as image element"),
    };
    let mut scene = Scene::new(10);
    if scene.push(VisualElement::Image(image)).is_err() {
        defmt::panic!("scene rejected the splash image");
    }

    let mut registry = DisplayClaimRegistry::new();
    let bus = BusHandle::new(BusId(0));
    let wiring = WiringDescriptor::with_command_pin(PinId(2), PinId(3), PinId(4));
    let geometry = PanelGeometry::new(WIDTH, HEIGHT).with_color_order(ColorOrder::Bgr);

    let mut delay = embassy_time::Delay;
    let panel = match bring_up(
        &mut registry,
        &bus,
        &wiring,
        geometry,
        &scene,
        spi_device,
        dc,
        rst,
        &mut delay,
    ) {
        Ok(panel) => panel,
        Err(e) => defmt::panic!("display bring-up failed: {}", e),
    };

    info!("Panel showing splash, phase {}", panel.phase());

    // Static content - nothing left to do
    core::future::pending::<()>().await;
}
