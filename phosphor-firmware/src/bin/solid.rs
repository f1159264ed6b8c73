//! Solid-fill bring-up scenario
//!
//! Drives a 128x128 ST7735R over SPI0 using a canned initialization
//! sequence and fills the panel red from a one-entry palette.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::spi::{self, Spi};
use embedded_hal_bus::spi::ExclusiveDevice;
use {defmt_rtt as _, panic_probe as _};

use phosphor_core::bus::{BusHandle, BusId, DisplayClaimRegistry};
use phosphor_core::geometry::PanelGeometry;
use phosphor_core::scene::{Palette, Scene, SolidElement, VisualElement};
use phosphor_core::wiring::{PinId, WiringDescriptor};
use phosphor_drivers::bring_up;

const WIDTH: u16 = 128;
const HEIGHT: u16 = 128;
const SPI_FREQUENCY: u32 = 16_000_000;

/// ST7735R wrap-up: negative gamma correction, then sleep-out and
/// display-on with 120 ms settle delays
const INIT_SEQUENCE: &[u8] = &[
    0xE1, 0x0F, 0x00, 0x0E, 0x14, 0x03, 0x11, 0x07, 0x31, 0xC1, 0x48, 0x08, 0x0F, 0x0C, 0x31,
    0x36, 0x0F, // GMCTRN1
    0x11, 0x80, 0x78, // SLPOUT + 120 ms
    0x29, 0x80, 0x78, // DISPON + 120 ms
];

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Phosphor solid-fill scenario starting...");

    let p = embassy_rp::init(Default::default());

    let mut spi_config = spi::Config::default();
    spi_config.frequency = SPI_FREQUENCY;
    let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config);

    let cs = Output::new(p.PIN_5, Level::High);
    let dc = Output::new(p.PIN_9, Level::Low);
    let rst = Output::new(p.PIN_3, Level::Low);

    let spi_device = match ExclusiveDevice::new_no_delay(spi, cs) {
        Ok(device) => device,
        Err(_) => defmt::panic!("SPI device setup failed"),
    };

    info!("SPI0 initialized at {} Hz", SPI_FREQUENCY);

    let wiring = match WiringDescriptor::with_init_sequence(PinId(5), INIT_SEQUENCE, PinId(3)) {
        Ok(wiring) => wiring,
        Err(_) => defmt::panic!("canned init sequence rejected"),
    };
    let geometry = PanelGeometry::new(WIDTH, HEIGHT);

    let palette = Palette::new([0xFF0000]);
    let mut scene = Scene::new(10);
    if scene
        .push(VisualElement::Solid(SolidElement::new(WIDTH, HEIGHT, palette)))
        .is_err()
    {
        defmt::panic!("scene rejected the solid fill");
    }

    let mut registry = DisplayClaimRegistry::new();
    let bus = BusHandle::new(BusId(0));

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

    info!("Panel showing solid fill, phase {}", panel.phase());

    // Static content - nothing left to do
    core::future::pending::<()>().await;
}
