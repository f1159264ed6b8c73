//! Display bring-up orchestration
//!
//! The ordered contract for taking a claimed bus to a live panel:
//!
//! 1. Release any existing display claim (idempotent).
//! 2. Claim the bus and validate the bus-wiring binding.
//! 3. Validate geometry, construct the panel driver, reset and
//!    initialize the controller (built-in table or canned sequence).
//! 4. Attach the scene.
//!
//! On any failure after the claim is taken, the claim is released
//! before the error propagates: a failed bring-up never leaves the bus
//! half-claimed.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use phosphor_core::bus::{BusHandle, DisplayClaimRegistry};
use phosphor_core::error::BringupError;
use phosphor_core::geometry::PanelGeometry;
use phosphor_core::scene::Scene;
use phosphor_core::wiring::{CommandSource, WiringDescriptor};

use crate::st7735::{St7735, ST7735_LIMITS};

/// Bring up an ST7735 panel and attach a scene
///
/// Returns the live driver in phase `ShowingScene`; for static content
/// no further action is needed. The scene stays owned by the caller.
#[allow(clippy::too_many_arguments)]
pub fn bring_up<SPI, DC, RST, D>(
    registry: &mut DisplayClaimRegistry,
    bus: &BusHandle,
    wiring: &WiringDescriptor,
    geometry: PanelGeometry,
    scene: &Scene<'_>,
    spi: SPI,
    dc: DC,
    rst: RST,
    delay: &mut D,
) -> Result<St7735<SPI, DC, RST>, BringupError>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    D: DelayNs,
{
    registry.release_all();
    registry.claim(bus)?;

    match init_claimed(wiring, geometry, scene, spi, dc, rst, delay) {
        Ok(panel) => Ok(panel),
        Err(e) => {
            registry.release_all();
            Err(e)
        }
    }
}

/// Steps 2-4, run with the claim held
fn init_claimed<SPI, DC, RST, D>(
    wiring: &WiringDescriptor,
    geometry: PanelGeometry,
    scene: &Scene<'_>,
    spi: SPI,
    dc: DC,
    rst: RST,
    delay: &mut D,
) -> Result<St7735<SPI, DC, RST>, BringupError>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    D: DelayNs,
{
    wiring.validate()?;
    geometry.validate(ST7735_LIMITS)?;

    let mut panel = St7735::new(spi, dc, rst, geometry);
    match &wiring.command {
        CommandSource::Pin(_) => panel.init(delay),
        CommandSource::Sequence(sequence) => panel.init_with_sequence(delay, sequence),
    }
    .map_err(|_| BringupError::ControllerInitFailure)?;

    panel
        .show(scene)
        .map_err(|_| BringupError::ControllerInitFailure)?;

    Ok(panel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::spi::{ErrorType, Operation};
    use phosphor_core::bus::BusId;
    use phosphor_core::geometry::ColorOrder;
    use phosphor_core::phase::BringupPhase;
    use phosphor_core::scene::{
        ImageElement, Palette, PixelFormat, Scene, SolidElement, VisualElement,
    };
    use phosphor_core::wiring::PinId;

    struct MockSpi {
        written: Vec<u8>,
    }

    impl MockSpi {
        fn new() -> Self {
            Self {
                written: Vec::new(),
            }
        }
    }

    impl ErrorType for MockSpi {
        type Error = Infallible;
    }

    impl SpiDevice for MockSpi {
        fn transaction(
            &mut self,
            operations: &mut [Operation<'_, u8>],
        ) -> Result<(), Self::Error> {
            for op in operations {
                if let Operation::Write(bytes) = op {
                    self.written.extend_from_slice(bytes);
                }
            }
            Ok(())
        }
    }

    struct MockPin;

    impl embedded_hal::digital::ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    struct MockDelay;

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    /// Gamma setup, sleep-out and display-on with 120 ms delays
    const INIT_SEQUENCE: &[u8] = &[
        0xE1, 0x0F, 0x00, 0x0E, 0x14, 0x03, 0x11, 0x07, 0x31, 0xC1, 0x48, 0x08, 0x0F, 0x0C, 0x31,
        0x36, 0x0F, 0x11, 0x80, 0x78, 0x29, 0x80, 0x78,
    ];

    fn command_wiring() -> WiringDescriptor {
        WiringDescriptor::with_command_pin(PinId(2), PinId(3), PinId(4))
    }

    #[test]
    fn test_bitmap_scenario_reaches_showing_scene() {
        let mut registry = DisplayClaimRegistry::new();
        let bus = BusHandle::new(BusId(0));
        let geometry = PanelGeometry::new(128, 160).with_color_order(ColorOrder::Bgr);

        // Decoded-bitmap stand-in: a 128x160 RGB565 frame of solid green
        let mut data = vec![0u8; 128 * 160 * 2];
        for pair in data.chunks_exact_mut(2) {
            pair.copy_from_slice(&0x07E0u16.to_be_bytes());
        }
        let image =
            ImageElement::new(128, 160, PixelFormat::Rgb565BigEndian, &data).unwrap();
        let mut scene = Scene::new(10);
        scene.push(VisualElement::Image(image)).unwrap();

        let panel = bring_up(
            &mut registry,
            &bus,
            &command_wiring(),
            geometry,
            &scene,
            MockSpi::new(),
            MockPin,
            MockPin,
            &mut MockDelay,
        )
        .unwrap();

        assert_eq!(panel.phase(), BringupPhase::ShowingScene);
        assert!(registry.is_claimed());
        assert!(matches!(scene.element(0), Some(VisualElement::Image(_))));

        // The composed frame carries the image's pixels
        assert_eq!(&panel.frame_data()[..2], &[0x07, 0xE0]);
        assert_eq!(&panel.frame_data()[128 * 160 * 2 - 2..], &[0x07, 0xE0]);
    }

    #[test]
    fn test_solid_scenario_reaches_showing_scene() {
        let mut registry = DisplayClaimRegistry::new();
        let bus = BusHandle::new(BusId(0));
        let wiring =
            WiringDescriptor::with_init_sequence(PinId(5), INIT_SEQUENCE, PinId(3)).unwrap();
        let geometry = PanelGeometry::new(128, 128);

        let palette = Palette::new([0xFF0000]);
        let element = VisualElement::Solid(SolidElement::new(128, 128, palette));
        let mut scene = Scene::new(1);
        scene.push(element).unwrap();

        // Every pixel of the single element samples to the palette entry
        for (x, y) in [(0, 0), (127, 127), (64, 5)] {
            assert_eq!(scene.element(0).unwrap().pixel(x, y), Some(0xFF0000));
        }

        let panel = bring_up(
            &mut registry,
            &bus,
            &wiring,
            geometry,
            &scene,
            MockSpi::new(),
            MockPin,
            MockPin,
            &mut MockDelay,
        )
        .unwrap();

        assert_eq!(panel.phase(), BringupPhase::ShowingScene);

        // Whole framebuffer is red in RGB565
        for pair in panel.frame_data().chunks_exact(2) {
            assert_eq!(pair, &[0xF8, 0x00]);
        }
    }

    #[test]
    fn test_second_bringup_releases_prior_claim() {
        let mut registry = DisplayClaimRegistry::new();
        let bus = BusHandle::new(BusId(0));
        let geometry = PanelGeometry::new(128, 160);
        let scene = Scene::new(1);

        let first = bring_up(
            &mut registry,
            &bus,
            &command_wiring(),
            geometry,
            &scene,
            MockSpi::new(),
            MockPin,
            MockPin,
            &mut MockDelay,
        )
        .unwrap();

        // A direct claim without release conflicts
        assert_eq!(registry.claim(&bus), Err(BringupError::BusUnavailable));

        // A full bring_up performs the release internally and succeeds;
        // the first driver's claim is superseded, never duplicated
        let second = bring_up(
            &mut registry,
            &bus,
            &command_wiring(),
            geometry,
            &scene,
            MockSpi::new(),
            MockPin,
            MockPin,
            &mut MockDelay,
        )
        .unwrap();

        assert_eq!(second.phase(), BringupPhase::ShowingScene);
        assert!(registry.is_claimed());
        drop(first);
    }

    #[test]
    fn test_invalid_geometry_rejected_and_claim_released() {
        let mut registry = DisplayClaimRegistry::new();
        let bus = BusHandle::new(BusId(0));
        let scene = Scene::new(1);

        for geometry in [
            PanelGeometry::new(0, 160),
            PanelGeometry::new(128, 0),
            PanelGeometry::new(200, 160),
        ] {
            let result = bring_up(
                &mut registry,
                &bus,
                &command_wiring(),
                geometry,
                &scene,
                MockSpi::new(),
                MockPin,
                MockPin,
                &mut MockDelay,
            );
            assert!(matches!(result, Err(BringupError::InvalidGeometry)));
            assert!(!registry.is_claimed());
        }
    }

    #[test]
    fn test_conflicting_select_pins_rejected() {
        let mut registry = DisplayClaimRegistry::new();
        let bus = BusHandle::new(BusId(0));
        let scene = Scene::new(1);
        let wiring = WiringDescriptor::with_command_pin(PinId(2), PinId(2), PinId(4));

        let result = bring_up(
            &mut registry,
            &bus,
            &wiring,
            PanelGeometry::new(128, 160),
            &scene,
            MockSpi::new(),
            MockPin,
            MockPin,
            &mut MockDelay,
        );
        assert!(matches!(result, Err(BringupError::ControllerInitFailure)));
        assert!(!registry.is_claimed());
    }

    #[test]
    fn test_released_bus_rejected() {
        let mut registry = DisplayClaimRegistry::new();
        let mut bus = BusHandle::new(BusId(0));
        bus.release();
        let scene = Scene::new(1);

        let result = bring_up(
            &mut registry,
            &bus,
            &command_wiring(),
            PanelGeometry::new(128, 160),
            &scene,
            MockSpi::new(),
            MockPin,
            MockPin,
            &mut MockDelay,
        );
        assert!(matches!(result, Err(BringupError::BusUnavailable)));
        assert!(!registry.is_claimed());
    }
}
