//! Board-agnostic display bring-up logic for Phosphor firmware
//!
//! This crate contains everything about bringing up an SPI TFT panel
//! that does not depend on specific hardware:
//!
//! - Bus handle and the process-wide display-claim registry
//! - Wiring descriptor (pin assignments, canned init sequences)
//! - Panel geometry and validation
//! - Scene composition (image and solid-color elements)
//! - Color conversion helpers
//! - Bring-up phase machine
//! - Error taxonomy

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bus;
pub mod color;
pub mod error;
pub mod geometry;
pub mod phase;
pub mod scene;
pub mod wiring;

pub use bus::{BusHandle, BusId, DisplayClaimRegistry};
pub use error::BringupError;
pub use geometry::{ColorOrder, PanelGeometry, PanelLimits};
pub use phase::{BringupEvent, BringupPhase};
pub use scene::{
    ImageElement, Palette, PixelFormat, Scene, SolidElement, VisualElement, MAX_SCENE_ELEMENTS,
};
pub use wiring::{CommandSource, InitSequence, PinId, WiringDescriptor};
