//! Hardware driver implementations for Phosphor
//!
//! This crate provides the hardware-facing half of display bring-up:
//!
//! - ST7735/ST7735R panel driver (blocking SPI)
//! - The `bring_up` orchestration over the phosphor-core model

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bringup;
pub mod st7735;

pub use bringup::bring_up;
pub use st7735::{PanelError, St7735, ST7735_LIMITS};
