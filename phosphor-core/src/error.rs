//! Bring-up error taxonomy
//!
//! None of these failures are caught or retried: any error during
//! bring-up is fatal and halts before the panel goes live, surfacing
//! through the platform's top-level fault reporter.

/// Errors that can occur while bringing up a display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BringupError {
    /// The bus handle is invalid, or the bus already carries a display claim
    BusUnavailable,
    /// The bus-wiring binding is invalid, or the controller never
    /// acknowledged its init bytes
    ControllerInitFailure,
    /// Panel dimensions are zero or exceed controller limits
    InvalidGeometry,
    /// More elements appended than the scene's configured maximum
    SceneOverflow,
    /// Bitmap data malformed or unreadable
    ImageDecodeFailure,
}
