//! Bus handle and display-claim registry
//!
//! The serial bus and the display claim are process-wide singleton
//! resources: at most one panel driver may hold the display claim at a
//! time. The registry makes that ownership explicit instead of hiding
//! it in global state, and its release path is an idempotent no-op so
//! it is always safe to call before claiming.

use crate::error::BringupError;

/// Identifier of a serial bus on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusId(pub u8);

/// Opaque handle to a shared serial bus
///
/// Acquired once by the process and never reassigned. Releasing the
/// handle invalidates it; a released handle can no longer back a
/// display claim.
#[derive(Debug)]
pub struct BusHandle {
    id: BusId,
    valid: bool,
}

impl BusHandle {
    /// Acquire a handle to the given bus
    pub fn new(id: BusId) -> Self {
        Self { id, valid: true }
    }

    /// The bus this handle refers to
    pub fn id(&self) -> BusId {
        self.id
    }

    /// Whether the handle still backs a live bus
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Invalidate the handle (bus teardown)
    pub fn release(&mut self) {
        self.valid = false;
    }
}

/// Process-wide guard over which driver owns the physical display
///
/// Exactly one registry value exists per process; bring-up takes it by
/// `&mut` so the claim cannot be bypassed.
#[derive(Debug, Default)]
pub struct DisplayClaimRegistry {
    claimed_by: Option<BusId>,
}

impl DisplayClaimRegistry {
    /// Create an unclaimed registry
    pub const fn new() -> Self {
        Self { claimed_by: None }
    }

    /// Release any existing display claim
    ///
    /// Idempotent: a no-op when nothing is claimed.
    pub fn release_all(&mut self) {
        self.claimed_by = None;
    }

    /// Claim the display for the given bus
    ///
    /// Fails with `BusUnavailable` if the handle has been released or
    /// the display is already claimed without an intervening
    /// `release_all`.
    pub fn claim(&mut self, bus: &BusHandle) -> Result<(), BringupError> {
        if !bus.is_valid() {
            return Err(BringupError::BusUnavailable);
        }
        if self.claimed_by.is_some() {
            return Err(BringupError::BusUnavailable);
        }
        self.claimed_by = Some(bus.id());
        Ok(())
    }

    /// Whether any display claim is currently held
    pub fn is_claimed(&self) -> bool {
        self.claimed_by.is_some()
    }

    /// The bus currently holding the display claim, if any
    pub fn claimed_by(&self) -> Option<BusId> {
        self.claimed_by
    }
}
