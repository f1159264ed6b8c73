//! Bring-up phase machine
//!
//! A panel moves through a fixed sequence of phases during bring-up.
//! `ShowingScene` is terminal for these scenarios: nothing releases the
//! display once static content is up.

/// Phases of display bring-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BringupPhase {
    /// No display claim held
    Unclaimed,
    /// Bus claimed for display use, controller not yet initialized
    Claimed,
    /// Controller reset and initialized, nothing attached
    Initialized,
    /// Scene attached; the panel refreshes from its contents
    ShowingScene,
}

/// Events advancing the bring-up phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BringupEvent {
    /// The display claim was taken for a bus
    BusClaimed,
    /// Controller acknowledged reset and init bytes
    ControllerReady,
    /// A scene was attached and is being shown
    SceneAttached,
    /// The display claim was released
    Released,
}

impl BringupPhase {
    /// Process an event and return the next phase
    ///
    /// Out-of-order events hold the current phase; `Released` returns
    /// to `Unclaimed` from anywhere.
    pub fn transition(self, event: BringupEvent) -> Self {
        use BringupEvent::*;
        use BringupPhase::*;

        match (self, event) {
            (Unclaimed, BusClaimed) => Claimed,
            (Claimed, ControllerReady) => Initialized,
            (Initialized, SceneAttached) => ShowingScene,
            (_, Released) => Unclaimed,

            // Out-of-order event: hold the current phase
            _ => self,
        }
    }

    /// Whether the panel is refreshing from a scene
    pub fn is_showing(&self) -> bool {
        matches!(self, BringupPhase::ShowingScene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_bringup_sequence() {
        let phase = BringupPhase::Unclaimed
            .transition(BringupEvent::BusClaimed)
            .transition(BringupEvent::ControllerReady)
            .transition(BringupEvent::SceneAttached);
        assert_eq!(phase, BringupPhase::ShowingScene);
        assert!(phase.is_showing());
    }

    #[test]
    fn test_out_of_order_events_hold_phase() {
        // Cannot attach a scene before the controller is initialized
        let phase = BringupPhase::Claimed.transition(BringupEvent::SceneAttached);
        assert_eq!(phase, BringupPhase::Claimed);

        // Cannot initialize without a claim
        let phase = BringupPhase::Unclaimed.transition(BringupEvent::ControllerReady);
        assert_eq!(phase, BringupPhase::Unclaimed);
    }

    #[test]
    fn test_release_from_any_phase() {
        let phases = [
            BringupPhase::Unclaimed,
            BringupPhase::Claimed,
            BringupPhase::Initialized,
            BringupPhase::ShowingScene,
        ];

        for phase in phases {
            assert_eq!(
                phase.transition(BringupEvent::Released),
                BringupPhase::Unclaimed
            );
        }
    }
}
