/// Claim lifecycle state machine.
///
/// Tracks one autoconfiguration run from the first probe through the
/// announced, persisted claim. The state reached when a run fails tells
/// the caller how far it got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClaimState {
    /// No run in progress yet
    #[default]
    Idle,

    /// Probing candidate addresses for conflicts
    Probing,

    /// A candidate survived probing and its route is installed
    Claimed,

    /// Gratuitous announcements for the claim have been sent
    Announced,

    /// The claim has been written to the settings store
    Persisted,
}

impl ClaimState {
    /// Returns true once an address has been claimed, whether or not it has
    /// been announced or persisted yet
    pub fn is_claimed(&self) -> bool {
        matches!(
            self,
            ClaimState::Claimed | ClaimState::Announced | ClaimState::Persisted
        )
    }

    /// Returns true while a run is actively probing candidates
    pub fn is_probing(&self) -> bool {
        matches!(self, ClaimState::Probing)
    }

    /// Returns true once the run has completed all of its steps
    pub fn is_complete(&self) -> bool {
        matches!(self, ClaimState::Persisted)
    }
}
