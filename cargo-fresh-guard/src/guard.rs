//! The construction guard state machine.
//!
//! A guard starts `Idle`, where every event passes. [`ConstructionGuard::arm`]
//! moves it to `Armed` with the collected markers. While armed, the first
//! construction of a type with an active marker ends the run with
//! [`ConstructionForbidden`]; decompositions always pass.

use crate::{ConstructionForbidden, Event, MarkerSet};

/// Whether the guard is enforcing markers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum GuardState {
    /// Markers not yet collected; nothing is enforced.
    #[default]
    Idle,
    /// Enforcing the held markers.
    Armed(MarkerSet),
}

/// Checks scan events against collected markers.
#[derive(Clone, Debug, Default)]
pub struct ConstructionGuard {
    state: GuardState,
}

impl ConstructionGuard {
    /// Creates an idle guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the guard with `markers`, replacing any previous set.
    pub fn arm(&mut self, markers: MarkerSet) {
        tracing::debug!(markers = markers.len(), "construction guard armed");
        self.state = GuardState::Armed(markers);
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &GuardState {
        &self.state
    }

    /// Whether markers are being enforced.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        matches!(self.state, GuardState::Armed(_))
    }

    /// Checks one event.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionForbidden`] when the guard is armed and `event`
    /// constructs a type with an active marker.
    pub fn observe(&self, event: &Event) -> Result<(), ConstructionForbidden> {
        let GuardState::Armed(markers) = &self.state else {
            return Ok(());
        };
        if !event.is_construction() {
            return Ok(());
        }
        let Some(marker) = markers.enforced(&event.type_id) else {
            return Ok(());
        };
        tracing::warn!(
            record = %marker.type_id,
            written = %event.type_id,
            location = %event.location,
            "forbidden direct construction"
        );
        Err(ConstructionForbidden {
            type_id: marker.type_id.clone(),
            location: event.location.clone(),
            alternatives: marker.alternatives(),
        })
    }

    /// Checks events in order, stopping at the first violation.
    ///
    /// Returns the number of events checked.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConstructionForbidden`].
    pub fn check_all<'a, I>(&self, events: I) -> Result<usize, ConstructionForbidden>
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut checked = 0;
        for event in events {
            self.observe(event)?;
            checked += 1;
        }
        Ok(checked)
    }
}
