//! Local engine state.
//!
//! INVARIANT: `vehicles` is a strict reflection of the last authoritative
//! read, except for the window between an optimistic mutation and the forced
//! re-read that follows it (at most one round trip).

use crate::core::{AppSettings, Vehicle, VehicleId};

/// Snapshot of everything the engine holds locally.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogState {
    pub vehicles: Vec<Vehicle>,
    pub settings: AppSettings,
    pub visit_count: u64,
    /// Entity currently presented in focused display, if any.
    pub focused: Option<Vehicle>,
    /// False only before the startup reconciliation finishes (successfully
    /// or not). A failed initial load still reaches a stable loaded state.
    pub loaded: bool,
}

impl CatalogState {
    pub fn vehicle(&self, id: &VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| &v.id == id)
    }

    pub fn contains(&self, id: &VehicleId) -> bool {
        self.vehicle(id).is_some()
    }
}
