//! The optimistic write coordinator.
//!
//! Each operation kind carries its own optimism policy, on purpose:
//!
//! - create prepends locally before the remote write, then re-reads;
//! - update applies no local guess (the remote side merges partial fields,
//!   so a correct optimistic merge is non-trivial) and re-reads;
//! - delete removes locally after explicit confirmation and trusts the
//!   remote delete as final - no forced re-read.
//!
//! A failed remote write propagates to the caller and the optimistic local
//! mutation is NOT rolled back; the next reconciliation replaces state
//! wholesale and self-heals.

use tracing::warn;

use crate::core::{AppSettings, UserEmail, Vehicle, VehicleId, VehiclePatch};
use crate::store::{ActionKind, AuditRecord};

use super::{lock_state, CatalogEngine};

/// The three coordinated write operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteKind {
    Create,
    Update,
    Delete,
}

/// Local-mutation policy applied before the remote write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Optimism {
    /// Prepend the new entity so it is visible before the round trip.
    Prepend,
    /// No local guess; wait for the authoritative re-read.
    None,
    /// Remove the entity immediately.
    Remove,
}

impl WriteKind {
    /// The fixed per-operation policy. An explicit table, not an accident.
    pub fn optimism(self) -> Optimism {
        match self {
            Self::Create => Optimism::Prepend,
            Self::Update => Optimism::None,
            Self::Delete => Optimism::Remove,
        }
    }
}

/// Caller's answer to the delete confirmation gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteDecision {
    Confirmed,
    Declined,
}

/// What a delete call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The caller declined the confirmation gate; nothing was touched.
    Declined,
}

impl CatalogEngine {
    /// Create: optimistic prepend, remote save, forced full re-read.
    ///
    /// The new vehicle is visible immediately; the re-read replaces (never
    /// merges) local state, so no duplicate survives reconciliation.
    pub fn upload(&self, vehicle: Vehicle) -> crate::Result<()> {
        {
            let mut state = lock_state(self.state());
            state.vehicles.insert(0, vehicle.clone());
        }
        self.store().save_vehicle(&vehicle)?;
        self.refresh_vehicles()?;
        Ok(())
    }

    /// Update: no optimistic mutation, remote merge, forced full re-read.
    pub fn update(&self, id: &VehicleId, patch: &VehiclePatch) -> crate::Result<()> {
        self.store().update_vehicle(id, patch)?;
        self.refresh_vehicles()?;
        Ok(())
    }

    /// Delete: confirmation gate, optimistic remove, remote delete, no
    /// re-read. With a known identity, one `Excluir` audit record is
    /// emitted best-effort - it never blocks or rolls back the delete.
    pub fn delete(
        &self,
        id: &VehicleId,
        decision: DeleteDecision,
        actor: Option<&UserEmail>,
    ) -> crate::Result<DeleteOutcome> {
        if decision == DeleteDecision::Declined {
            return Ok(DeleteOutcome::Declined);
        }
        let name = {
            let mut state = lock_state(self.state());
            let name = state.vehicle(id).map(|v| v.name.clone());
            state.vehicles.retain(|v| &v.id != id);
            name
        };
        self.store().delete_vehicle(id)?;
        if let (Some(actor), Some(name)) = (actor, name) {
            self.audit(
                actor,
                ActionKind::Excluir,
                &name,
                "Veículo excluído permanentemente",
            );
        }
        Ok(DeleteOutcome::Deleted)
    }

    /// Settings save: optimistic replace, remote full-record write, then a
    /// settings re-fetch.
    pub fn save_settings(&self, settings: AppSettings) -> crate::Result<()> {
        {
            let mut state = lock_state(self.state());
            state.settings = settings.clone();
        }
        self.store().save_settings(&settings)?;
        let fresh = self.store().settings()?;
        lock_state(self.state()).settings = fresh;
        Ok(())
    }

    /// Record an admin action. Best effort: a failed write is logged and
    /// discarded, in contrast to the propagating CRUD paths above.
    pub fn audit(&self, actor: &UserEmail, kind: ActionKind, target: &str, details: &str) {
        let record = AuditRecord {
            id: None,
            user_email: actor.to_string(),
            action_type: kind,
            target: target.to_string(),
            details: details.to_string(),
            created_at: None,
        };
        if let Err(err) = self.store().log_action(&record) {
            warn!(%err, action = kind.as_str(), "audit record write failed");
        }
    }

    /// Authoritative vehicle re-read, replacing local state wholesale and
    /// re-evaluating the deep link.
    fn refresh_vehicles(&self) -> crate::Result<()> {
        let fresh = self.store().all_vehicles()?;
        let mut state = lock_state(self.state());
        state.vehicles = fresh;
        super::deeplink::resolve(&mut state, self.deep_link());
        Ok(())
    }
}
