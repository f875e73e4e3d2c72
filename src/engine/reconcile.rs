//! Full reconciliation.
//!
//! One coarse-grained invalidate-and-reload: no attempt is made to infer
//! which row changed. Correctness depends only on the re-read being
//! authoritative and idempotent, so interleaved runs cannot corrupt state -
//! the last to complete wins.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::core::VehicleId;
use crate::store::{CatalogStore, StoreError};

use super::state::CatalogState;
use super::{deeplink, lock_state, visit};

/// Everything a reconciliation needs, cloneable into the listener thread.
#[derive(Clone)]
pub(crate) struct Reconciler {
    pub store: Arc<dyn CatalogStore>,
    pub state: Arc<Mutex<CatalogState>>,
    pub deep_link: Option<VehicleId>,
}

impl Reconciler {
    /// Read everything, then replace local state wholesale.
    ///
    /// Reads happen before the state lock is taken, so a slow remote never
    /// blocks readers; it only delays when this result is applied. On any
    /// read failure local state is left untouched (stale but consistent).
    pub fn run(&self) -> Result<(), StoreError> {
        let vehicles = self.store.all_vehicles()?;
        let settings = self.store.settings()?;
        let visit_count = visit::read_count(self.store.as_ref());

        let mut state = lock_state(&self.state);
        state.vehicles = vehicles;
        state.settings = settings;
        state.visit_count = visit_count;
        deeplink::resolve(&mut state, self.deep_link.as_ref());
        debug!(vehicles = state.vehicles.len(), "reconciled local state");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Vehicle, VehicleType};
    use crate::store::MemoryStore;

    fn vehicle(id: &str) -> Vehicle {
        Vehicle::new(VehicleId::new(id).unwrap(), id, VehicleType::Moto)
    }

    fn reconciler(store: Arc<MemoryStore>, deep_link: Option<&str>) -> Reconciler {
        Reconciler {
            store,
            state: Arc::new(Mutex::new(CatalogState::default())),
            deep_link: deep_link.map(|id| VehicleId::new(id).unwrap()),
        }
    }

    #[test]
    fn replaces_all_three_pieces_of_state() {
        let store = Arc::new(MemoryStore::new());
        store.seed_vehicles(vec![vehicle("a")]);
        store.seed_visit_total(5);
        let rec = reconciler(store, None);
        rec.run().unwrap();
        let state = lock_state(&rec.state);
        assert_eq!(state.vehicles.len(), 1);
        assert_eq!(state.visit_count, 5);
    }

    #[test]
    fn failed_read_leaves_state_unchanged() {
        let store = Arc::new(MemoryStore::new());
        store.seed_vehicles(vec![vehicle("a")]);
        let rec = reconciler(store.clone(), None);
        rec.run().unwrap();

        store.seed_vehicles(vec![]);
        store.fail_next("all_vehicles", StoreError::unavailable("down"));
        assert!(rec.run().is_err());
        assert_eq!(lock_state(&rec.state).vehicles.len(), 1);
    }

    #[test]
    fn deep_link_resolves_once_collection_arrives() {
        let store = Arc::new(MemoryStore::new());
        store.seed_vehicles(vec![vehicle("a"), vehicle("b")]);
        let rec = reconciler(store, Some("b"));
        rec.run().unwrap();
        let state = lock_state(&rec.state);
        assert_eq!(state.focused.as_ref().map(|v| v.id.as_str()), Some("b"));
    }
}
