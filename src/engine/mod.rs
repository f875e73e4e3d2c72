//! The catalog synchronization engine.
//!
//! One engine instance owns the local state, the change-feed listener, the
//! session visit gate and the deep-link target. Collaborators (store,
//! session marker, geo lookup) are injected; nothing here is an ambient
//! global, so a test can run any number of engines side by side.

mod deeplink;
pub(crate) mod reconcile;
pub mod state;
pub mod visit;
pub mod writes;

use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;

use crossbeam::channel::{bounded, Receiver, Sender};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::core::{contact, AppSettings, CategoryFilter, DerivedViews, Vehicle, VehicleId, ViewEngine};
use crate::store::{CatalogStore, ChangeSubscription};

use reconcile::Reconciler;

pub use state::CatalogState;
pub use visit::{
    ClientInfo, GeoInfo, GeoLookup, GeoLookupError, MemorySession, NoGeoLookup, SessionMarker,
    VisitGate,
};
pub use writes::{DeleteDecision, DeleteOutcome, Optimism, WriteKind};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    #[error("engine already started")]
    AlreadyStarted,
}

impl EngineError {
    pub fn is_retryable(&self) -> bool {
        false
    }
}

/// Lock the state, recovering from a poisoned mutex. State is always left
/// whole by writers, so the poison carries no torn invariant.
pub(crate) fn lock_state(state: &Mutex<CatalogState>) -> MutexGuard<'_, CatalogState> {
    match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

struct ListenerHandle {
    stop_tx: Sender<()>,
    thread: JoinHandle<()>,
}

/// The engine. Construct, optionally attach a deep link and client info,
/// `start`, use, `shutdown`.
pub struct CatalogEngine {
    store: Arc<dyn CatalogStore>,
    session: Arc<dyn SessionMarker>,
    geo: Arc<dyn GeoLookup>,
    config: EngineConfig,
    client: ClientInfo,
    deep_link: Option<VehicleId>,
    state: Arc<Mutex<CatalogState>>,
    view_engine: Mutex<ViewEngine>,
    listener: Mutex<Option<ListenerHandle>>,
}

impl CatalogEngine {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        session: Arc<dyn SessionMarker>,
        geo: Arc<dyn GeoLookup>,
        config: EngineConfig,
    ) -> Self {
        let view_engine = Mutex::new(ViewEngine::with_recent_cap(config.recent_cap));
        Self {
            store,
            session,
            geo,
            config,
            client: ClientInfo::default(),
            deep_link: None,
            state: Arc::new(Mutex::new(CatalogState::default())),
            view_engine,
            listener: Mutex::new(None),
        }
    }

    /// Attach the external deep-link id, read once at startup.
    pub fn with_deep_link(mut self, id: VehicleId) -> Self {
        self.deep_link = Some(id);
        self
    }

    /// Attach the client environment recorded with the visit.
    pub fn with_client_info(mut self, client: ClientInfo) -> Self {
        self.client = client;
        self
    }

    pub(crate) fn store(&self) -> &Arc<dyn CatalogStore> {
        &self.store
    }

    pub(crate) fn state(&self) -> &Mutex<CatalogState> {
        &self.state
    }

    pub(crate) fn deep_link(&self) -> Option<&VehicleId> {
        self.deep_link.as_ref()
    }

    fn reconciler(&self) -> Reconciler {
        Reconciler {
            store: self.store.clone(),
            state: self.state.clone(),
            deep_link: self.deep_link.clone(),
        }
    }

    fn visit_gate(&self) -> VisitGate {
        VisitGate::new(
            self.store.clone(),
            self.session.clone(),
            self.geo.clone(),
            self.config.session_marker_key.clone(),
            self.client.clone(),
        )
    }

    fn lock_listener(&self) -> MutexGuard<'_, Option<ListenerHandle>> {
        match self.listener.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Start the engine: one startup reconciliation, the session visit
    /// gate, and the change-feed listener.
    ///
    /// A failed initial load logs a warning and leaves a stable empty
    /// state; a failed subscription leaves the engine usable without live
    /// updates. Neither aborts startup.
    pub fn start(&self) -> crate::Result<()> {
        let mut listener = self.lock_listener();
        if listener.is_some() {
            return Err(EngineError::AlreadyStarted.into());
        }

        if let Err(err) = self.reconciler().run() {
            warn!(%err, "initial load failed; starting with empty state");
        }
        lock_state(&self.state).loaded = true;

        self.visit_gate().log_visit();

        match self.store.watch() {
            Ok(subscription) => {
                let (stop_tx, stop_rx) = bounded(1);
                let reconciler = self.reconciler();
                let thread =
                    std::thread::spawn(move || listen(subscription, stop_rx, reconciler));
                *listener = Some(ListenerHandle { stop_tx, thread });
            }
            Err(err) => warn!(%err, "change feed unavailable; live updates disabled"),
        }
        Ok(())
    }

    /// Stop the listener and release the subscription. Idempotent; the
    /// channel is released exactly once.
    pub fn shutdown(&self) {
        let handle = self.lock_listener().take();
        if let Some(handle) = handle {
            let _ = handle.stop_tx.send(());
            if handle.thread.join().is_err() {
                warn!("change listener panicked during shutdown");
            }
        }
    }

    /// Force a full re-read, replacing local state wholesale.
    pub fn reconcile(&self) -> crate::Result<()> {
        self.reconciler().run()?;
        Ok(())
    }

    /// Clone of the entire local state.
    pub fn snapshot(&self) -> CatalogState {
        lock_state(&self.state).clone()
    }

    /// Derived views for the given category and search, memoized on the
    /// (collection, category, search) triple.
    pub fn views(&self, filter: CategoryFilter, search: &str) -> DerivedViews {
        let state = lock_state(&self.state);
        let mut engine = match self.view_engine.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        engine.views(&state.vehicles, filter, search).clone()
    }

    pub fn settings(&self) -> AppSettings {
        lock_state(&self.state).settings.clone()
    }

    pub fn visit_count(&self) -> u64 {
        lock_state(&self.state).visit_count
    }

    pub fn loaded(&self) -> bool {
        lock_state(&self.state).loaded
    }

    pub fn focused(&self) -> Option<Vehicle> {
        lock_state(&self.state).focused.clone()
    }

    /// Focus a vehicle for detailed display. Returns false when the id is
    /// not in the local collection.
    pub fn focus(&self, id: &VehicleId) -> bool {
        let mut state = lock_state(&self.state);
        match state.vehicle(id).cloned() {
            Some(vehicle) => {
                state.focused = Some(vehicle);
                true
            }
            None => false,
        }
    }

    pub fn clear_focus(&self) {
        lock_state(&self.state).focused = None;
    }

    /// Send URL for one attendant number carrying the interest message for
    /// a vehicle, built from the configured origin and deep-link param.
    pub fn interest_link(&self, number: &str, vehicle: &Vehicle) -> String {
        contact::interest_link(
            number,
            &self.config.site_origin,
            &self.config.deeplink_param,
            vehicle,
        )
    }
}

impl Drop for CatalogEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Listener loop: every event, whatever its table or kind, triggers one
/// full reconciliation. Failures keep the stale state and wait for the
/// next event; a lost feed ends the loop.
fn listen(subscription: ChangeSubscription, stop_rx: Receiver<()>, reconciler: Reconciler) {
    loop {
        crossbeam::select! {
            recv(stop_rx) -> _ => break,
            recv(subscription.receiver()) -> msg => match msg {
                Ok(event) => {
                    debug!(table = %event.table, kind = ?event.kind, "change notification");
                    if let Err(err) = reconciler.run() {
                        warn!(%err, "reconciliation failed; keeping stale state");
                    }
                }
                Err(_) => {
                    warn!("change subscription lost; live updates stopped");
                    break;
                }
            },
        }
    }
}
