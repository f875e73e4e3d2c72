//! Session-scoped visit counter gate.
//!
//! Two states per browsing session: unlogged, logged. The first invocation
//! writes one access record; every later one is a silent no-op. Everything
//! on this path is best-effort: failures are swallowed after a warning and
//! must never block or visibly fail the surrounding application.
//!
//! The session marker store and the geo lookup are injected so the gate can
//! be tested without a browser session or a network.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::DeviceType;
use crate::store::{AccessRecord, CatalogStore};

/// Sentinel recorded when the external lookup cannot resolve a value.
pub const UNKNOWN_SENTINEL: &str = "Desconhecido";

/// Session-scoped key/value marker storage (browser sessionStorage, or an
/// in-process map for other embeddings).
pub trait SessionMarker: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// In-process session marker store. One instance = one browsing session.
#[derive(Default)]
pub struct MemorySession {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionMarker for MemorySession {
    fn get(&self, key: &str) -> Option<String> {
        match self.values.lock() {
            Ok(map) => map.get(key).cloned(),
            Err(poisoned) => poisoned.into_inner().get(key).cloned(),
        }
    }

    fn set(&self, key: &str, value: &str) {
        let mut map = match self.values.lock() {
            Ok(map) => map,
            Err(poisoned) => poisoned.into_inner(),
        };
        map.insert(key.to_string(), value.to_string());
    }
}

#[derive(Debug, Error, Clone)]
#[error("geo lookup failed: {reason}")]
pub struct GeoLookupError {
    pub reason: String,
}

/// Caller network/location metadata, resolved from an external service.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeoInfo {
    pub ip: String,
    pub city: String,
    pub region_code: String,
    pub country: String,
    pub org: String,
    pub timezone: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl GeoInfo {
    /// All-sentinel value substituted when the lookup fails.
    pub fn unknown() -> Self {
        Self {
            ip: UNKNOWN_SENTINEL.to_string(),
            ..Default::default()
        }
    }

    fn location(&self) -> String {
        if self.city.is_empty() && self.region_code.is_empty() && self.country.is_empty() {
            return UNKNOWN_SENTINEL.to_string();
        }
        format!("{}, {} - {}", self.city, self.region_code, self.country)
    }
}

/// External IP/location resolver. Best effort by contract.
pub trait GeoLookup: Send + Sync {
    fn lookup(&self) -> Result<GeoInfo, GeoLookupError>;
}

/// Lookup that always fails, for embeddings without network access. The
/// gate substitutes sentinels and still records the visit.
pub struct NoGeoLookup;

impl GeoLookup for NoGeoLookup {
    fn lookup(&self) -> Result<GeoInfo, GeoLookupError> {
        Err(GeoLookupError {
            reason: "lookup disabled".to_string(),
        })
    }
}

/// Client environment captured into the packed `device_info` payload.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientInfo {
    pub user_agent: String,
    pub platform: String,
    pub screen: String,
    pub language: String,
    pub connection: String,
    pub device_type: DeviceType,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            user_agent: "Unknown".to_string(),
            platform: "Unknown".to_string(),
            screen: "Unknown".to_string(),
            language: "Unknown".to_string(),
            connection: "unknown".to_string(),
            device_type: DeviceType::Desktop,
        }
    }
}

/// The gate itself: marker check, lookup, one record, marker set.
pub struct VisitGate {
    store: Arc<dyn CatalogStore>,
    session: Arc<dyn SessionMarker>,
    geo: Arc<dyn GeoLookup>,
    marker_key: String,
    client: ClientInfo,
}

impl VisitGate {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        session: Arc<dyn SessionMarker>,
        geo: Arc<dyn GeoLookup>,
        marker_key: impl Into<String>,
        client: ClientInfo,
    ) -> Self {
        Self {
            store,
            session,
            geo,
            marker_key: marker_key.into(),
            client,
        }
    }

    /// Record the visit once per session. Never fails; every error on this
    /// path is logged and discarded.
    pub fn log_visit(&self) {
        if self.session.get(&self.marker_key).is_some() {
            debug!("visit already counted this session");
            return;
        }

        let geo = match self.geo.lookup() {
            Ok(info) => info,
            Err(err) => {
                warn!(%err, "geo lookup failed, recording sentinels");
                GeoInfo::unknown()
            }
        };

        let record = self.build_record(&geo);
        match self.store.log_visit(&record) {
            Ok(()) => self.session.set(&self.marker_key, "true"),
            // Error deliberately discarded: the counter must never block the
            // application. The marker stays unset so a later invocation in
            // this session may still count the visit.
            Err(err) => warn!(%err, "visit record write failed"),
        }
    }

    fn build_record(&self, geo: &GeoInfo) -> AccessRecord {
        let lat_long = match (geo.latitude, geo.longitude) {
            (Some(lat), Some(lon)) => format!("{lat}, {lon}"),
            _ => UNKNOWN_SENTINEL.to_string(),
        };
        let device_info = json!({
            "userAgent": self.client.user_agent,
            "platform": self.client.platform,
            "screen": self.client.screen,
            "language": self.client.language,
            "isp": if geo.org.is_empty() { UNKNOWN_SENTINEL } else { geo.org.as_str() },
            "timezone": geo.timezone,
            "lat_long": lat_long,
            "connection": self.client.connection,
        });
        AccessRecord {
            id: None,
            ip: if geo.ip.is_empty() {
                UNKNOWN_SENTINEL.to_string()
            } else {
                geo.ip.clone()
            },
            location: geo.location(),
            device_info: device_info.to_string(),
            device_type: self.client.device_type,
            created_at: None,
        }
    }

    /// Total visit count: prefer the precomputed running total, fall back to
    /// a raw row count, and never raise.
    pub fn visit_count(&self) -> u64 {
        read_count(self.store.as_ref())
    }
}

/// Prefer the precomputed running total; fall back to a raw row count; never
/// raise. Shared by the gate and the reconciliation path.
pub(crate) fn read_count(store: &dyn CatalogStore) -> u64 {
    match store.visit_total() {
        Ok(total) => total,
        Err(err) => {
            warn!(%err, "visit total unavailable, counting raw rows");
            match store.count_access_logs() {
                Ok(count) => count,
                Err(err) => {
                    warn!(%err, "raw visit count unavailable");
                    0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn gate(store: Arc<MemoryStore>, session: Arc<MemorySession>) -> VisitGate {
        VisitGate::new(
            store,
            session,
            Arc::new(NoGeoLookup),
            "visited_session",
            ClientInfo::default(),
        )
    }

    #[test]
    fn second_invocation_same_session_is_a_no_op() {
        let store = Arc::new(MemoryStore::new());
        let session = Arc::new(MemorySession::new());
        let gate = gate(store.clone(), session);
        gate.log_visit();
        gate.log_visit();
        assert_eq!(store.count_access_logs().unwrap(), 1);
    }

    #[test]
    fn fresh_session_counts_again() {
        let store = Arc::new(MemoryStore::new());
        gate(store.clone(), Arc::new(MemorySession::new())).log_visit();
        gate(store.clone(), Arc::new(MemorySession::new())).log_visit();
        assert_eq!(store.count_access_logs().unwrap(), 2);
    }

    #[test]
    fn failed_lookup_records_sentinels() {
        let store = Arc::new(MemoryStore::new());
        let gate = gate(store.clone(), Arc::new(MemorySession::new()));
        gate.log_visit();
        let logs = store.access_logs(10).unwrap();
        assert_eq!(logs[0].ip, UNKNOWN_SENTINEL);
        assert_eq!(logs[0].location, UNKNOWN_SENTINEL);
    }

    #[test]
    fn failed_write_is_swallowed_and_leaves_marker_unset() {
        let store = Arc::new(MemoryStore::new());
        let session = Arc::new(MemorySession::new());
        store.fail_next("log_visit", crate::store::StoreError::unavailable("down"));
        let gate = gate(store.clone(), session.clone());
        gate.log_visit();
        assert_eq!(store.count_access_logs().unwrap(), 0);
        assert!(session.get("visited_session").is_none());
        // The session can still self-heal on a later invocation.
        gate.log_visit();
        assert_eq!(store.count_access_logs().unwrap(), 1);
    }

    #[test]
    fn count_prefers_total_and_falls_back() {
        let store = Arc::new(MemoryStore::new());
        let gate = gate(store.clone(), Arc::new(MemorySession::new()));
        gate.log_visit();
        // No stats record: raw count.
        assert_eq!(gate.visit_count(), 1);
        store.seed_visit_total(42);
        assert_eq!(gate.visit_count(), 42);
        // Total errors: raw count again.
        store.fail_next("visit_total", crate::store::StoreError::unavailable("down"));
        assert_eq!(gate.visit_count(), 1);
    }
}
