//! In-process `CatalogStore`.
//!
//! The reference implementation of the gateway contract, used by the
//! integration tests and by embeddings that run without a remote store.
//! Writes to a watched table broadcast a `ChangeEvent` to every live
//! subscriber; dead subscribers are pruned on the next broadcast.

use std::collections::HashMap;
use std::sync::Mutex;

use crossbeam::channel::{unbounded, Sender};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::core::{AppSettings, Vehicle, VehicleId, VehiclePatch};

use super::{
    AccessRecord, AuditRecord, CatalogStore, ChangeEvent, ChangeKind, ChangeSubscription,
    StoreError, WatchedTable,
};

#[derive(Default)]
struct Inner {
    vehicles: Vec<Vehicle>,
    settings: Option<AppSettings>,
    access_logs: Vec<AccessRecord>,
    audit_logs: Vec<AuditRecord>,
    /// The precomputed running total. `None` models an absent stats record.
    visit_total: Option<u64>,
    watchers: Vec<Sender<ChangeEvent>>,
    /// Single-shot fault injection, keyed by operation name.
    faults: HashMap<&'static str, StoreError>,
}

/// Shared in-memory store. Cheap to clone handles via `Arc`.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the vehicle collection without broadcasting.
    pub fn seed_vehicles(&self, vehicles: Vec<Vehicle>) {
        self.lock().vehicles = vehicles;
    }

    /// Seed the precomputed visit-total record.
    pub fn seed_visit_total(&self, total: u64) {
        self.lock().visit_total = Some(total);
    }

    /// Make the next call to `op` fail with `err`. One-shot: the fault is
    /// consumed by the failing call.
    pub fn fail_next(&self, op: &'static str, err: StoreError) {
        self.lock().faults.insert(op, err);
    }

    /// Number of rows currently in the vehicle table. Test observability.
    pub fn vehicle_rows(&self) -> usize {
        self.lock().vehicles.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn take_fault(inner: &mut Inner, op: &'static str) -> Result<(), StoreError> {
        match inner.faults.remove(op) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn broadcast(inner: &mut Inner, table: WatchedTable, kind: ChangeKind) {
        let event = ChangeEvent { table, kind };
        inner.watchers.retain(|tx| tx.send(event).is_ok());
    }
}

impl CatalogStore for MemoryStore {
    fn all_vehicles(&self) -> Result<Vec<Vehicle>, StoreError> {
        let mut inner = self.lock();
        Self::take_fault(&mut inner, "all_vehicles")?;
        Ok(inner.vehicles.clone())
    }

    fn settings(&self) -> Result<AppSettings, StoreError> {
        let mut inner = self.lock();
        Self::take_fault(&mut inner, "settings")?;
        // Implicit creation at first read.
        Ok(inner
            .settings
            .get_or_insert_with(AppSettings::default)
            .clone())
    }

    fn save_vehicle(&self, vehicle: &Vehicle) -> Result<(), StoreError> {
        let mut inner = self.lock();
        Self::take_fault(&mut inner, "save_vehicle")?;
        if inner.vehicles.iter().any(|v| v.id == vehicle.id) {
            return Err(StoreError::rejected(format!(
                "duplicate vehicle id {}",
                vehicle.id
            )));
        }
        inner.vehicles.push(vehicle.clone());
        Self::broadcast(&mut inner, WatchedTable::Vehicles, ChangeKind::Insert);
        Ok(())
    }

    fn update_vehicle(&self, id: &VehicleId, patch: &VehiclePatch) -> Result<(), StoreError> {
        let mut inner = self.lock();
        Self::take_fault(&mut inner, "update_vehicle")?;
        let Some(vehicle) = inner.vehicles.iter_mut().find(|v| &v.id == id) else {
            return Err(StoreError::NotFound {
                table: "vehicles",
                id: id.to_string(),
            });
        };
        patch.apply_to(vehicle);
        Self::broadcast(&mut inner, WatchedTable::Vehicles, ChangeKind::Update);
        Ok(())
    }

    fn delete_vehicle(&self, id: &VehicleId) -> Result<(), StoreError> {
        let mut inner = self.lock();
        Self::take_fault(&mut inner, "delete_vehicle")?;
        let before = inner.vehicles.len();
        inner.vehicles.retain(|v| &v.id != id);
        if inner.vehicles.len() == before {
            return Err(StoreError::NotFound {
                table: "vehicles",
                id: id.to_string(),
            });
        }
        Self::broadcast(&mut inner, WatchedTable::Vehicles, ChangeKind::Delete);
        Ok(())
    }

    fn save_settings(&self, settings: &AppSettings) -> Result<(), StoreError> {
        let mut inner = self.lock();
        Self::take_fault(&mut inner, "save_settings")?;
        let kind = if inner.settings.is_some() {
            ChangeKind::Update
        } else {
            ChangeKind::Insert
        };
        inner.settings = Some(settings.clone());
        Self::broadcast(&mut inner, WatchedTable::Settings, kind);
        Ok(())
    }

    fn visit_total(&self) -> Result<u64, StoreError> {
        let mut inner = self.lock();
        Self::take_fault(&mut inner, "visit_total")?;
        inner.visit_total.ok_or(StoreError::NotFound {
            table: "site_stats",
            id: "1".to_string(),
        })
    }

    fn count_access_logs(&self) -> Result<u64, StoreError> {
        let mut inner = self.lock();
        Self::take_fault(&mut inner, "count_access_logs")?;
        Ok(inner.access_logs.len() as u64)
    }

    fn log_visit(&self, record: &AccessRecord) -> Result<(), StoreError> {
        let mut inner = self.lock();
        Self::take_fault(&mut inner, "log_visit")?;
        let mut record = record.clone();
        record.id.get_or_insert_with(|| Uuid::new_v4().to_string());
        record
            .created_at
            .get_or_insert_with(OffsetDateTime::now_utc);
        inner.access_logs.push(record);
        if let Some(total) = inner.visit_total.as_mut() {
            *total += 1;
        }
        Ok(())
    }

    fn log_action(&self, record: &AuditRecord) -> Result<(), StoreError> {
        let mut inner = self.lock();
        Self::take_fault(&mut inner, "log_action")?;
        let mut record = record.clone();
        record.id.get_or_insert_with(|| Uuid::new_v4().to_string());
        record
            .created_at
            .get_or_insert_with(OffsetDateTime::now_utc);
        inner.audit_logs.push(record);
        Ok(())
    }

    fn access_logs(&self, limit: usize) -> Result<Vec<AccessRecord>, StoreError> {
        let mut inner = self.lock();
        Self::take_fault(&mut inner, "access_logs")?;
        Ok(inner.access_logs.iter().rev().take(limit).cloned().collect())
    }

    fn audit_logs(&self, limit: usize) -> Result<Vec<AuditRecord>, StoreError> {
        let mut inner = self.lock();
        Self::take_fault(&mut inner, "audit_logs")?;
        Ok(inner.audit_logs.iter().rev().take(limit).cloned().collect())
    }

    fn delete_access_log(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        Self::take_fault(&mut inner, "delete_access_log")?;
        inner
            .access_logs
            .retain(|r| r.id.as_deref() != Some(id));
        Ok(())
    }

    fn clear_access_logs(&self) -> Result<(), StoreError> {
        let mut inner = self.lock();
        Self::take_fault(&mut inner, "clear_access_logs")?;
        inner.access_logs.clear();
        Ok(())
    }

    fn delete_audit_log(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        Self::take_fault(&mut inner, "delete_audit_log")?;
        inner.audit_logs.retain(|r| r.id.as_deref() != Some(id));
        Ok(())
    }

    fn clear_audit_logs(&self) -> Result<(), StoreError> {
        let mut inner = self.lock();
        Self::take_fault(&mut inner, "clear_audit_logs")?;
        inner.audit_logs.clear();
        Ok(())
    }

    fn watch(&self) -> Result<ChangeSubscription, StoreError> {
        let mut inner = self.lock();
        Self::take_fault(&mut inner, "watch")?;
        let (tx, rx) = unbounded();
        inner.watchers.push(tx);
        Ok(ChangeSubscription::new(rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::VehicleType;

    fn vehicle(id: &str) -> Vehicle {
        Vehicle::new(VehicleId::new(id).unwrap(), id, VehicleType::Carro)
    }

    #[test]
    fn empty_collection_reads_as_empty_vec() {
        let store = MemoryStore::new();
        assert_eq!(store.all_vehicles().unwrap(), Vec::<Vehicle>::new());
    }

    #[test]
    fn settings_created_implicitly_on_first_read() {
        let store = MemoryStore::new();
        assert_eq!(store.settings().unwrap(), AppSettings::default());
    }

    #[test]
    fn duplicate_save_is_rejected() {
        let store = MemoryStore::new();
        store.save_vehicle(&vehicle("a")).unwrap();
        assert!(matches!(
            store.save_vehicle(&vehicle("a")),
            Err(StoreError::Rejected { .. })
        ));
    }

    #[test]
    fn update_of_missing_row_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update_vehicle(&VehicleId::new("ghost").unwrap(), &VehiclePatch::default())
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { table: "vehicles", .. }));
    }

    #[test]
    fn writes_broadcast_to_watchers() {
        let store = MemoryStore::new();
        let sub = store.watch().unwrap();
        store.save_vehicle(&vehicle("a")).unwrap();
        let event = sub.try_recv().unwrap();
        assert_eq!(event.table, WatchedTable::Vehicles);
        assert_eq!(event.kind, ChangeKind::Insert);
    }

    #[test]
    fn dropped_watchers_are_pruned() {
        let store = MemoryStore::new();
        drop(store.watch().unwrap());
        store.save_vehicle(&vehicle("a")).unwrap();
        assert!(store.lock().watchers.is_empty());
    }

    #[test]
    fn fault_injection_is_single_shot() {
        let store = MemoryStore::new();
        store.fail_next("all_vehicles", StoreError::unavailable("down"));
        assert!(store.all_vehicles().is_err());
        assert!(store.all_vehicles().is_ok());
    }

    #[test]
    fn visit_total_absent_without_stats_record() {
        let store = MemoryStore::new();
        assert!(store.visit_total().is_err());
        store.seed_visit_total(7);
        assert_eq!(store.visit_total().unwrap(), 7);
        store
            .log_visit(&AccessRecord {
                id: None,
                ip: "1.2.3.4".into(),
                location: "São Luís, MA - Brasil".into(),
                device_info: "{}".into(),
                device_type: crate::core::DeviceType::Desktop,
                created_at: None,
            })
            .unwrap();
        assert_eq!(store.visit_total().unwrap(), 8);
    }
}
