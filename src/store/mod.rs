//! Remote store gateway.
//!
//! `CatalogStore` is a thin typed pass-through over the remote collection
//! plus its analytics tables. It defines no timeouts and no retry policy;
//! callers decide whether an error is surfaced or swallowed.

pub mod memory;

use std::fmt;

use crossbeam::channel::{Receiver, RecvError, RecvTimeoutError, TryRecvError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

use crate::core::{AppSettings, DeviceType, Vehicle, VehicleId, VehiclePatch};

pub use memory::MemoryStore;

/// Gateway failure taxonomy.
///
/// `Unavailable` and `SubscriptionLost` are transport-level and may clear on
/// retry; `Rejected` and `NotFound` will not without different inputs.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum StoreError {
    #[error("remote store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("remote store rejected the operation: {reason}")]
    Rejected { reason: String },

    #[error("no row `{id}` in `{table}`")]
    NotFound { table: &'static str, id: String },

    #[error("change subscription lost")]
    SubscriptionLost,
}

impl StoreError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::SubscriptionLost)
    }
}

/// Tables covered by the change feed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchedTable {
    Vehicles,
    Settings,
}

impl WatchedTable {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vehicles => "vehicles",
            Self::Settings => "settings",
        }
    }
}

impl fmt::Display for WatchedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row-change kind. Carries no payload: the consumer must treat every event
/// as "something changed, re-read everything".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// One change notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: WatchedTable,
    pub kind: ChangeKind,
}

/// A live change feed over both watched tables.
///
/// Dropping the subscription releases the channel; the store prunes dead
/// subscribers on its next broadcast.
pub struct ChangeSubscription {
    receiver: Receiver<ChangeEvent>,
}

impl ChangeSubscription {
    pub fn new(receiver: Receiver<ChangeEvent>) -> Self {
        Self { receiver }
    }

    pub fn recv(&self) -> Result<ChangeEvent, RecvError> {
        self.receiver.recv()
    }

    pub fn try_recv(&self) -> Result<ChangeEvent, TryRecvError> {
        self.receiver.try_recv()
    }

    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<ChangeEvent, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Raw receiver, for `select!` against a stop channel.
    pub fn receiver(&self) -> &Receiver<ChangeEvent> {
        &self.receiver
    }
}

/// Audit action kind. Wire literals are the remote enum values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    #[serde(rename = "CRIAR")]
    Criar,
    #[serde(rename = "EDITAR")]
    Editar,
    #[serde(rename = "EXCLUIR")]
    Excluir,
    #[serde(rename = "LOGIN")]
    Login,
    #[serde(rename = "CONFIG")]
    Config,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Criar => "CRIAR",
            Self::Editar => "EDITAR",
            Self::Excluir => "EXCLUIR",
            Self::Login => "LOGIN",
            Self::Config => "CONFIG",
        }
    }
}

/// One visit row. `id` and `created_at` are assigned by the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccessRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub ip: String,
    pub location: String,
    /// Packed JSON blob with user agent, platform, screen, language, ISP,
    /// timezone and coordinates. Kept opaque so the schema never changes.
    pub device_info: String,
    pub device_type: DeviceType,
    #[serde(
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub created_at: Option<OffsetDateTime>,
}

/// One admin-action row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_email: String,
    pub action_type: ActionKind,
    pub target: String,
    pub details: String,
    #[serde(
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub created_at: Option<OffsetDateTime>,
}

/// Typed CRUD operations against the remote collection, the singleton
/// settings record, and the analytics tables.
///
/// All operations may fail with `Unavailable` or `Rejected`; none retries.
pub trait CatalogStore: Send + Sync {
    /// Every vehicle, in remote order. An empty remote collection yields an
    /// empty vec, never an error.
    fn all_vehicles(&self) -> Result<Vec<Vehicle>, StoreError>;

    /// The singleton settings record, created implicitly on first read if
    /// absent.
    fn settings(&self) -> Result<AppSettings, StoreError>;

    fn save_vehicle(&self, vehicle: &Vehicle) -> Result<(), StoreError>;

    /// Partial-field merge into an existing row.
    fn update_vehicle(&self, id: &VehicleId, patch: &VehiclePatch) -> Result<(), StoreError>;

    fn delete_vehicle(&self, id: &VehicleId) -> Result<(), StoreError>;

    /// Full-record replace of the singleton settings row.
    fn save_settings(&self, settings: &AppSettings) -> Result<(), StoreError>;

    /// Precomputed running visit total. Errors when the stats record is
    /// absent; callers fall back to `count_access_logs`.
    fn visit_total(&self) -> Result<u64, StoreError>;

    /// Raw count of visit rows.
    fn count_access_logs(&self) -> Result<u64, StoreError>;

    fn log_visit(&self, record: &AccessRecord) -> Result<(), StoreError>;

    fn log_action(&self, record: &AuditRecord) -> Result<(), StoreError>;

    /// Most recent visit rows, newest first.
    fn access_logs(&self, limit: usize) -> Result<Vec<AccessRecord>, StoreError>;

    /// Most recent admin-action rows, newest first.
    fn audit_logs(&self, limit: usize) -> Result<Vec<AuditRecord>, StoreError>;

    fn delete_access_log(&self, id: &str) -> Result<(), StoreError>;

    fn clear_access_logs(&self) -> Result<(), StoreError>;

    fn delete_audit_log(&self, id: &str) -> Result<(), StoreError>;

    fn clear_audit_logs(&self) -> Result<(), StoreError>;

    /// One subscription over both watched tables.
    fn watch(&self) -> Result<ChangeSubscription, StoreError>;
}
