#![forbid(unsafe_code)]

pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod store;
pub mod telemetry;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

// Re-export core types at crate root for convenience
pub use crate::config::{ConfigError, EngineConfig};
pub use crate::core::{
    AppSettings, CardImageFit, CategoryFilter, CoreError, DerivedViews, DeviceType, Price,
    UserEmail, Vehicle, VehicleId, VehiclePatch, VehicleType, ViewEngine,
};
pub use crate::engine::{
    CatalogEngine, CatalogState, ClientInfo, DeleteDecision, DeleteOutcome, EngineError, GeoInfo,
    GeoLookup, GeoLookupError, MemorySession, NoGeoLookup, Optimism, SessionMarker, VisitGate,
    WriteKind,
};
pub use crate::store::{
    AccessRecord, ActionKind, AuditRecord, CatalogStore, ChangeEvent, ChangeKind,
    ChangeSubscription, MemoryStore, StoreError, WatchedTable,
};
