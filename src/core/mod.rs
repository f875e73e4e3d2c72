//! Domain model and pure catalog logic.
//!
//! identity: id atoms
//! domain: classification enums
//! vehicle: the catalog entity
//! settings: the singleton configuration record
//! views: derived view partitioning
//! contact / image: stateless formatting utilities

pub mod contact;
pub mod domain;
pub mod error;
pub mod identity;
pub mod image;
pub mod settings;
pub mod vehicle;
pub mod views;

pub use contact::{interest_link, sanitize_number, share_link};
pub use domain::{CardImageFit, CategoryFilter, DeviceType, VehicleType};
pub use error::CoreError;
pub use identity::{UserEmail, VehicleId};
pub use image::optimized_image_url;
pub use settings::AppSettings;
pub use vehicle::{Price, Vehicle, VehiclePatch};
pub use views::{DerivedViews, ViewEngine};
