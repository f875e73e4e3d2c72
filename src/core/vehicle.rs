//! The catalog entity.
//!
//! Vehicle: identity + display attributes + independent classification flags
//! VehiclePatch: all-optional partial update (remote-side merge)

use serde::{Deserialize, Serialize};

use super::domain::VehicleType;
use super::identity::VehicleId;

/// Listed price: a numeric amount, or a label preformatted upstream
/// ("Consulte", "R$ 12.900 à vista").
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Amount(f64),
    Label(String),
}

impl Default for Price {
    fn default() -> Self {
        Price::Label(String::new())
    }
}

/// A single catalog item.
///
/// Classification flags are independent, not mutually exclusive: a vehicle
/// may be simultaneously featured and sold. Field names mirror the remote
/// schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: VehicleId,
    pub name: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub km: Option<u64>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub image_position: Option<String>,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_promo_semana: bool,
    #[serde(default)]
    pub is_promo_mes: bool,
    #[serde(default)]
    pub is_zero_km: bool,
    #[serde(default)]
    pub is_repasse: bool,
    #[serde(default)]
    pub is_sold: bool,
}

impl Vehicle {
    /// New vehicle with all flags cleared.
    pub fn new(id: VehicleId, name: impl Into<String>, vehicle_type: VehicleType) -> Self {
        Self {
            id,
            name: name.into(),
            price: Price::default(),
            year: None,
            km: None,
            image_url: String::new(),
            video_url: None,
            image_position: None,
            vehicle_type,
            is_featured: false,
            is_promo_semana: false,
            is_promo_mes: false,
            is_zero_km: false,
            is_repasse: false,
            is_sold: false,
        }
    }

    /// Either promotional flag set.
    pub fn is_promo(&self) -> bool {
        self.is_promo_semana || self.is_promo_mes
    }
}

/// Partial update. The remote side merges set fields into the existing row;
/// unset fields are untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub km: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_position: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<VehicleType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_promo_semana: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_promo_mes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_zero_km: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_repasse: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_sold: Option<bool>,
}

impl VehiclePatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merge this patch into a vehicle. Mirrors the remote-side merge so the
    /// in-memory store behaves like the real one.
    pub fn apply_to(&self, vehicle: &mut Vehicle) {
        if let Some(name) = &self.name {
            vehicle.name = name.clone();
        }
        if let Some(price) = &self.price {
            vehicle.price = price.clone();
        }
        if let Some(year) = self.year {
            vehicle.year = Some(year);
        }
        if let Some(km) = self.km {
            vehicle.km = Some(km);
        }
        if let Some(url) = &self.image_url {
            vehicle.image_url = url.clone();
        }
        if let Some(url) = &self.video_url {
            vehicle.video_url = Some(url.clone());
        }
        if let Some(pos) = &self.image_position {
            vehicle.image_position = Some(pos.clone());
        }
        if let Some(t) = self.vehicle_type {
            vehicle.vehicle_type = t;
        }
        if let Some(b) = self.is_featured {
            vehicle.is_featured = b;
        }
        if let Some(b) = self.is_promo_semana {
            vehicle.is_promo_semana = b;
        }
        if let Some(b) = self.is_promo_mes {
            vehicle.is_promo_mes = b;
        }
        if let Some(b) = self.is_zero_km {
            vehicle.is_zero_km = b;
        }
        if let Some(b) = self.is_repasse {
            vehicle.is_repasse = b;
        }
        if let Some(b) = self.is_sold {
            vehicle.is_sold = b;
        }
    }
}
