//! Domain enums.
//!
//! VehicleType: moto, carro
//! CategoryFilter: all, motos, carros, promos
//! CardImageFit / DeviceType: presentation and analytics attributes

use serde::{Deserialize, Serialize};

/// Catalog entity kind. Wire literals are the remote enum values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VehicleType {
    Moto,
    Carro,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Moto => "MOTO",
            Self::Carro => "CARRO",
        }
    }
}

/// Active browsing category. Exactly one is active at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CategoryFilter {
    #[default]
    All,
    Motos,
    Carros,
    Promos,
}

impl CategoryFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Motos => "MOTOS",
            Self::Carros => "CARROS",
            Self::Promos => "PROMOS",
        }
    }

    /// Parse the wire literal, as carried in navigation state.
    pub fn parse(s: &str) -> Result<Self, super::CoreError> {
        match s {
            "ALL" => Ok(Self::All),
            "MOTOS" => Ok(Self::Motos),
            "CARROS" => Ok(Self::Carros),
            "PROMOS" => Ok(Self::Promos),
            _ => Err(super::error::InvalidFilter { raw: s.to_string() }.into()),
        }
    }

    /// Whether a vehicle of the given classification matches this category.
    ///
    /// `Promos` matches either promotional flag, independent of type.
    pub fn matches(&self, vehicle: &super::Vehicle) -> bool {
        match self {
            Self::All => true,
            Self::Motos => vehicle.vehicle_type == VehicleType::Moto,
            Self::Carros => vehicle.vehicle_type == VehicleType::Carro,
            Self::Promos => vehicle.is_promo_semana || vehicle.is_promo_mes,
        }
    }
}

/// How card images are rendered. Persisted in settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardImageFit {
    #[default]
    Cover,
    Contain,
}

/// Coarse device classification recorded with each visit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceType {
    Mobile,
    Desktop,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mobile => "Mobile",
            Self::Desktop => "Desktop",
        }
    }
}
