//! Derived view partitioning.
//!
//! A pure function of (collection, category, search) producing the named
//! overlapping views the showroom renders. Derived state only - always
//! recomputable from the authoritative collection, never stored remotely.
//!
//! Precedence policy:
//! - featured wins over weekly promo: a featured vehicle is suppressed from
//!   the promo view so the two carousels are disjoint;
//! - the stock views do NOT exclude featured/promo vehicles: a vehicle may
//!   appear in a carousel and a stock grid at once;
//! - sold vehicles appear in `base` but in no further view;
//! - `recent` is a display cap over `base` minus sold, not a recency sort.

use super::domain::CategoryFilter;
use super::vehicle::Vehicle;

/// Default display cap for the recent view. One display variant uses 12.
pub const DEFAULT_RECENT_CAP: usize = 10;

/// The fixed set of named sequences derived from one input triple.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DerivedViews {
    /// Search ∧ category, original insertion order. Every other view is a
    /// subsequence of this one.
    pub base: Vec<Vehicle>,
    pub featured: Vec<Vehicle>,
    pub weekly_promo: Vec<Vehicle>,
    pub moto_stock: Vec<Vehicle>,
    pub car_stock: Vec<Vehicle>,
    pub recent: Vec<Vehicle>,
}

/// Case-insensitive substring match; empty search matches all.
fn matches_search(vehicle: &Vehicle, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    vehicle
        .name
        .to_lowercase()
        .contains(&search.to_lowercase())
}

/// Compute all derived views from scratch.
pub fn derive(
    vehicles: &[Vehicle],
    filter: CategoryFilter,
    search: &str,
    recent_cap: usize,
) -> DerivedViews {
    let base: Vec<Vehicle> = vehicles
        .iter()
        .filter(|v| matches_search(v, search) && filter.matches(v))
        .cloned()
        .collect();

    let featured = base
        .iter()
        .filter(|v| v.is_featured && !v.is_sold)
        .cloned()
        .collect();
    let weekly_promo = base
        .iter()
        .filter(|v| v.is_promo_semana && !v.is_featured && !v.is_sold)
        .cloned()
        .collect();
    let moto_stock = base
        .iter()
        .filter(|v| v.vehicle_type == super::VehicleType::Moto && !v.is_sold)
        .cloned()
        .collect();
    let car_stock = base
        .iter()
        .filter(|v| v.vehicle_type == super::VehicleType::Carro && !v.is_sold)
        .cloned()
        .collect();
    let recent = base
        .iter()
        .filter(|v| !v.is_sold)
        .take(recent_cap)
        .cloned()
        .collect();

    DerivedViews {
        base,
        featured,
        weekly_promo,
        moto_stock,
        car_stock,
        recent,
    }
}

/// Memoized view computation keyed on the full input triple.
///
/// Recomputes only when the collection, the active category, or the search
/// string changes; otherwise hands back the cached partition.
#[derive(Debug)]
pub struct ViewEngine {
    recent_cap: usize,
    key: Option<(Vec<Vehicle>, CategoryFilter, String)>,
    views: DerivedViews,
}

impl Default for ViewEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewEngine {
    pub fn new() -> Self {
        Self::with_recent_cap(DEFAULT_RECENT_CAP)
    }

    pub fn with_recent_cap(recent_cap: usize) -> Self {
        Self {
            recent_cap,
            key: None,
            views: DerivedViews::default(),
        }
    }

    /// Views for the given inputs, recomputing only on change.
    pub fn views(
        &mut self,
        vehicles: &[Vehicle],
        filter: CategoryFilter,
        search: &str,
    ) -> &DerivedViews {
        let hit = self
            .key
            .as_ref()
            .is_some_and(|(v, f, s)| v == vehicles && *f == filter && s == search);
        if !hit {
            self.views = derive(vehicles, filter, search, self.recent_cap);
            self.key = Some((vehicles.to_vec(), filter, search.to_string()));
        }
        &self.views
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{VehicleId, VehicleType};

    fn vehicle(id: &str, name: &str, t: VehicleType) -> Vehicle {
        Vehicle::new(VehicleId::new(id).unwrap(), name, t)
    }

    #[test]
    fn empty_search_matches_all() {
        let v = vehicle("a", "Fazer 250", VehicleType::Moto);
        assert!(matches_search(&v, ""));
        assert!(matches_search(&v, "fazer"));
        assert!(matches_search(&v, "FAZER"));
        assert!(!matches_search(&v, "onix"));
    }

    #[test]
    fn memoization_recomputes_only_on_input_change() {
        let vehicles = vec![vehicle("a", "Fazer 250", VehicleType::Moto)];
        let mut engine = ViewEngine::new();

        let first = engine.views(&vehicles, CategoryFilter::All, "").clone();
        let second = engine.views(&vehicles, CategoryFilter::All, "").clone();
        assert_eq!(first, second);

        let filtered = engine.views(&vehicles, CategoryFilter::Carros, "");
        assert!(filtered.base.is_empty());
    }

    #[test]
    fn recent_cap_truncates_in_original_order() {
        let vehicles: Vec<Vehicle> = (0..15)
            .map(|i| vehicle(&format!("v{i}"), &format!("Moto {i}"), VehicleType::Moto))
            .collect();
        let views = derive(&vehicles, CategoryFilter::All, "", 10);
        assert_eq!(views.recent.len(), 10);
        assert_eq!(views.recent[0].id.as_str(), "v0");
        assert_eq!(views.recent[9].id.as_str(), "v9");
    }
}
