//! Deep-link resolution.
//!
//! The external id parameter is read once at startup and re-evaluated after
//! every collection change, but it only acts while nothing is focused: it
//! never overrides an existing focus and never fires when the parameter is
//! absent or unmatched.

use tracing::debug;

use crate::core::VehicleId;

use super::state::CatalogState;

/// Focus the targeted vehicle if the collection now contains it and nothing
/// is focused yet. Returns whether focus was set.
pub fn resolve(state: &mut CatalogState, target: Option<&VehicleId>) -> bool {
    let Some(target) = target else {
        return false;
    };
    if state.focused.is_some() {
        return false;
    }
    let Some(found) = state.vehicle(target).cloned() else {
        return false;
    };
    debug!(id = %found.id, "deep link focused vehicle");
    state.focused = Some(found);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Vehicle, VehicleType};

    fn state_with(ids: &[&str]) -> CatalogState {
        CatalogState {
            vehicles: ids
                .iter()
                .map(|id| {
                    Vehicle::new(VehicleId::new(*id).unwrap(), *id, VehicleType::Carro)
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn focuses_matching_id() {
        let mut state = state_with(&["a", "b"]);
        let target = VehicleId::new("b").unwrap();
        assert!(resolve(&mut state, Some(&target)));
        assert_eq!(state.focused.as_ref().map(|v| v.id.as_str()), Some("b"));
    }

    #[test]
    fn no_op_when_unmatched_or_absent() {
        let mut state = state_with(&["a", "b"]);
        let ghost = VehicleId::new("z").unwrap();
        assert!(!resolve(&mut state, Some(&ghost)));
        assert!(!resolve(&mut state, None));
        assert!(state.focused.is_none());
    }

    #[test]
    fn never_overrides_existing_focus() {
        let mut state = state_with(&["a", "b"]);
        let a = VehicleId::new("a").unwrap();
        let b = VehicleId::new("b").unwrap();
        assert!(resolve(&mut state, Some(&a)));
        assert!(!resolve(&mut state, Some(&b)));
        assert_eq!(state.focused.as_ref().map(|v| v.id.as_str()), Some("a"));
    }
}
