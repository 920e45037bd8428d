//! Volume lower bound and feasibility pre-check.

use crate::geometry::orientations;
use crate::item::{Dims, Item};

/// Computes the volume-based minimum number of trucks.
///
/// `ceil(total item volume / truck volume)`, floored at one when any item
/// exists and zero for an empty instance. This relaxation ignores geometry;
/// real packings may need strictly more trucks.
pub fn lower_bound(truck_dims: Dims, items: &[Item]) -> usize {
    if items.is_empty() {
        return 0;
    }
    let truck_volume = truck_dims.volume();
    let total: i64 = items.iter().map(Item::volume).sum();
    let bound = (total + truck_volume - 1) / truck_volume;
    bound.max(1) as usize
}

/// Checks that every item fits the truck envelope in at least one of its
/// six orientations, ignoring all other items.
///
/// A failure here means the instance is UNSAT outright; success is
/// necessary but not sufficient.
pub fn all_items_fit(truck_dims: Dims, items: &[Item]) -> bool {
    items.iter().all(|item| {
        orientations(&item.original_dims())
            .iter()
            .any(|dims| dims.fits_within(&truck_dims))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: usize, l: i64, w: i64, h: i64) -> Item {
        Item::new(id, Dims::new(l, w, h))
    }

    #[test]
    fn test_lower_bound_empty() {
        assert_eq!(lower_bound(Dims::new(10, 10, 10), &[]), 0);
    }

    #[test]
    fn test_lower_bound_rounds_up() {
        let truck = Dims::new(10, 10, 10);
        // 1500 volume over 1000 capacity -> 2 trucks.
        let items = vec![item(0, 10, 10, 10), item(1, 10, 10, 5)];
        assert_eq!(lower_bound(truck, &items), 2);
    }

    #[test]
    fn test_lower_bound_floors_at_one() {
        let truck = Dims::new(100, 100, 100);
        let items = vec![item(0, 1, 1, 1)];
        assert_eq!(lower_bound(truck, &items), 1);
    }

    #[test]
    fn test_exact_fill_is_tight() {
        let truck = Dims::new(20, 20, 20);
        let items = vec![item(0, 20, 20, 10), item(1, 20, 20, 10)];
        assert_eq!(lower_bound(truck, &items), 1);
    }

    #[test]
    fn test_all_items_fit_via_rotation() {
        let truck = Dims::new(10, 30, 10);
        // 30x10x10 fits only after rotation.
        assert!(all_items_fit(truck, &[item(0, 30, 10, 10)]));
    }

    #[test]
    fn test_oversized_item_fails_precheck() {
        let truck = Dims::new(10, 10, 10);
        assert!(!all_items_fit(truck, &[item(0, 20, 10, 10)]));
    }
}
