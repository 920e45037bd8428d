//! First-fit placement engine.
//!
//! A single deterministic pass over an item sequence supplied by the
//! caller: each item goes into the first open truck that accepts it, trying
//! orientations in canonical order and positions lowest-leftmost-deepest.
//! The item ordering is the engine's only external degree of freedom; the
//! multi-start orchestrator varies it to diversify.

use crate::item::{Dims, Item};
use crate::solution::Solution;

/// Packs the items, in the given order, into as few trucks as first-fit
/// allows.
///
/// Opens a new truck whenever no existing truck accepts an item. Returns
/// `None` if an item cannot be placed even in a fresh truck; the
/// feasibility pre-check makes that impossible for well-formed instances,
/// but the engine refuses to return a partial packing regardless.
pub fn first_fit(truck_dims: Dims, ordered: &[Item]) -> Option<Solution> {
    let mut solution = Solution::new();

    for item in ordered {
        let mut placed = false;
        for truck in solution.trucks_mut() {
            if truck.try_place(item.clone()) {
                placed = true;
                break;
            }
        }

        if !placed {
            let idx = solution.open_truck(truck_dims);
            if !solution.trucks_mut()[idx].try_place(item.clone()) {
                return None;
            }
        }
    }

    Some(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::Position;

    fn item(id: usize, l: i64, w: i64, h: i64) -> Item {
        Item::new(id, Dims::new(l, w, h))
    }

    #[test]
    fn test_single_item() {
        let truck = Dims::new(100, 100, 100);
        let sol = first_fit(truck, &[item(0, 50, 50, 50)]).unwrap();
        assert_eq!(sol.num_trucks(), 1);
        assert_eq!(sol.trucks()[0].placements()[0].position, Position::new(0, 0, 0));
    }

    #[test]
    fn test_empty_input() {
        let sol = first_fit(Dims::new(10, 10, 10), &[]).unwrap();
        assert_eq!(sol.num_trucks(), 0);
    }

    #[test]
    fn test_exact_stack_uses_one_truck() {
        let truck = Dims::new(20, 20, 20);
        let items = vec![item(0, 20, 20, 10), item(1, 20, 20, 10)];
        let sol = first_fit(truck, &items).unwrap();
        assert_eq!(sol.num_trucks(), 1);
        assert_eq!(sol.trucks()[0].len(), 2);
        assert!(sol.validate(truck, &items).is_ok());
    }

    #[test]
    fn test_opens_second_truck_when_full() {
        let truck = Dims::new(10, 10, 10);
        let items = vec![item(0, 10, 10, 10), item(1, 10, 10, 10)];
        let sol = first_fit(truck, &items).unwrap();
        assert_eq!(sol.num_trucks(), 2);
    }

    #[test]
    fn test_oversized_item_yields_none() {
        let truck = Dims::new(10, 10, 10);
        assert!(first_fit(truck, &[item(0, 20, 10, 10)]).is_none());
    }

    #[test]
    fn test_deterministic_for_fixed_order() {
        let truck = Dims::new(30, 30, 30);
        let items: Vec<Item> = (0..6).map(|id| item(id, 10 + (id as i64 % 3) * 5, 10, 10)).collect();
        let a = first_fit(truck, &items).unwrap();
        let b = first_fit(truck, &items).unwrap();
        assert_eq!(a.num_trucks(), b.num_trucks());
        for (ta, tb) in a.trucks().iter().zip(b.trucks()) {
            for (pa, pb) in ta.placements().iter().zip(tb.placements()) {
                assert_eq!(pa.item.id(), pb.item.id());
                assert_eq!(pa.position, pb.position);
                assert_eq!(pa.dims(), pb.dims());
            }
        }
    }
}
