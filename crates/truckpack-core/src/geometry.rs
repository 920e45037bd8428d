//! Axis-aligned collision and support geometry.

use crate::item::Dims;
use crate::solution::{Placement, Position};

/// Returns the six axis-aligned orientations of a box, in canonical order.
///
/// Boxes with equal axes produce duplicate entries; they are not
/// de-duplicated, so a cube still yields six (identical) orientations.
pub fn orientations(d: &Dims) -> [Dims; 6] {
    [
        Dims::new(d.length, d.width, d.height),
        Dims::new(d.length, d.height, d.width),
        Dims::new(d.width, d.length, d.height),
        Dims::new(d.width, d.height, d.length),
        Dims::new(d.height, d.length, d.width),
        Dims::new(d.height, d.width, d.length),
    ]
}

/// Tests whether two axis-aligned boxes overlap in volume.
///
/// Intervals are half-open `[p, p + extent)`: boxes sharing only a face do
/// not overlap.
pub fn boxes_overlap(a_pos: Position, a: Dims, b_pos: Position, b: Dims) -> bool {
    let overlap_x = a_pos.x + a.length > b_pos.x && b_pos.x + b.length > a_pos.x;
    let overlap_y = a_pos.y + a.width > b_pos.y && b_pos.y + b.width > a_pos.y;
    let overlap_z = a_pos.z + a.height > b_pos.z && b_pos.z + b.height > a_pos.z;
    overlap_x && overlap_y && overlap_z
}

/// Computes the supported base area of a candidate box against a set of
/// placements.
///
/// A box resting on the floor (`z == 0`) counts its full footprint. Above
/// the floor, only placements whose top face sits exactly at the candidate's
/// base z contribute, each by its x-y overlap area. The z comparison is
/// exact integer equality; a box hovering one unit above another receives no
/// support from it.
pub fn supported_area(pos: Position, dims: Dims, placements: &[Placement]) -> i64 {
    if pos.z == 0 {
        return dims.footprint();
    }

    let mut supported = 0;
    for p in placements {
        let p_dims = p.dims();
        if p.position.z + p_dims.height != pos.z {
            continue;
        }

        let x0 = pos.x.max(p.position.x);
        let x1 = (pos.x + dims.length).min(p.position.x + p_dims.length);
        let y0 = pos.y.max(p.position.y);
        let y1 = (pos.y + dims.width).min(p.position.y + p_dims.width);

        if x1 > x0 && y1 > y0 {
            supported += (x1 - x0) * (y1 - y0);
        }
    }
    supported
}

/// Tests the gravity rule: at least 50% of the footprint must rest on the
/// floor or on the top faces of placements directly below.
pub fn is_supported(pos: Position, dims: Dims, placements: &[Placement]) -> bool {
    2 * supported_area(pos, dims, placements) >= dims.footprint()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;

    fn placement(id: usize, dims: Dims, x: i64, y: i64, z: i64) -> Placement {
        let mut item = Item::new(id, dims);
        item.set_current_dims(dims);
        Placement::new(item, Position::new(x, y, z))
    }

    #[test]
    fn test_orientations_canonical_order() {
        let orients = orientations(&Dims::new(1, 2, 3));
        assert_eq!(orients[0], Dims::new(1, 2, 3));
        assert_eq!(orients[1], Dims::new(1, 3, 2));
        assert_eq!(orients[2], Dims::new(2, 1, 3));
        assert_eq!(orients[3], Dims::new(2, 3, 1));
        assert_eq!(orients[4], Dims::new(3, 1, 2));
        assert_eq!(orients[5], Dims::new(3, 2, 1));
    }

    #[test]
    fn test_orientations_cube_not_deduplicated() {
        let orients = orientations(&Dims::new(5, 5, 5));
        assert_eq!(orients.len(), 6);
        assert!(orients.iter().all(|d| *d == Dims::new(5, 5, 5)));
    }

    #[test]
    fn test_boxes_overlap() {
        let d = Dims::new(10, 10, 10);
        let a = Position::new(0, 0, 0);
        assert!(boxes_overlap(a, d, Position::new(5, 5, 5), d));
        assert!(!boxes_overlap(a, d, Position::new(20, 0, 0), d));
    }

    #[test]
    fn test_touching_faces_do_not_overlap() {
        let d = Dims::new(10, 10, 10);
        let a = Position::new(0, 0, 0);
        assert!(!boxes_overlap(a, d, Position::new(10, 0, 0), d));
        assert!(!boxes_overlap(a, d, Position::new(0, 10, 0), d));
        assert!(!boxes_overlap(a, d, Position::new(0, 0, 10), d));
    }

    #[test]
    fn test_floor_gives_full_support() {
        let dims = Dims::new(10, 10, 10);
        assert_eq!(supported_area(Position::new(3, 4, 0), dims, &[]), 100);
        assert!(is_supported(Position::new(3, 4, 0), dims, &[]));
    }

    #[test]
    fn test_support_from_box_below() {
        let below = placement(0, Dims::new(10, 10, 10), 0, 0, 0);

        // Fully on top: full support.
        let dims = Dims::new(10, 10, 10);
        let on_top = Position::new(0, 0, 10);
        assert_eq!(supported_area(on_top, dims, &[below.clone()]), 100);

        // Half overhang: exactly 50%, still supported.
        let half = Position::new(5, 0, 10);
        assert_eq!(supported_area(half, dims, &[below.clone()]), 50);
        assert!(is_supported(half, dims, &[below.clone()]));

        // More than half overhanging: unsupported.
        let over = Position::new(6, 0, 10);
        assert_eq!(supported_area(over, dims, &[below.clone()]), 40);
        assert!(!is_supported(over, dims, &[below]));
    }

    #[test]
    fn test_support_requires_exact_top_contact() {
        // Box below tops out at z=10; candidate base at z=11 gets nothing.
        let below = placement(0, Dims::new(10, 10, 10), 0, 0, 0);
        let dims = Dims::new(10, 10, 10);
        assert_eq!(supported_area(Position::new(0, 0, 11), dims, &[below]), 0);
    }

    #[test]
    fn test_support_sums_across_boxes() {
        // Two 5-wide boxes side by side jointly support a 10-wide box.
        let left = placement(0, Dims::new(5, 10, 10), 0, 0, 0);
        let right = placement(1, Dims::new(5, 10, 10), 5, 0, 0);
        let dims = Dims::new(10, 10, 10);
        let pos = Position::new(0, 0, 10);
        assert_eq!(supported_area(pos, dims, &[left.clone(), right.clone()]), 100);
        assert!(is_supported(pos, dims, &[left, right]));
    }
}
