//! Trucks, placements and solutions.

use std::collections::HashSet;

use crate::geometry;
use crate::item::{Dims, Item};
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The minimum corner of a placed box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl Position {
    /// Creates a new position.
    pub fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }
}

/// An item placed at a position, occupying the item's current orientation.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    /// The placed item; its current dimensions are the occupied orientation.
    pub item: Item,
    /// The minimum corner of the occupied box.
    pub position: Position,
}

impl Placement {
    /// Creates a new placement.
    pub fn new(item: Item, position: Position) -> Self {
        Self { item, position }
    }

    /// Returns the occupied dimensions.
    pub fn dims(&self) -> Dims {
        self.item.current_dims()
    }

    /// Returns the maximum corner (position + occupied dimensions).
    pub fn max_corner(&self) -> Position {
        let d = self.dims();
        Position::new(
            self.position.x + d.length,
            self.position.y + d.width,
            self.position.z + d.height,
        )
    }
}

/// A truck with a fixed envelope and its placed items.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Truck {
    dims: Dims,
    placements: Vec<Placement>,
}

impl Truck {
    /// Creates an empty truck with the given envelope.
    pub fn new(dims: Dims) -> Self {
        Self {
            dims,
            placements: Vec::new(),
        }
    }

    /// Returns the truck envelope.
    pub fn dims(&self) -> Dims {
        self.dims
    }

    /// Returns the placements in this truck.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Returns true if nothing is loaded.
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Returns the number of placements.
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Returns the total volume of placed items.
    pub fn used_volume(&self) -> i64 {
        self.placements.iter().map(|p| p.dims().volume()).sum()
    }

    /// Returns the envelope volume.
    pub fn capacity(&self) -> i64 {
        self.dims.volume()
    }

    /// Returns the utilization percentage.
    pub fn utilization(&self) -> f64 {
        if self.capacity() == 0 {
            return 0.0;
        }
        self.used_volume() as f64 / self.capacity() as f64 * 100.0
    }

    /// Returns true if a box at `pos` with `dims` would collide with an
    /// existing placement.
    pub fn collides(&self, pos: Position, dims: Dims) -> bool {
        self.placements
            .iter()
            .any(|p| geometry::boxes_overlap(pos, dims, p.position, p.dims()))
    }

    /// Finds the lowest, leftmost, deepest valid position for a box of the
    /// given dimensions.
    ///
    /// Candidate positions are scanned on the unit grid in lexicographic
    /// `(z, x, y)` order; the first collision-free, gravity-supported
    /// position wins.
    pub fn find_position(&self, dims: Dims) -> Option<Position> {
        if !dims.fits_within(&self.dims) {
            return None;
        }

        for z in 0..=(self.dims.height - dims.height) {
            for x in 0..=(self.dims.length - dims.length) {
                for y in 0..=(self.dims.width - dims.width) {
                    let pos = Position::new(x, y, z);
                    if !self.collides(pos, dims)
                        && geometry::is_supported(pos, dims, &self.placements)
                    {
                        return Some(pos);
                    }
                }
            }
        }
        None
    }

    /// Tries to place an item into this truck.
    ///
    /// Orientations are tried in canonical order; for each orientation that
    /// fits the envelope, the position search runs, and the first
    /// orientation with a valid position is taken. The item is consumed and
    /// dropped if no placement exists.
    pub fn try_place(&mut self, mut item: Item) -> bool {
        for dims in geometry::orientations(&item.original_dims()) {
            if !dims.fits_within(&self.dims) {
                continue;
            }
            if let Some(pos) = self.find_position(dims) {
                item.set_current_dims(dims);
                self.placements.push(Placement::new(item, pos));
                return true;
            }
        }
        false
    }

    /// Appends a placement without any validity checks.
    pub fn push(&mut self, placement: Placement) {
        self.placements.push(placement);
    }

    /// Removes and returns the placement at `idx`.
    pub fn remove(&mut self, idx: usize) -> Placement {
        self.placements.remove(idx)
    }

    /// Returns true if every placement satisfies the gravity rule against
    /// the truck's current contents.
    pub fn all_supported(&self) -> bool {
        self.placements
            .iter()
            .all(|p| geometry::is_supported(p.position, p.dims(), &self.placements))
    }
}

/// An ordered list of trucks holding all placed items.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Solution {
    trucks: Vec<Truck>,
}

impl Solution {
    /// Creates an empty solution.
    pub fn new() -> Self {
        Self { trucks: Vec::new() }
    }

    /// Returns the trucks.
    pub fn trucks(&self) -> &[Truck] {
        &self.trucks
    }

    /// Returns mutable access to the trucks.
    pub fn trucks_mut(&mut self) -> &mut Vec<Truck> {
        &mut self.trucks
    }

    /// Returns the number of trucks.
    pub fn num_trucks(&self) -> usize {
        self.trucks.len()
    }

    /// Returns the total number of placed items.
    pub fn item_count(&self) -> usize {
        self.trucks.iter().map(Truck::len).sum()
    }

    /// Opens a new truck and returns its index.
    pub fn open_truck(&mut self, dims: Dims) -> usize {
        self.trucks.push(Truck::new(dims));
        self.trucks.len() - 1
    }

    /// Drops trucks that hold no items.
    pub fn trim_empty(&mut self) {
        self.trucks.retain(|t| !t.is_empty());
    }

    /// Returns the average utilization percentage across trucks.
    pub fn average_utilization(&self) -> f64 {
        if self.trucks.is_empty() {
            return 0.0;
        }
        self.trucks.iter().map(Truck::utilization).sum::<f64>() / self.trucks.len() as f64
    }

    /// Scores the solution; lower is better.
    ///
    /// `trucks × 1000 + (100 − average utilization)`: the multiplier makes
    /// the truck count strictly dominate, so utilization only breaks ties
    /// between solutions with equal truck counts. An empty solution scores
    /// infinity.
    pub fn score(&self) -> f64 {
        if self.trucks.is_empty() {
            return f64::INFINITY;
        }
        self.trucks.len() as f64 * 1000.0 + (100.0 - self.average_utilization())
    }

    /// Checks the packing invariants against the instance.
    ///
    /// Verifies, per truck: pairwise non-overlap, envelope containment,
    /// orientation validity and gravity support; and globally that every
    /// input item appears in exactly one placement.
    pub fn validate(&self, truck_dims: Dims, items: &[Item]) -> Result<()> {
        let mut seen: HashSet<usize> = HashSet::new();

        for (truck_id, truck) in self.trucks.iter().enumerate() {
            for p in truck.placements() {
                let dims = p.dims();
                let pos = p.position;

                if dims.sorted() != p.item.original_dims().sorted() {
                    return Err(Error::InvalidSolution(format!(
                        "item {}: occupied dims {:?} are not a permutation of the original",
                        p.item.id(),
                        dims
                    )));
                }

                if pos.x < 0
                    || pos.y < 0
                    || pos.z < 0
                    || pos.x + dims.length > truck_dims.length
                    || pos.y + dims.width > truck_dims.width
                    || pos.z + dims.height > truck_dims.height
                {
                    return Err(Error::InvalidSolution(format!(
                        "item {} exceeds the envelope of truck {}",
                        p.item.id(),
                        truck_id
                    )));
                }

                if !geometry::is_supported(pos, dims, truck.placements()) {
                    return Err(Error::InvalidSolution(format!(
                        "item {} in truck {} is not gravity-supported",
                        p.item.id(),
                        truck_id
                    )));
                }

                if !seen.insert(p.item.id()) {
                    return Err(Error::InvalidSolution(format!(
                        "item {} is placed more than once",
                        p.item.id()
                    )));
                }
            }

            let ps = truck.placements();
            for i in 0..ps.len() {
                for j in (i + 1)..ps.len() {
                    if geometry::boxes_overlap(
                        ps[i].position,
                        ps[i].dims(),
                        ps[j].position,
                        ps[j].dims(),
                    ) {
                        return Err(Error::InvalidSolution(format!(
                            "items {} and {} overlap in truck {}",
                            ps[i].item.id(),
                            ps[j].item.id(),
                            truck_id
                        )));
                    }
                }
            }
        }

        for item in items {
            if !seen.contains(&item.id()) {
                return Err(Error::InvalidSolution(format!(
                    "item {} is missing from the solution",
                    item.id()
                )));
            }
        }
        if seen.len() != items.len() {
            return Err(Error::InvalidSolution(format!(
                "solution places {} items but the instance has {}",
                seen.len(),
                items.len()
            )));
        }

        Ok(())
    }
}
