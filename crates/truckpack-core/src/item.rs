//! Items and box dimensions.

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned box dimensions (length, width, height).
///
/// All instance data is integer-valued, so dimensions and coordinates are
/// kept as `i64` throughout the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dims {
    /// Extent along the x axis.
    pub length: i64,
    /// Extent along the y axis.
    pub width: i64,
    /// Extent along the z axis.
    pub height: i64,
}

impl Dims {
    /// Creates new dimensions.
    pub fn new(length: i64, width: i64, height: i64) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    /// Returns the enclosed volume.
    pub fn volume(&self) -> i64 {
        self.length * self.width * self.height
    }

    /// Returns the base footprint area (length × width).
    pub fn footprint(&self) -> i64 {
        self.length * self.width
    }

    /// Returns true if every axis fits within the corresponding axis of
    /// `outer`.
    pub fn fits_within(&self, outer: &Dims) -> bool {
        self.length <= outer.length && self.width <= outer.width && self.height <= outer.height
    }

    /// Returns the dimensions sorted ascending, for permutation checks.
    pub fn sorted(&self) -> (i64, i64, i64) {
        let mut axes = [self.length, self.width, self.height];
        axes.sort();
        (axes[0], axes[1], axes[2])
    }

    /// Validates that all axes are positive.
    pub fn validate(&self) -> Result<()> {
        if self.length <= 0 || self.width <= 0 || self.height <= 0 {
            return Err(Error::InvalidItem(format!(
                "all dimensions must be positive, got {}x{}x{}",
                self.length, self.width, self.height
            )));
        }
        Ok(())
    }
}

/// A cuboid item to be loaded into a truck.
///
/// `id` and the original dimensions are fixed at construction; the current
/// dimensions hold the orientation the item presently occupies and are
/// rewritten whenever the engine rotates it. Identity is by `id` only.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Item {
    id: usize,
    original: Dims,
    current: Dims,
    delivery_order: Option<u32>,
}

impl Item {
    /// Creates a new item. The id is the item's position in the input.
    pub fn new(id: usize, dims: Dims) -> Self {
        Self {
            id,
            original: dims,
            current: dims,
            delivery_order: None,
        }
    }

    /// Sets the delivery-order tag.
    pub fn with_delivery_order(mut self, order: u32) -> Self {
        self.delivery_order = Some(order);
        self
    }

    /// Returns the item id.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the dimensions as given in the input.
    pub fn original_dims(&self) -> Dims {
        self.original
    }

    /// Returns the dimensions of the currently occupied orientation.
    pub fn current_dims(&self) -> Dims {
        self.current
    }

    /// Rotates the item to occupy the given orientation.
    pub fn set_current_dims(&mut self, dims: Dims) {
        self.current = dims;
    }

    /// Returns the delivery-order tag, if any.
    pub fn delivery_order(&self) -> Option<u32> {
        self.delivery_order
    }

    /// Returns the item volume (orientation-independent).
    pub fn volume(&self) -> i64 {
        self.original.volume()
    }

    /// Validates the item definition.
    pub fn validate(&self) -> Result<()> {
        self.original.validate().map_err(|_| {
            Error::InvalidItem(format!(
                "item {}: all dimensions must be positive, got {}x{}x{}",
                self.id, self.original.length, self.original.width, self.original.height
            ))
        })
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Item {}
