use std::collections::BTreeMap;

use crate::types::{Alignment, Bounds, Item};

/// `DoesNotFit` hands the item back so it can be retried in a fresh layer.
#[derive(Debug, Clone, Copy)]
pub enum PlacementOutcome {
    Placed(Item),
    DoesNotFit(Item),
}

impl PlacementOutcome {
    pub fn is_placed(&self) -> bool {
        matches!(self, PlacementOutcome::Placed(_))
    }
}

/// A placement strategy bound to one open layer. Items with a zero extent
/// are always rejected.
pub trait Placer {
    fn open(bounds: Bounds, z: u32) -> Self
    where
        Self: Sized;

    fn place(&mut self, item: Item) -> PlacementOutcome;

    fn layer(&self) -> &Layer;

    fn into_layer(self) -> Layer
    where
        Self: Sized;
}

#[derive(Debug, Clone)]
pub struct Layer {
    pub z: u32,
    pub max_x: u32,
    pub max_y: u32,
    // z - 1 while empty
    pub max_z: u32,
    items: BTreeMap<(u32, u32), Item>,
}

impl Layer {
    pub fn new(z: u32) -> Self {
        Self {
            z,
            max_x: 0,
            max_y: 0,
            max_z: z.saturating_sub(1),
            items: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, item: Item) {
        self.max_x = self.max_x.max(item.x2());
        self.max_y = self.max_y.max(item.y2());
        self.max_z = self.max_z.max(item.z2());
        // placers never hand over an empty footprint, so corners are unique
        let previous = self.items.insert((item.x1(), item.y1()), item);
        debug_assert!(previous.is_none(), "two items placed at ({}, {})", item.x1(), item.y1());
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn depth(&self) -> u32 {
        if self.items.is_empty() {
            0
        } else {
            self.max_z - self.z + 1
        }
    }

    /// With `Top`, every item is raised until its top face touches `max_z`.
    pub(crate) fn align(&mut self, alignment: Alignment) {
        if alignment == Alignment::Bottom {
            return;
        }
        let top = self.max_z;
        for item in self.items.values_mut() {
            item.set_z(top - item.depth() + 1);
        }
    }

    pub(crate) fn flip(&mut self) {
        let (bottom, top) = (self.z, self.max_z);
        for item in self.items.values_mut() {
            item.set_z(bottom + top - item.z2());
        }
    }

    pub(crate) fn shift(&mut self, dz: u32) {
        self.z += dz;
        self.max_z += dz;
        for item in self.items.values_mut() {
            item.set_z(item.z1() + dz);
        }
    }
}
