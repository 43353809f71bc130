use crate::layer::{Layer, PlacementOutcome, Placer};
use crate::types::{Bounds, Item};

/// Row-by-row baseline: items go left to right at a cursor, and a new row
/// starts above the tallest item so far once the row is full. Never rotates
/// and never reuses space.
#[derive(Debug, Clone)]
pub struct CursorLayer {
    bounds: Bounds,
    // u64 so a row that ends on the last column can still point past it
    cursor_x: u64,
    cursor_y: u64,
    row_max_x: u32,
    layer: Layer,
}

impl CursorLayer {
    pub fn new(bounds: Bounds, z: u32) -> Self {
        Self {
            bounds,
            cursor_x: 1,
            cursor_y: 1,
            row_max_x: 0,
            layer: Layer::new(z),
        }
    }

    pub fn cursor(&self) -> (u64, u64) {
        (self.cursor_x, self.cursor_y)
    }

    /// Right edge of the current row.
    pub fn row_extent(&self) -> u32 {
        self.row_max_x
    }

    fn fits_at(&self, item: &Item, x: u64, y: u64) -> bool {
        u64::from(item.width()) <= room(x, self.bounds.max_x)
            && u64::from(item.length()) <= room(y, self.bounds.max_y)
    }
}

/// Cells left in `[from, max]`.
fn room(from: u64, max: u32) -> u64 {
    (u64::from(max) + 1).saturating_sub(from)
}

impl Placer for CursorLayer {
    fn open(bounds: Bounds, z: u32) -> Self {
        Self::new(bounds, z)
    }

    fn place(&mut self, item: Item) -> PlacementOutcome {
        if item.extents().contains(&0) {
            return PlacementOutcome::DoesNotFit(item);
        }

        let (mut x, mut y) = (self.cursor_x, self.cursor_y);
        let mut new_row = false;
        if u64::from(item.width()) > room(x, self.bounds.max_x) {
            x = 1;
            y = u64::from(self.layer.max_y) + 1;
            new_row = true;
        }
        if !self.fits_at(&item, x, y) {
            return PlacementOutcome::DoesNotFit(item);
        }

        // both fit in u32: each has at least one cell of room before the bound
        let placed = item.with_position(x as u32, y as u32, self.layer.z);
        if new_row {
            self.cursor_y = y;
            self.row_max_x = 0;
        }
        self.cursor_x = u64::from(placed.x2()) + 1;
        self.row_max_x = self.row_max_x.max(placed.x2());
        self.layer.insert(placed);

        PlacementOutcome::Placed(placed)
    }

    fn layer(&self) -> &Layer {
        &self.layer
    }

    fn into_layer(self) -> Layer {
        self.layer
    }
}
