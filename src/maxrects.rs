use crate::layer::{Layer, PlacementOutcome, Placer};
use crate::types::{Bounds, Item, Rect};

/// One layer packed with the maximal-rectangles heuristic. Free rectangles
/// may overlap each other but never a placed item.
#[derive(Debug, Clone)]
pub struct MaxRectsLayer {
    pub free_rects: Vec<Rect>,
    layer: Layer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub free_idx: usize,
    pub rotated: bool,
    // resulting y2 of the item
    pub score: u32,
}

impl MaxRectsLayer {
    pub fn new(bounds: Bounds, z: u32) -> Self {
        Self {
            free_rects: vec![bounds.full()],
            layer: Layer::new(z),
        }
    }

    pub fn used_area(&self) -> u64 {
        self.layer.items().map(|i| i.footprint().area()).sum()
    }

    /// Lowest resulting y2 wins; ties go to the first candidate found.
    pub fn find_best(&self, item: &Item) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;

        for (idx, free) in self.free_rects.iter().enumerate() {
            for rotated in [false, true] {
                let oriented = if rotated { item.rotated_in_plane() } else { *item };
                if oriented.width() > free.width() || oriented.length() > free.height() {
                    continue;
                }
                let score = free.y1 + oriented.length() - 1;
                if best.is_none_or(|b| score < b.score) {
                    best = Some(Candidate {
                        free_idx: idx,
                        rotated,
                        score,
                    });
                }
            }
        }

        best
    }

    pub fn commit(&mut self, candidate: Candidate, item: Item) -> Item {
        let free = self.free_rects[candidate.free_idx];
        let mut placed = item;
        if candidate.rotated {
            placed.rotate_in_plane();
        }
        placed.set_position(free.x1, free.y1, self.layer.z);

        self.split(placed.footprint());
        self.prune();
        self.layer.insert(placed);

        placed
    }

    fn split(&mut self, used: Rect) {
        let mut next = Vec::with_capacity(self.free_rects.len() + 3);
        for free in self.free_rects.drain(..) {
            if free.overlaps(&used) {
                next.extend(Self::slivers(free, used));
            } else {
                next.push(free);
            }
        }
        self.free_rects = next;
    }

    // left, right, top, bottom
    fn slivers(free: Rect, used: Rect) -> impl Iterator<Item = Rect> {
        let left = (used.x1 > free.x1).then(|| Rect::new(free.x1, free.y1, used.x1 - 1, free.y2));
        let right = (used.x2 < free.x2).then(|| Rect::new(used.x2 + 1, free.y1, free.x2, free.y2));
        let top = (used.y2 < free.y2).then(|| Rect::new(free.x1, used.y2 + 1, free.x2, free.y2));
        let bottom = (used.y1 > free.y1).then(|| Rect::new(free.x1, free.y1, free.x2, used.y1 - 1));
        [left, right, top, bottom].into_iter().flatten()
    }

    // Identical rectangles do not eliminate each other.
    fn prune(&mut self) {
        self.free_rects.retain(|r| !r.is_empty());

        let rects = &self.free_rects;
        let keep: Vec<bool> = rects
            .iter()
            .map(|r| !rects.iter().any(|other| other != r && other.contains(r)))
            .collect();

        let mut keep = keep.into_iter();
        self.free_rects.retain(|_| keep.next().unwrap_or(true));
    }
}

impl Placer for MaxRectsLayer {
    fn open(bounds: Bounds, z: u32) -> Self {
        Self::new(bounds, z)
    }

    fn place(&mut self, item: Item) -> PlacementOutcome {
        if item.extents().contains(&0) {
            return PlacementOutcome::DoesNotFit(item);
        }
        match self.find_best(&item) {
            Some(candidate) => PlacementOutcome::Placed(self.commit(candidate, item)),
            None => PlacementOutcome::DoesNotFit(item),
        }
    }

    fn layer(&self) -> &Layer {
        &self.layer
    }

    fn into_layer(self) -> Layer {
        self.layer
    }
}
