use crate::cursor::CursorLayer;
use crate::error::{Error, Result};
use crate::layer::{Layer, PlacementOutcome, Placer};
use crate::maxrects::MaxRectsLayer;
use crate::stack::{Stack, StackBuilder};
use crate::types::{Item, Orientation, PackConfig, Strategy};

const PROGRESS_EVERY: usize = 10_000;

/// Feeds an item stream through one placement strategy, closing a layer
/// each time an item is rejected.
pub struct Solver {
    config: PackConfig,
}

impl Solver {
    pub fn new(config: PackConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PackConfig {
        &self.config
    }

    /// Packs `items` in the order given. Fails on a zero extent, on an item
    /// that cannot fit even an empty layer, and on a stack taller than the
    /// highest addressable z.
    pub fn solve<I>(&self, items: I) -> Result<Stack>
    where
        I: IntoIterator<Item = Item>,
    {
        match self.config.strategy {
            Strategy::MaxRects => self.pack::<MaxRectsLayer, _>(items),
            Strategy::Cursor => self.pack::<CursorLayer, _>(items),
        }
    }

    fn pack<P, I>(&self, items: I) -> Result<Stack>
    where
        P: Placer,
        I: IntoIterator<Item = Item>,
    {
        let bounds = self.config.bounds;
        let mut stack = StackBuilder::new(self.config.direction, self.config.alignment);
        let mut layer = P::open(bounds, stack.next_origin());
        let mut placed = 0usize;

        tracing::info!(%bounds, strategy = ?self.config.strategy, "Reading and placing presents");

        for mut item in items {
            if item.extents().contains(&0) {
                return Err(Error::ZeroExtent { id: item.id });
            }
            if self.config.orientation == Orientation::ShortestUp {
                item.rotate_shortest_to_stack_axis();
            }

            check_height(&stack, layer.layer(), &item)?;
            if let PlacementOutcome::DoesNotFit(item) = layer.place(item) {
                if layer.layer().is_empty() {
                    return Err(self.oversized(&item));
                }
                stack.push(layer.into_layer());
                layer = P::open(bounds, stack.next_origin());
                check_height(&stack, layer.layer(), &item)?;
                if let PlacementOutcome::DoesNotFit(item) = layer.place(item) {
                    return Err(self.oversized(&item));
                }
            }

            placed += 1;
            if placed % PROGRESS_EVERY == 0 {
                tracing::info!(layers = stack.layer_count() + 1, "Placed {placed} presents");
            }
        }

        stack.push(layer.into_layer());
        let stack = stack.finish();
        tracing::info!(
            placed,
            layers = stack.layers().len(),
            max_z = stack.max_z(),
            "Finished placing presents"
        );
        Ok(stack)
    }

    fn oversized(&self, item: &Item) -> Error {
        Error::Oversized {
            id: item.id,
            width: item.width(),
            length: item.length(),
            bounds: self.config.bounds,
        }
    }
}

/// The open layer sits on top of everything closed so far; adding `item`
/// to it must keep its top face addressable.
fn check_height(stack: &StackBuilder, layer: &Layer, item: &Item) -> Result<()> {
    let depth = layer.depth().max(item.depth());
    match stack.height().checked_add(depth) {
        Some(_) => Ok(()),
        None => Err(Error::TooTall {
            id: item.id,
            depth: item.depth(),
        }),
    }
}
