use std::io::Write;

use serde::Serialize;

use crate::layer::Layer;
use crate::types::{Alignment, Direction, IdOrder, Item};

/// Collects closed layers and positions them along z.
///
/// Bottom-up layers are opened directly at their final origin. Top-down
/// layers are built at a local origin of 1, flipped on arrival so their own
/// top faces downward, and shifted into place by `finish` once the total
/// height is known; the first layer ends up on top.
#[derive(Debug, Clone)]
pub struct StackBuilder {
    direction: Direction,
    alignment: Alignment,
    layers: Vec<Layer>,
    max_z: u32,
    // top-down only: how many z cells sit above each pushed layer
    depth_above: Vec<u32>,
    running_depth: u32,
}

impl StackBuilder {
    pub fn new(direction: Direction, alignment: Alignment) -> Self {
        Self {
            direction,
            alignment,
            layers: Vec::new(),
            max_z: 0,
            depth_above: Vec::new(),
            running_depth: 0,
        }
    }

    /// Where the next layer should be opened. Saturates at the highest z;
    /// `height` tells whether anything still fits above.
    pub fn next_origin(&self) -> u32 {
        match self.direction {
            Direction::BottomUp => self.max_z.saturating_add(1),
            Direction::TopDown => 1,
        }
    }

    /// z cells already taken by closed layers.
    pub fn height(&self) -> u32 {
        match self.direction {
            Direction::BottomUp => self.max_z,
            Direction::TopDown => self.running_depth,
        }
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Closes `layer` under the configured alignment and adds it to the
    /// stack. Empty layers occupy no height and are discarded.
    pub fn push(&mut self, mut layer: Layer) {
        if layer.is_empty() {
            return;
        }
        layer.align(self.alignment);
        match self.direction {
            Direction::BottomUp => {
                self.max_z = self.max_z.max(layer.max_z);
            }
            Direction::TopDown => {
                layer.flip();
                self.depth_above.push(self.running_depth);
                self.running_depth += layer.depth();
            }
        }
        tracing::debug!(
            layer = self.layers.len() + 1,
            origin = layer.z,
            depth = layer.depth(),
            items = layer.len(),
            "closed layer"
        );
        self.layers.push(layer);
    }

    pub fn finish(mut self) -> Stack {
        if self.direction == Direction::TopDown {
            let total = self.running_depth;
            for (layer, above) in self.layers.iter_mut().zip(&self.depth_above) {
                let origin = total - above - layer.depth() + 1;
                layer.shift(origin - layer.z);
            }
            self.max_z = total;
        }
        Stack {
            layers: self.layers,
            max_z: self.max_z,
        }
    }
}

/// Closed layers in the order they were produced. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct Stack {
    layers: Vec<Layer>,
    max_z: u32,
}

impl Stack {
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Highest occupied z over the whole stack.
    pub fn max_z(&self) -> u32 {
        self.max_z
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.layers.iter().flat_map(|l| l.items())
    }

    pub fn item_count(&self) -> usize {
        self.layers.iter().map(|l| l.len()).sum()
    }

    /// Output rows sorted by id. Each call starts a fresh sequence.
    pub fn vertex_rows(&self, order: IdOrder) -> impl Iterator<Item = VertexRow> + '_ {
        let mut items: Vec<&Item> = self.items().collect();
        items.sort_unstable_by_key(|i| i.id);
        if order == IdOrder::Descending {
            items.reverse();
        }
        items.into_iter().map(|i| VertexRow {
            id: i.id,
            vertices: i.vertices(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VertexRow {
    pub id: u32,
    pub vertices: [[u32; 3]; 8],
}

pub fn submission_header() -> String {
    let mut header = String::from("PresentId");
    for n in 1..=8 {
        header.push_str(&format!(",x{n},y{n},z{n}"));
    }
    header
}

/// Writes the header and one CSV line per placed item.
pub fn write_submission<W: Write>(stack: &Stack, order: IdOrder, mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "{}", submission_header())?;
    for row in stack.vertex_rows(order) {
        write!(writer, "{}", row.id)?;
        for [x, y, z] in row.vertices {
            write!(writer, ",{x},{y},{z}")?;
        }
        writeln!(writer)?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer_with(z: u32, items: &[Item]) -> Layer {
        let mut layer = Layer::new(z);
        for &item in items {
            layer.insert(item.with_position(item.x1(), item.y1(), z));
        }
        layer
    }

    #[test]
    fn test_bottom_up_origins() {
        let mut builder = StackBuilder::new(Direction::BottomUp, Alignment::Bottom);
        assert_eq!(builder.next_origin(), 1);
        builder.push(layer_with(1, &[Item::new(1, 10, 10, 3)]));
        assert_eq!(builder.next_origin(), 4);
        builder.push(layer_with(4, &[Item::new(2, 10, 10, 5)]));
        let stack = builder.finish();
        assert_eq!(stack.max_z(), 8);
        assert_eq!(stack.layers()[1].z, 4);
        assert_eq!(stack.item_count(), 2);
    }

    #[test]
    fn test_top_aligned_layer() {
        let mut builder = StackBuilder::new(Direction::BottomUp, Alignment::Top);
        builder.push(layer_with(
            1,
            &[Item::new(1, 5, 5, 2), Item::new(2, 5, 5, 4).with_position(6, 1, 1)],
        ));
        let stack = builder.finish();
        let tops: Vec<(u32, u32)> = stack.items().map(|i| (i.z1(), i.z2())).collect();
        assert_eq!(tops, vec![(3, 4), (1, 4)]);
    }

    #[test]
    fn test_top_down_first_layer_on_top() {
        let mut builder = StackBuilder::new(Direction::TopDown, Alignment::Bottom);
        builder.push(layer_with(builder.next_origin(), &[Item::new(1, 10, 10, 3)]));
        builder.push(layer_with(builder.next_origin(), &[Item::new(2, 10, 10, 5)]));
        let stack = builder.finish();

        assert_eq!(stack.max_z(), 8);
        let first = stack.layers()[0].items().next().unwrap();
        let second = stack.layers()[1].items().next().unwrap();
        assert_eq!((first.z1(), first.z2()), (6, 8));
        assert_eq!((second.z1(), second.z2()), (1, 5));
        assert_eq!((stack.layers()[0].z, stack.layers()[0].max_z), (6, 8));
    }

    #[test]
    fn test_top_down_flips_within_layer() {
        let mut builder = StackBuilder::new(Direction::TopDown, Alignment::Bottom);
        builder.push(layer_with(
            1,
            &[Item::new(1, 5, 5, 2), Item::new(2, 5, 5, 4).with_position(6, 1, 1)],
        ));
        let stack = builder.finish();
        // Bottom-aligned while built, so after the flip both tops meet z = 4.
        let spans: Vec<(u32, u32)> = stack.items().map(|i| (i.z1(), i.z2())).collect();
        assert_eq!(spans, vec![(3, 4), (1, 4)]);
    }

    #[test]
    fn test_height_and_origin_at_highest_z() {
        let mut builder = StackBuilder::new(Direction::BottomUp, Alignment::Bottom);
        builder.push(layer_with(1, &[Item::new(1, 10, 10, u32::MAX)]));
        assert_eq!(builder.height(), u32::MAX);
        assert_eq!(builder.next_origin(), u32::MAX);

        let mut top_down = StackBuilder::new(Direction::TopDown, Alignment::Bottom);
        top_down.push(layer_with(1, &[Item::new(1, 10, 10, 3)]));
        top_down.push(layer_with(1, &[Item::new(2, 10, 10, 5)]));
        assert_eq!((top_down.height(), top_down.next_origin()), (8, 1));
    }

    #[test]
    fn test_empty_layer_discarded() {
        let mut builder = StackBuilder::new(Direction::BottomUp, Alignment::Bottom);
        builder.push(Layer::new(1));
        assert_eq!(builder.layer_count(), 0);
        assert_eq!(builder.finish().max_z(), 0);
    }

    #[test]
    fn test_vertex_rows_order_and_restart() {
        let mut builder = StackBuilder::new(Direction::BottomUp, Alignment::Bottom);
        builder.push(layer_with(
            1,
            &[Item::new(3, 2, 2, 1), Item::new(1, 2, 2, 1).with_position(3, 1, 1)],
        ));
        builder.push(layer_with(2, &[Item::new(2, 2, 2, 1)]));
        let stack = builder.finish();

        let ids: Vec<u32> = stack.vertex_rows(IdOrder::Ascending).map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        let ids: Vec<u32> = stack.vertex_rows(IdOrder::Descending).map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        let again: Vec<u32> = stack.vertex_rows(IdOrder::Ascending).map(|r| r.id).collect();
        assert_eq!(again, vec![1, 2, 3]);
    }

    #[test]
    fn test_write_submission() {
        let mut builder = StackBuilder::new(Direction::BottomUp, Alignment::Bottom);
        builder.push(layer_with(1, &[Item::new(1, 2, 3, 4)]));
        let stack = builder.finish();

        let mut out = Vec::new();
        write_submission(&stack, IdOrder::Ascending, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("PresentId,x1,y1,z1,x2,y2,z2"));
        assert!(lines[0].ends_with("x8,y8,z8"));
        assert_eq!(lines[1], "1,1,1,1,1,3,1,2,1,1,2,3,1,1,1,4,1,3,4,2,1,4,2,3,4");
    }
}
