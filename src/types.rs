use serde::{Deserialize, Deserializer, Serialize};

// Inclusive on both ends: x2 < x1 (or y2 < y1) is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl Rect {
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> u32 {
        cells(self.x1, self.x2)
    }

    pub fn height(&self) -> u32 {
        cells(self.y1, self.y2)
    }

    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.x2 < self.x1 || self.y2 < self.y1
    }

    // Sharing a single boundary cell counts.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.x2 < other.x1 || other.x2 < self.x1) && !(self.y2 < other.y1 || other.y2 < self.y1)
    }

    pub fn contains(&self, other: &Rect) -> bool {
        self.x1 <= other.x1 && other.x2 <= self.x2 && self.y1 <= other.y1 && other.y2 <= self.y2
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}..{}]x[{}..{}]", self.x1, self.x2, self.y1, self.y2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub max_x: u32,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub max_y: u32,
}

impl Bounds {
    pub fn new(max_x: u32, max_y: u32) -> Self {
        Self { max_x, max_y }
    }

    pub fn full(&self) -> Rect {
        Rect::new(1, 1, self.max_x, self.max_y)
    }

    pub fn contains(&self, rect: &Rect) -> bool {
        !rect.is_empty() && self.full().contains(rect)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(1000, 1000)
    }
}

impl std::fmt::Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.max_x, self.max_y)
    }
}

/// A box to be packed. Extents are kept in their current orientation and
/// the opposite corner is derived from them.
#[derive(Debug, Clone, Copy)]
pub struct Item {
    pub id: u32,
    extents: [u32; 3],
    origin: [u32; 3],
}

impl Item {
    pub fn new(id: u32, a: u32, b: u32, c: u32) -> Self {
        Self {
            id,
            extents: [a, b, c],
            origin: [1, 1, 1],
        }
    }

    pub fn extents(&self) -> [u32; 3] {
        self.extents
    }

    pub fn sorted_extents(&self) -> [u32; 3] {
        let mut dims = self.extents;
        dims.sort_unstable();
        dims
    }

    pub fn width(&self) -> u32 {
        self.extents[0]
    }

    pub fn length(&self) -> u32 {
        self.extents[1]
    }

    pub fn depth(&self) -> u32 {
        self.extents[2]
    }

    pub fn x1(&self) -> u32 {
        self.origin[0]
    }

    pub fn y1(&self) -> u32 {
        self.origin[1]
    }

    pub fn z1(&self) -> u32 {
        self.origin[2]
    }

    pub fn x2(&self) -> u32 {
        self.origin[0] + self.extents[0] - 1
    }

    pub fn y2(&self) -> u32 {
        self.origin[1] + self.extents[1] - 1
    }

    pub fn z2(&self) -> u32 {
        self.origin[2] + self.extents[2] - 1
    }

    pub fn set_position(&mut self, x: u32, y: u32, z: u32) {
        self.origin = [x, y, z];
    }

    pub fn with_position(mut self, x: u32, y: u32, z: u32) -> Self {
        self.set_position(x, y, z);
        self
    }

    pub fn set_z(&mut self, z: u32) {
        self.origin[2] = z;
    }

    pub fn rotate_in_plane(&mut self) {
        self.extents.swap(0, 1);
    }

    pub fn rotated_in_plane(mut self) -> Self {
        self.rotate_in_plane();
        self
    }

    /// Puts the smallest extent on z. Nothing moves when z already holds one.
    pub fn rotate_shortest_to_stack_axis(&mut self) {
        let shortest = (0..3)
            .min_by_key(|&axis| (self.extents[axis], 2 - axis))
            .unwrap_or(2);
        self.extents.swap(shortest, 2);
    }

    pub fn footprint(&self) -> Rect {
        Rect::new(self.x1(), self.y1(), self.x2(), self.y2())
    }

    pub fn overlaps(&self, other: &Item) -> bool {
        self.footprint().overlaps(&other.footprint())
    }

    pub fn contains(&self, other: &Item) -> bool {
        self.footprint().contains(&other.footprint())
    }

    // (x1,y1) (x1,y2) (x2,y1) (x2,y2) at z1, then the same four at z2
    pub fn vertices(&self) -> [[u32; 3]; 8] {
        let (x1, y1, z1) = (self.x1(), self.y1(), self.z1());
        let (x2, y2, z2) = (self.x2(), self.y2(), self.z2());
        [
            [x1, y1, z1],
            [x1, y2, z1],
            [x2, y1, z1],
            [x2, y2, z1],
            [x1, y1, z2],
            [x1, y2, z2],
            [x2, y1, z2],
            [x2, y2, z2],
        ]
    }
}

// Same id and same extent multiset, whatever the orientation.
impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.sorted_extents() == other.sorted_extents()
    }
}

impl Eq for Item {}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {}x{}x{} @ ({}, {}, {})",
            self.id,
            self.extents[0],
            self.extents[1],
            self.extents[2],
            self.origin[0],
            self.origin[1],
            self.origin[2]
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    #[default]
    MaxRects,
    Cursor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    BottomUp,
    TopDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alignment {
    #[default]
    Bottom,
    Top,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    #[default]
    AsGiven,
    ShortestUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdOrder {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PackConfig {
    pub bounds: Bounds,
    /// Defaults to the catalog length.
    pub expected_count: Option<usize>,
    pub strategy: Strategy,
    pub direction: Direction,
    pub alignment: Alignment,
    pub orientation: Orientation,
}

/// Accepts any JSON number with an integral value that fits in a `u32`,
/// so clients sending `12.0` are not rejected.
fn cells(lo: u32, hi: u32) -> u32 {
    hi.checked_sub(lo).map_or(0, |span| span.saturating_add(1))
}

pub fn deserialize_u32_from_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.fract() != 0.0 || value < 0.0 || value > u32::MAX as f64 {
        return Err(serde::de::Error::custom(format!(
            "expected a non-negative integer, got {value}"
        )));
    }
    Ok(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_derived_corner() {
        let item = Item::new(7, 3, 4, 5).with_position(10, 20, 30);
        assert_eq!((item.x2(), item.y2(), item.z2()), (12, 23, 34));
        assert_eq!(item.footprint(), Rect::new(10, 20, 12, 23));
    }

    #[test]
    fn test_rotate_in_plane_round_trip() {
        let original = Item::new(1, 3, 8, 2).with_position(5, 5, 1);
        let mut item = original;
        item.rotate_in_plane();
        assert_eq!(item.extents(), [8, 3, 2]);
        assert_eq!((item.x2(), item.y2()), (12, 7));
        assert_eq!(item, original);
        item.rotate_in_plane();
        assert_eq!(item.extents(), original.extents());
        assert_eq!(item.footprint(), original.footprint());
        assert_eq!(item, original);
    }

    #[test]
    fn test_rotate_shortest_to_stack_axis() {
        let mut item = Item::new(1, 2, 9, 5);
        item.rotate_shortest_to_stack_axis();
        assert_eq!(item.depth(), 2);
        assert_eq!(item.sorted_extents(), [2, 5, 9]);
        assert_eq!(item, Item::new(1, 9, 5, 2));

        // Already shortest on z: untouched, even with a tie.
        let mut flat = Item::new(2, 4, 2, 2);
        flat.rotate_shortest_to_stack_axis();
        assert_eq!(flat.extents(), [4, 2, 2]);
    }

    #[test]
    fn test_equality_ignores_orientation_not_id() {
        assert_eq!(Item::new(1, 1, 2, 3), Item::new(1, 3, 1, 2));
        assert_ne!(Item::new(1, 1, 2, 3), Item::new(2, 1, 2, 3));
        assert_ne!(Item::new(1, 1, 2, 3), Item::new(1, 1, 2, 4));
    }

    #[test]
    fn test_touching_cells_overlap() {
        let a = Item::new(1, 10, 10, 1).with_position(1, 1, 1);
        let touching = Item::new(2, 10, 10, 1).with_position(10, 1, 1);
        let adjacent = Item::new(3, 10, 10, 1).with_position(11, 1, 1);
        assert!(a.overlaps(&touching));
        assert!(touching.overlaps(&a));
        assert!(!a.overlaps(&adjacent));
    }

    #[test]
    fn test_overlap_needs_both_axes() {
        let a = Rect::new(1, 1, 10, 10);
        let same_column = Rect::new(1, 11, 10, 20);
        assert!(!a.overlaps(&same_column));
        assert!(a.overlaps(&Rect::new(5, 5, 6, 6)));
    }

    #[test]
    fn test_contains_is_non_strict() {
        let outer = Rect::new(1, 1, 10, 10);
        assert!(outer.contains(&outer));
        assert!(outer.contains(&Rect::new(1, 5, 10, 10)));
        assert!(!outer.contains(&Rect::new(0, 5, 10, 10)));
        let big = Item::new(1, 10, 10, 1);
        let small = Item::new(2, 3, 3, 1).with_position(8, 8, 1);
        assert!(big.contains(&small));
        assert!(!small.contains(&big));
    }

    #[test]
    fn test_rect_dimensions() {
        let r = Rect::new(3, 4, 7, 4);
        assert_eq!((r.width(), r.height(), r.area()), (5, 1, 5));
        assert!(!r.is_empty());
        assert!(Rect::new(5, 1, 4, 10).is_empty());
        assert_eq!(Rect::new(5, 1, 4, 10).area(), 0);
    }

    #[test]
    fn test_rect_spanning_whole_axis() {
        let r = Bounds::new(u32::MAX, u32::MAX).full();
        assert_eq!(r.width(), u32::MAX);
        assert_eq!(Rect::new(7, 1, 6, 1).width(), 0);
    }

    #[test]
    fn test_vertices_order() {
        let v = Item::new(1, 2, 3, 4).with_position(1, 1, 1).vertices();
        assert_eq!(v[0], [1, 1, 1]);
        assert_eq!(v[1], [1, 3, 1]);
        assert_eq!(v[2], [2, 1, 1]);
        assert_eq!(v[3], [2, 3, 1]);
        assert_eq!(v[7], [2, 3, 4]);
    }

    #[test]
    fn test_config_defaults_from_json() {
        let config: PackConfig =
            serde_json::from_str(r#"{"bounds": {"max_x": 50.0, "max_y": 40}, "direction": "top-down"}"#)
                .unwrap();
        assert_eq!(config.bounds, Bounds::new(50, 40));
        assert_eq!(config.direction, Direction::TopDown);
        assert_eq!(config.strategy, Strategy::MaxRects);
        assert_eq!(config.alignment, Alignment::Bottom);

        let empty: PackConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.bounds, Bounds::new(1000, 1000));
    }

    #[test]
    fn test_rejects_fractional_bounds() {
        let result: Result<Bounds, _> = serde_json::from_str(r#"{"max_x": 1.5, "max_y": 2}"#);
        assert!(result.is_err());
    }
}
