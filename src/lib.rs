//! Layered packing of boxes into a container with a fixed floor.
//!
//! Items are placed one layer at a time by a 2D strategy (maximal free
//! rectangles, or a simple row cursor); a layer closes when it rejects an
//! item, and closed layers are stacked along z. The finished stack can be
//! validated against the catalog and scored.

pub mod catalog;
pub mod cursor;
pub mod error;
pub mod layer;
pub mod maxrects;
pub mod render;
pub mod score;
pub mod solver;
pub mod stack;
pub mod types;
pub mod validate;

pub use catalog::Catalog;
pub use error::{Error, Result};
pub use layer::{Layer, PlacementOutcome, Placer};
pub use solver::Solver;
pub use stack::{Stack, StackBuilder, VertexRow};
pub use types::{Alignment, Bounds, Direction, IdOrder, Item, Orientation, PackConfig, Rect, Strategy};
pub use validate::{Finding, Report, Validator};
