//! Fatal errors. Anything here stops a run: the packer cannot continue
//! without valid geometry.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A field could not be parsed as a non-negative integer.
    #[error("line {line}: malformed record: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// A record with the wrong number of fields.
    #[error("line {line}: expected 4 fields, found {found}")]
    TruncatedRecord { line: usize, found: usize },

    #[error("item {id} has a zero extent")]
    ZeroExtent { id: u32 },

    #[error("item {id} appears more than once in the catalog")]
    DuplicateId { id: u32 },

    /// The stack would grow past the highest z a `u32` can address.
    #[error("item {id} (depth {depth}) would raise the stack past z = {}", u32::MAX)]
    TooTall { id: u32, depth: u32 },

    /// The active strategy rejected the item even on an empty layer.
    #[error("item {id} ({width}x{length}) does not fit the {bounds} container")]
    Oversized {
        id: u32,
        width: u32,
        length: u32,
        bounds: crate::types::Bounds,
    },
}
