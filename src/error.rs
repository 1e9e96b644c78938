use thiserror::Error;

/// Errors surfaced by the fallible construction and lookup APIs.
///
/// The per-tick paths (`move_body`, probes) never return errors: degenerate
/// geometry resolves to a fully blocked move instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("invalid config: `{field}` must be positive and finite, got {value}")]
    InvalidConfig { field: &'static str, value: f32 },

    #[error("tile row {row} has {found} cells, expected {expected}")]
    RaggedTileRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("tile grid expects {expected} cells, got {found}")]
    TileCountMismatch { expected: usize, found: usize },

    #[error("body is not registered (removed or from another world)")]
    UnknownBody,
}
