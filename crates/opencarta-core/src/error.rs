use thiserror::Error;

/// Errors surfaced by shape construction and layer lookup.
#[derive(Error, Debug)]
pub enum MapError {
    /// The input coordinate structure is not a ring, polygon, or
    /// multi-polygon of numeric coordinate pairs.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("unknown layer '{0}'")]
    UnknownLayer(String),
}
