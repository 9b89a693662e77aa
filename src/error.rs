use thiserror::Error;

/// Rejection of an editor operation or of an incoming layout.
///
/// These are expected user-input conditions: the layout the caller holds is
/// left as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layout must be between 1x1 and 15x15, got {rows}x{cols}")]
    ResizeOutOfBounds { rows: usize, cols: usize },

    #[error("cell ({row}, {col}) is outside the layout")]
    CellOutOfBounds { row: usize, col: usize },

    #[error("Couple seats require two adjacent empty seats in the same row")]
    CoupleNotAdjacent,

    #[error("Couple seats require two adjacent empty seats in the same row")]
    CoupleSeatsOccupied,

    #[error("Couple seats require two adjacent empty seats in the same row")]
    NoCouplePartner,

    #[error("couple seats are created in pairs, not painted")]
    CoupleNotPaintable,

    #[error("seat {row}{col} cannot be placed in a 15x15 layout")]
    InvalidFlatSeat { row: char, col: usize },

    #[error("couple seat at ({row}, {col}) has no matching partner")]
    BrokenCouple { row: usize, col: usize },

    #[error("malformed layout file: {0}")]
    MalformedImport(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}
