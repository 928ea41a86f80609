use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Every row of the field holds the same value, so no linear mapping
    /// onto the simulation extent exists. Such fields must be dropped from
    /// the axis configuration upstream.
    #[error("degenerate scale: field {field:?} spans a single value")]
    DegenerateScale { field: String },

    #[error("field {field:?} is not present in the item table")]
    UnknownField { field: String },

    #[error("field {field:?} row {row}: expected a {expected} value, got {got:?}")]
    FieldType {
        field: String,
        row: usize,
        expected: &'static str,
        got: String,
    },

    #[error("expected a {expected} value, got {got:?}")]
    Transform { expected: &'static str, got: String },

    #[error("cannot take log10 of non-positive value {value}")]
    LogDomain { value: f64 },

    #[error("coordinate {coord} does not map back onto a calendar date")]
    DateRange { coord: f64 },

    #[error("config: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
