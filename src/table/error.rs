/// Errors from declared-vs-observed integrity checks
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// A group's distinct z-plane count differs from the declared SizeZ
    #[error("declared SizeZ={declared} does not match observed z-planes in groups: {mismatches:?}")]
    ZPlaneCount {
        declared: u32,
        /// (group key, observed distinct z count) per offending group
        mismatches: Vec<(String, usize)>,
    },

    /// The table's distinct timepoint count differs from the declared SizeT
    #[error("declared SizeT={declared} but observed timepoint values {observed:?}")]
    TimepointCount { declared: u32, observed: Vec<u32> },

    /// A parsed channel name matches no declared channel name
    #[error("parsed channel '{parsed}' not found among declared channels {declared:?}")]
    UnmatchedChannel {
        parsed: String,
        declared: Vec<String>,
    },
}

/// Errors from coercing loosely-typed coordinate values
#[derive(Debug, thiserror::Error)]
pub enum CastError {
    /// Text that parses as neither integer nor float
    #[error("invalid value for {field}: '{value}'")]
    NonNumeric { field: String, value: String },

    /// NaN coordinate, typically an incomplete filename pattern
    #[error("field '{field}' is NaN; filename pattern incomplete")]
    Nan { field: String },

    /// Coordinates are non-negative by construction
    #[error("field '{field}' must be a non-negative integer, got {value}")]
    Negative { field: String, value: i64 },

    /// Value does not fit the coordinate range
    #[error("field '{field}' value {value} exceeds the supported coordinate range")]
    OutOfRange { field: String, value: String },

    /// Absent coordinate where one is required
    #[error("field '{field}' is absent; filename pattern incomplete")]
    Missing { field: String },
}
