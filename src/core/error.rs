use thiserror::Error;

#[derive(Error, Debug)]
/// Errors raised by the library.
pub enum QError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("The reference and utopia points coincide (or the reference point is zero) on objective #{objective} ({value}). The normalisation is undefined")]
    DegenerateReferenceRange { objective: usize, value: f64 },
    #[error("The '{0}' metric cannot be calculated on an empty front")]
    EmptyFront(String),
    #[error("Row #{row} has {found} columns, but {expected} were expected")]
    ShapeMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("An error occurred in the calculation of the '{0}' metric: {1}")]
    Metric(String, String),
    #[error("An error occurred when reading the experiment results: {0}")]
    Source(String),
    #[error("The experiment configuration is not valid: {0}")]
    Config(String),
    #[error("An error occurred when exporting the assessment data: {0}")]
    Export(String),
}
