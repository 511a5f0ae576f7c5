pub use error::QError;
pub use solution::{GenerationRecord, ParetoFront, QosRecord, Solution, NUMBER_OF_OBJECTIVES};

pub mod error;
pub mod solution;
#[cfg(test)]
pub(crate) mod test_utils;
