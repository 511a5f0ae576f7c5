//! Quality indicators of the Pareto fronts found by multi-objective evolutionary algorithms on
//! QoS-aware service composition problems.
//!
//! The crate reads the fronts exported by the experiment runs (see
//! [`assessment::DirectorySource`]), builds the reference point, utopia point and reference set of
//! a comparison group and calculates, for each run and generation:
//! - the hyper-volume of the normalised front ([`metrics::HyperVolume`]);
//! - the generational distance from the reference set ([`metrics::Distance`]);
//! - the spacing exported by the optimiser;
//! - the cardinality of the front.
//!
//! The indicators are then aggregated across the runs with [`utils::mean_and_std`]. The entry
//! point is [`assessment::Experiment`].
pub mod assessment;
pub mod core;
pub mod metrics;
pub mod utils;
