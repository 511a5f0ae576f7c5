pub use config::{ExperimentConfig, FixedRole, Thresholds, Treatment};
pub use experiment::{
    ApproachSummary, ExecutionTime, Experiment, IndicatorSummary, QosStatistics,
    RelativePerformance, TreatmentEvolution,
};
pub use export::AssessmentExport;
pub use indicators::{IndicatorCalculator, IndicatorEvolution, IndicatorVector};
pub use reference::{
    normalise, reference_point, reference_set, utopia_point, worst_case_front, ReferenceData,
    UTOPIA_START,
};
pub use source::{DirectorySource, ResultSource, POPULATION_FILE};

mod config;
mod experiment;
mod export;
mod indicators;
mod reference;
mod source;
