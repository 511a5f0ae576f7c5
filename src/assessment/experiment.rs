use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;

use crate::assessment::{
    ExperimentConfig, FixedRole, IndicatorCalculator, IndicatorEvolution, IndicatorVector,
    ReferenceData, ResultSource, Treatment,
};
use crate::core::QError;
use crate::utils::{mean_std, round_to, DescriptiveStatistics};

/// The mean and standard deviation of an indicator across the runs of an approach.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IndicatorSummary {
    pub mean: f64,
    /// The population standard deviation.
    pub std: f64,
    /// The indicator value of each run. These are not rounded and can be used for significance
    /// tests.
    pub samples: Vec<f64>,
}

impl IndicatorSummary {
    fn new(samples: Vec<f64>, digits: u32) -> Result<Self, QError> {
        let (mean, std) = mean_std(&samples)?;
        Ok(Self {
            mean: round_to(mean, digits),
            std: round_to(std, digits),
            samples,
        })
    }
}

/// The indicators of an approach (an algorithm or a fitness function) in a comparison.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ApproachSummary {
    /// The name of the algorithm or function being compared.
    pub name: String,
    pub treatment: Treatment,
    pub hypervolume: IndicatorSummary,
    pub generational_distance: IndicatorSummary,
    pub spacing: IndicatorSummary,
    pub cardinality: IndicatorSummary,
}

/// The statistics of the QoS values of the final solutions of an approach.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QosStatistics {
    pub name: String,
    pub treatment: Treatment,
    /// The number of solutions the statistics are calculated on.
    pub solutions: usize,
    pub response_time: DescriptiveStatistics,
    /// The success ratio calculated as `100 - Energy`.
    pub success_ratio: DescriptiveStatistics,
    pub network_latency: DescriptiveStatistics,
}

/// The execution time of the generations of a treatment in seconds.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExecutionTime {
    pub treatment: Treatment,
    pub mean: f64,
    pub std: f64,
}

/// The performance of an approach relative to a baseline approach.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RelativePerformance {
    pub name: String,
    pub execution_time: ExecutionTime,
    /// The mean hyper-volume of the approach divided by the mean hyper-volume of the baseline.
    pub quality_degradation: f64,
    /// The mean execution time of the baseline divided by the mean execution time of the
    /// approach.
    pub speed_up: f64,
}

/// The indicator evolution of a treatment.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TreatmentEvolution {
    pub treatment: Treatment,
    pub evolution: IndicatorEvolution,
}

/// The assessment of a comparison group of experiment runs. The reference data are calculated
/// once when the experiment is created and shared by all the assessments.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// use qosmoea::assessment::{DirectorySource, Experiment, ExperimentConfig, FixedRole};
///
/// let config = ExperimentConfig::from_file(Path::new("config.json")).unwrap();
/// let source = DirectorySource::new(Path::new("results")).unwrap();
/// let experiment = Experiment::initialise(config, source).unwrap();
/// let summaries = experiment
///     .compare(
///         &FixedRole::Function("ExpensiveFunction".to_string()),
///         &["NSGAIInew", "SPEAII"],
///     )
///     .unwrap();
/// ```
pub struct Experiment<S: ResultSource> {
    config: ExperimentConfig,
    source: S,
    reference: ReferenceData,
}

impl<S: ResultSource> Experiment<S> {
    /// Create the experiment and calculate its reference data.
    ///
    /// # Arguments
    ///
    /// * `config`: The configuration of the comparison group.
    /// * `source`: The experiment results.
    ///
    /// returns: `Result<Experiment<S>, QError>`
    pub fn initialise(config: ExperimentConfig, source: S) -> Result<Self, QError> {
        config.validate()?;
        let reference = ReferenceData::initialise(&source, &config)?;
        Ok(Self {
            config,
            source,
            reference,
        })
    }

    /// Create the experiment with reference data calculated beforehand.
    ///
    /// # Arguments
    ///
    /// * `config`: The configuration of the comparison group.
    /// * `source`: The experiment results.
    /// * `reference`: The reference data.
    ///
    /// returns: `Result<Experiment<S>, QError>`
    pub fn with_reference(
        config: ExperimentConfig,
        source: S,
        reference: ReferenceData,
    ) -> Result<Self, QError> {
        config.validate()?;
        Ok(Self {
            config,
            source,
            reference,
        })
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// The indicator calculator sharing the experiment reference data.
    ///
    /// returns: `Result<IndicatorCalculator<S>, QError>`
    pub fn calculator(&self) -> Result<IndicatorCalculator<'_, S>, QError> {
        IndicatorCalculator::new(&self.source, &self.config, &self.reference)
    }

    /// Compare approaches on the indicators of the front at the final generation of each run.
    ///
    /// # Arguments
    ///
    /// * `fixed`: The fixed part of the treatment.
    /// * `variables`: The names of the algorithms or functions to compare.
    ///
    /// returns: `Result<Vec<ApproachSummary>, QError>`. One summary for each variable.
    pub fn compare(
        &self,
        fixed: &FixedRole,
        variables: &[&str],
    ) -> Result<Vec<ApproachSummary>, QError> {
        let calculator = self.calculator()?;
        info!("Comparing {:?} with {:?} fixed", variables, fixed);

        let mut summaries = Vec::with_capacity(variables.len());
        for name in variables {
            let treatment = fixed.treatment(&self.config.composition_model, name);
            let indicators = if self.config.parallel {
                self.config
                    .runs()
                    .into_par_iter()
                    .map(|run| calculator.calculate(run, &treatment))
                    .collect::<Result<Vec<IndicatorVector>, QError>>()?
            } else {
                self.config
                    .runs()
                    .map(|run| calculator.calculate(run, &treatment))
                    .collect::<Result<Vec<IndicatorVector>, QError>>()?
            };

            let digits = self.config.digits;
            let samples = |indicator: fn(&IndicatorVector) -> f64| -> Vec<f64> {
                indicators.iter().map(indicator).collect()
            };
            let summary = ApproachSummary {
                name: name.to_string(),
                hypervolume: IndicatorSummary::new(samples(|v| v.hypervolume), digits)?,
                generational_distance: IndicatorSummary::new(
                    samples(|v| v.generational_distance),
                    digits,
                )?,
                spacing: IndicatorSummary::new(samples(|v| v.spacing), digits)?,
                cardinality: IndicatorSummary::new(samples(|v| v.cardinality as f64), digits)?,
                treatment,
            };
            debug!(
                "{}: HV = {} ± {}",
                summary.name, summary.hypervolume.mean, summary.hypervolume.std
            );
            summaries.push(summary);
        }
        Ok(summaries)
    }

    /// Calculate the statistics of the QoS values of the solutions in the Pareto front at the final
    /// generation of every run. Solutions with a success ratio below
    /// [`crate::assessment::Thresholds::success_ratio`] are excluded.
    ///
    /// # Arguments
    ///
    /// * `fixed`: The fixed part of the treatment.
    /// * `variables`: The names of the algorithms or functions to compare.
    ///
    /// returns: `Result<Vec<QosStatistics>, QError>`. One item for each variable.
    pub fn qos_statistics(
        &self,
        fixed: &FixedRole,
        variables: &[&str],
    ) -> Result<Vec<QosStatistics>, QError> {
        let threshold = self.config.thresholds.success_ratio;
        let digits = self.config.digits;

        let mut statistics = Vec::with_capacity(variables.len());
        for name in variables {
            let treatment = fixed.treatment(&self.config.composition_model, name);
            let mut response_time = Vec::new();
            let mut success_ratio = Vec::new();
            let mut network_latency = Vec::new();

            for run in self.config.runs() {
                let generation = self
                    .config
                    .final_generation_of(&self.source, run, &treatment)?;
                let Some(front) = self.source.pareto_front(run, &treatment, generation)? else {
                    debug!("Run #{run} of {:?} has no final front", treatment);
                    continue;
                };
                for solution in &front.solutions {
                    let ratio = 100.0 - solution.energy;
                    if ratio < threshold {
                        continue;
                    }
                    response_time.push(solution.response_time);
                    success_ratio.push(ratio);
                    network_latency.push(solution.network_latency);
                }
            }

            if response_time.is_empty() {
                return Err(QError::EmptyFront(format!("QoS statistics of {name}")));
            }
            info!(
                "{name}: {} solutions above the success ratio threshold",
                response_time.len()
            );
            statistics.push(QosStatistics {
                name: name.to_string(),
                treatment,
                solutions: response_time.len(),
                response_time: DescriptiveStatistics::new(&response_time, digits)?,
                success_ratio: DescriptiveStatistics::new(&success_ratio, digits)?,
                network_latency: DescriptiveStatistics::new(&network_latency, digits)?,
            });
        }
        Ok(statistics)
    }

    /// Calculate the mean and standard deviation of the execution time of all the generations of
    /// all the runs of a treatment. The times in the generation summaries are in milliseconds.
    ///
    /// # Arguments
    ///
    /// * `treatment`: The treatment.
    ///
    /// returns: `Result<ExecutionTime, QError>`
    pub fn execution_time(&self, treatment: &Treatment) -> Result<ExecutionTime, QError> {
        let mut times = Vec::new();
        for run in self.config.runs() {
            let generations = self
                .config
                .final_generation_of(&self.source, run, treatment)?;
            for generation in 1..=generations {
                for row in self
                    .source
                    .generation_summary(run, treatment, generation)?
                {
                    let time = row.execution_time.ok_or(QError::Source(format!(
                        "The summary of run #{run} of {:?} at generation #{generation} has no execution time",
                        treatment
                    )))?;
                    times.push(time / 1000.0);
                }
            }
        }

        let (mean, std) = mean_std(&times).map_err(|_| {
            QError::Source(format!(
                "No execution time is available for {:?}",
                treatment
            ))
        })?;
        Ok(ExecutionTime {
            treatment: treatment.clone(),
            mean: round_to(mean, self.config.digits),
            std: round_to(std, self.config.digits),
        })
    }

    /// Compare the hyper-volume and the execution time of approaches with those of a baseline
    /// approach. The hyper-volumes are the means of [`Experiment::compare`] and the times the
    /// means of [`Experiment::execution_time`].
    ///
    /// # Arguments
    ///
    /// * `fixed`: The fixed part of the treatment.
    /// * `baseline`: The name of the baseline algorithm or function.
    /// * `variables`: The names of the algorithms or functions to compare with the baseline.
    ///
    /// returns: `Result<Vec<RelativePerformance>, QError>`. One item for each variable. An error
    /// is returned if the mean hyper-volume or the mean execution time of the baseline is zero.
    pub fn relative_performance(
        &self,
        fixed: &FixedRole,
        baseline: &str,
        variables: &[&str],
    ) -> Result<Vec<RelativePerformance>, QError> {
        let digits = self.config.digits;
        let baseline_hv = self.compare(fixed, &[baseline])?[0].hypervolume.mean;
        if baseline_hv == 0.0 {
            return Err(QError::Metric(
                "Quality degradation".to_string(),
                format!("The mean hyper-volume of the baseline {baseline} is zero"),
            ));
        }
        let baseline_time = self
            .execution_time(&fixed.treatment(&self.config.composition_model, baseline))?
            .mean;
        info!("Baseline {baseline}: HV = {baseline_hv}, execution time = {baseline_time} s");

        let summaries = self.compare(fixed, variables)?;
        summaries
            .into_iter()
            .map(|summary| {
                let execution_time = self.execution_time(&summary.treatment)?;
                if execution_time.mean == 0.0 {
                    return Err(QError::Metric(
                        "Speed-up".to_string(),
                        format!("The mean execution time of {} is zero", summary.name),
                    ));
                }
                Ok(RelativePerformance {
                    quality_degradation: round_to(summary.hypervolume.mean / baseline_hv, digits),
                    speed_up: round_to(baseline_time / execution_time.mean, digits),
                    name: summary.name,
                    execution_time,
                })
            })
            .collect()
    }

    /// Calculate the evolution of the indicators for every treatment of the configuration. The
    /// evolution always uses the runs from `1` to [`ExperimentConfig::end_run`], regardless of
    /// [`ExperimentConfig::start_run`].
    ///
    /// returns: `Result<Vec<TreatmentEvolution>, QError>`
    pub fn evolve(&self) -> Result<Vec<TreatmentEvolution>, QError> {
        let calculator = self.calculator()?;
        self.config
            .treatments()
            .into_iter()
            .map(|treatment| {
                let evolution = calculator.evolve(1..=self.config.end_run, &treatment)?;
                Ok(TreatmentEvolution {
                    treatment,
                    evolution,
                })
            })
            .collect()
    }
}
