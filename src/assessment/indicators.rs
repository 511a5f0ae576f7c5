use std::ops::RangeInclusive;

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::assessment::{ExperimentConfig, ReferenceData, ResultSource, Treatment};
use crate::core::QError;
use crate::metrics::{Distance, HyperVolume};
use crate::utils::{mean_and_std, MeanStd};

/// The quality indicators of the Pareto front of a run at a generation. A front that was not
/// exported is given the worst values, all set to `0` (see [`IndicatorVector::default`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct IndicatorVector {
    /// The hyper-volume of the normalised front.
    pub hypervolume: f64,
    /// The generational distance of the normalised front from the reference set.
    pub generational_distance: f64,
    /// The spacing exported by the optimiser in the generation summary.
    pub spacing: f64,
    /// The number of files the front is stored in.
    pub cardinality: usize,
}

/// The indicators of a treatment over the generations. Each item of the vectors is the mean or
/// standard deviation across the runs at a generation (the first item is generation `1`).
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct IndicatorEvolution {
    /// The number of generations.
    pub generations: usize,
    pub hypervolume: MeanStd,
    pub generational_distance: MeanStd,
    pub spacing: MeanStd,
    pub cardinality: MeanStd,
}

/// Calculate the quality indicators of the fronts of a comparison group. All calculations share
/// the same [`ReferenceData`].
pub struct IndicatorCalculator<'a, S: ResultSource + ?Sized> {
    source: &'a S,
    config: &'a ExperimentConfig,
    reference: &'a ReferenceData,
    hypervolume: HyperVolume,
}

impl<'a, S: ResultSource + ?Sized> IndicatorCalculator<'a, S> {
    /// Create the calculator.
    ///
    /// # Arguments
    ///
    /// * `source`: The experiment results.
    /// * `config`: The configuration of the comparison group.
    /// * `reference`: The reference data of the comparison group.
    ///
    /// returns: `Result<IndicatorCalculator<S>, QError>`
    pub fn new(
        source: &'a S,
        config: &'a ExperimentConfig,
        reference: &'a ReferenceData,
    ) -> Result<Self, QError> {
        Ok(Self {
            source,
            config,
            reference,
            hypervolume: HyperVolume::new(&config.reference_corner)?,
        })
    }

    /// Calculate the indicators of the front of a run at its final generation.
    ///
    /// # Arguments
    ///
    /// * `run`: The run number.
    /// * `treatment`: The run treatment.
    ///
    /// returns: `Result<IndicatorVector, QError>`
    pub fn calculate(&self, run: usize, treatment: &Treatment) -> Result<IndicatorVector, QError> {
        let generation = self.config.final_generation_of(self.source, run, treatment)?;
        self.calculate_at(run, treatment, generation)
    }

    /// Calculate the indicators of the front of a run at a generation. When the run did not
    /// export the front for the generation, all indicators are `0`.
    ///
    /// # Arguments
    ///
    /// * `run`: The run number.
    /// * `treatment`: The run treatment.
    /// * `generation`: The generation number.
    ///
    /// returns: `Result<IndicatorVector, QError>`. An error is returned if the front exists but
    /// has no solutions, because its generational distance is not defined.
    pub fn calculate_at(
        &self,
        run: usize,
        treatment: &Treatment,
        generation: usize,
    ) -> Result<IndicatorVector, QError> {
        let Some(front) = self.source.pareto_front(run, treatment, generation)? else {
            warn!(
                "Run #{run} of {:?} has no front at generation #{generation}. All indicators are set to 0",
                treatment
            );
            return Ok(IndicatorVector::default());
        };

        let points = front
            .solutions
            .iter()
            .map(|s| self.reference.normalise(s))
            .collect::<Result<Vec<Vec<f64>>, QError>>()?;

        let hypervolume = self.hypervolume.compute(&points)?;
        let generational_distance =
            Distance::new(&points, &self.reference.reference_set)?.generational_distance()?;
        let spacing = self.spacing(run, treatment, generation)?;
        debug!(
            "Run #{run} at generation #{generation}: HV = {hypervolume}, GD = {generational_distance}"
        );

        Ok(IndicatorVector {
            hypervolume,
            generational_distance,
            spacing,
            cardinality: front.files,
        })
    }

    /// The spacing in the last row of the generation summary.
    fn spacing(
        &self,
        run: usize,
        treatment: &Treatment,
        generation: usize,
    ) -> Result<f64, QError> {
        self.source
            .generation_summary(run, treatment, generation)?
            .last()
            .and_then(|row| row.spacing)
            .ok_or(QError::Source(format!(
                "The summary of run #{run} of {:?} at generation #{generation} has no spacing",
                treatment
            )))
    }

    /// Calculate the indicators of all the generations of a run.
    ///
    /// # Arguments
    ///
    /// * `run`: The run number.
    /// * `treatment`: The run treatment.
    /// * `generations`: The number of generations.
    ///
    /// returns: `Result<Vec<IndicatorVector>, QError>`
    pub fn run_history(
        &self,
        run: usize,
        treatment: &Treatment,
        generations: usize,
    ) -> Result<Vec<IndicatorVector>, QError> {
        (1..=generations)
            .map(|generation| self.calculate_at(run, treatment, generation))
            .collect()
    }

    /// Calculate the mean and standard deviation of the indicators across the runs at each
    /// generation, from `1` to the final generation of the last run.
    ///
    /// # Arguments
    ///
    /// * `runs`: The run numbers.
    /// * `treatment`: The treatment.
    ///
    /// returns: `Result<IndicatorEvolution, QError>`
    pub fn evolve(
        &self,
        runs: RangeInclusive<usize>,
        treatment: &Treatment,
    ) -> Result<IndicatorEvolution, QError> {
        if runs.is_empty() {
            return Err(QError::InvalidInput(format!(
                "The run range {:?} is empty",
                runs
            )));
        }
        let generations = self
            .config
            .final_generation_of(self.source, *runs.end(), treatment)?;
        info!(
            "Calculating the indicators of {:?} for runs {:?} and {generations} generations",
            treatment, runs
        );

        let history = if self.config.parallel {
            runs.into_par_iter()
                .map(|run| self.run_history(run, treatment, generations))
                .collect::<Result<Vec<_>, QError>>()?
        } else {
            runs.map(|run| self.run_history(run, treatment, generations))
                .collect::<Result<Vec<_>, QError>>()?
        };

        let table = |indicator: fn(&IndicatorVector) -> f64| -> Vec<Vec<f64>> {
            history
                .iter()
                .map(|run| run.iter().map(indicator).collect())
                .collect()
        };

        Ok(IndicatorEvolution {
            generations,
            hypervolume: mean_and_std(&table(|v| v.hypervolume))?,
            generational_distance: mean_and_std(&table(|v| v.generational_distance))?,
            spacing: mean_and_std(&table(|v| v.spacing))?,
            cardinality: mean_and_std(&table(|v| v.cardinality as f64))?,
        })
    }
}

#[cfg(test)]
mod test {
    use float_cmp::assert_approx_eq;

    use crate::assessment::indicators::{IndicatorCalculator, IndicatorVector};
    use crate::assessment::{ExperimentConfig, ReferenceData, Treatment};
    use crate::core::test_utils::{assert_approx_array_eq, MemorySource};
    use crate::core::{QError, Solution};

    fn treatment() -> Treatment {
        Treatment::new("Decentralised", "ExpensiveFunction", "NSGAIInew")
    }

    fn front() -> Vec<Solution> {
        vec![
            Solution::new(1.0, 1.0, 1.0),
            Solution::new(2.0, 0.0, 1.0),
            Solution::new(0.0, 2.0, 1.0),
        ]
    }

    /// The reference set is the normalised front.
    fn reference() -> ReferenceData {
        ReferenceData::new(
            vec![2.0, 2.0, 2.0],
            vec![0.0, 0.0, 0.0],
            vec![
                vec![0.5, 0.5, 0.5],
                vec![1.0, 0.0, 0.5],
                vec![0.0, 1.0, 0.5],
            ],
        )
        .unwrap()
    }

    fn config() -> ExperimentConfig {
        ExperimentConfig::new(1..=2, "Decentralised", &["ExpensiveFunction"], &["NSGAIInew"])
            .unwrap()
    }

    #[test]
    fn test_calculate() {
        let t = treatment();
        let mut source = MemorySource::default();
        source.set_final_generation(1, &t, 30);
        source.add_front(1, &t, 30, front(), 2);
        source.add_summary(1, &t, 30, &[(0.1, 1000.0), (0.3, 2000.0)]);

        let config = config();
        let reference = reference();
        let calculator = IndicatorCalculator::new(&source, &config, &reference).unwrap();
        let indicators = calculator.calculate(1, &t).unwrap();

        // only (0.5, 0.5, 0.5) is strictly inside the reference corner
        assert_approx_eq!(f64, indicators.hypervolume, 0.125, epsilon = 1e-12);
        assert_eq!(indicators.generational_distance, 0.0);
        assert_eq!(indicators.spacing, 0.3);
        assert_eq!(indicators.cardinality, 2);
    }

    #[test]
    fn test_generational_distance() {
        let t = treatment();
        let mut source = MemorySource::default();
        source.add_front(1, &t, 5, vec![Solution::new(0.0, 0.0, 0.0)], 1);
        source.add_summary(1, &t, 5, &[(0.2, 1000.0)]);

        let config = config();
        let reference =
            ReferenceData::new(vec![2.0; 3], vec![0.0; 3], vec![vec![0.0, 0.0, 0.5]]).unwrap();
        let calculator = IndicatorCalculator::new(&source, &config, &reference).unwrap();
        let indicators = calculator.calculate_at(1, &t, 5).unwrap();
        assert_approx_eq!(f64, indicators.generational_distance, 0.5, epsilon = 1e-12);
        assert_approx_eq!(f64, indicators.hypervolume, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_generation() {
        let source = MemorySource::default();
        let config = config();
        let reference = reference();
        let calculator = IndicatorCalculator::new(&source, &config, &reference).unwrap();

        let indicators = calculator.calculate_at(1, &treatment(), 12).unwrap();
        assert_eq!(indicators, IndicatorVector::default());
        assert_eq!(indicators.hypervolume, 0.0);
        assert_eq!(indicators.generational_distance, 0.0);
        assert_eq!(indicators.spacing, 0.0);
        assert_eq!(indicators.cardinality, 0);
    }

    #[test]
    fn test_empty_front() {
        let t = treatment();
        let mut source = MemorySource::default();
        source.add_front(1, &t, 1, vec![], 1);
        source.add_summary(1, &t, 1, &[(0.2, 1000.0)]);

        let config = config();
        let reference = reference();
        let calculator = IndicatorCalculator::new(&source, &config, &reference).unwrap();
        assert!(matches!(
            calculator.calculate_at(1, &t, 1),
            Err(QError::EmptyFront(_))
        ));
    }

    #[test]
    fn test_degenerate_reference() {
        let t = treatment();
        let mut source = MemorySource::default();
        source.add_front(1, &t, 1, front(), 1);

        let config = config();
        let reference =
            ReferenceData::new(vec![2.0, 0.0, 2.0], vec![0.0; 3], vec![vec![0.5; 3]]).unwrap();
        let calculator = IndicatorCalculator::new(&source, &config, &reference).unwrap();
        assert!(matches!(
            calculator.calculate_at(1, &t, 1),
            Err(QError::DegenerateReferenceRange { objective: 1, .. })
        ));
    }

    /// Two runs with identical fronts have the same hyper-volume.
    #[test]
    fn test_identical_runs() {
        let t = treatment();
        let mut source = MemorySource::default();
        for run in 1..=2 {
            source.set_final_generation(run, &t, 30);
            for generation in 1..=30 {
                source.add_front(run, &t, generation, front(), 1);
                source.add_summary(run, &t, generation, &[(0.4, 1000.0)]);
            }
        }

        let mut config = config();
        config.final_generation = Some(30);
        let reference = reference();
        let calculator = IndicatorCalculator::new(&source, &config, &reference).unwrap();
        let first = calculator.calculate(1, &t).unwrap();
        let second = calculator.calculate(2, &t).unwrap();
        assert_eq!(first, second);

        let evolution = calculator.evolve(1..=2, &t).unwrap();
        assert_eq!(evolution.generations, 30);
        assert_approx_array_eq(&evolution.hypervolume.mean, &[0.125; 30]);
        assert_approx_array_eq(&evolution.hypervolume.std, &[0.0; 30]);
        assert_approx_array_eq(&evolution.spacing.mean, &[0.4; 30]);
    }

    #[test]
    fn test_evolve() {
        let t = treatment();
        let mut source = MemorySource::default();
        // the number of generations is taken from the last run
        source.set_final_generation(1, &t, 5);
        source.set_final_generation(2, &t, 2);
        for generation in 1..=2 {
            source.add_front(1, &t, generation, front(), 2);
            source.add_summary(1, &t, generation, &[(0.2, 1000.0)]);
        }
        source.add_front(2, &t, 1, front(), 1);
        source.add_summary(2, &t, 1, &[(0.4, 1000.0)]);

        let config = config();
        let reference = reference();
        let calculator = IndicatorCalculator::new(&source, &config, &reference).unwrap();
        let evolution = calculator.evolve(1..=2, &t).unwrap();

        assert_eq!(evolution.generations, 2);
        assert_approx_array_eq(&evolution.hypervolume.mean, &[0.125, 0.0625]);
        assert_approx_array_eq(&evolution.hypervolume.std, &[0.0, 0.0625]);
        assert_approx_array_eq(&evolution.spacing.mean, &[0.3, 0.1]);
        assert_approx_array_eq(&evolution.spacing.std, &[0.1, 0.1]);
        assert_approx_array_eq(&evolution.cardinality.mean, &[1.5, 1.0]);
        assert_approx_array_eq(&evolution.generational_distance.mean, &[0.0, 0.0]);
    }

    #[test]
    fn test_evolve_in_parallel() {
        let t = treatment();
        let mut source = MemorySource::default();
        for run in 1..=4 {
            source.set_final_generation(run, &t, 3);
            for generation in 1..=3 {
                source.add_front(run, &t, generation, front(), run);
                source.add_summary(run, &t, generation, &[(0.1 * run as f64, 1000.0)]);
            }
        }

        let mut config = config();
        let reference = reference();
        let sequential = IndicatorCalculator::new(&source, &config, &reference)
            .unwrap()
            .evolve(1..=4, &t)
            .unwrap();
        config.parallel = true;
        let parallel = IndicatorCalculator::new(&source, &config, &reference)
            .unwrap()
            .evolve(1..=4, &t)
            .unwrap();
        assert_eq!(sequential, parallel);
        assert_approx_array_eq(&parallel.cardinality.mean, &[2.5; 3]);
    }
}
