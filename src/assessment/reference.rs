use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::assessment::{ExperimentConfig, ResultSource};
use crate::core::{QError, Solution, NUMBER_OF_OBJECTIVES};
use crate::utils::pareto_frontier_nd;

/// The initial coordinate of the utopia point. Coordinates of the worst-case front above this
/// value are never selected.
pub const UTOPIA_START: f64 = 10000.0;

/// Normalise a point as `(value - utopia) / (reference - utopia)` for each coordinate.
///
/// # Arguments
///
/// * `values`: The point to normalise.
/// * `utopia_point`: The utopia (ideal) point.
/// * `reference_point`: The reference (nadir) point.
///
/// returns: `Result<Vec<f64>, QError>`. An error is returned if the reference and utopia points
/// have the same coordinate for an objective.
pub fn normalise(
    values: &[f64],
    utopia_point: &[f64],
    reference_point: &[f64],
) -> Result<Vec<f64>, QError> {
    if values.len() != utopia_point.len() || values.len() != reference_point.len() {
        return Err(QError::InvalidInput(format!(
            "The point ({}), utopia point ({}) and reference point ({}) must have the same size",
            values.len(),
            utopia_point.len(),
            reference_point.len()
        )));
    }

    values
        .iter()
        .zip(utopia_point.iter().zip(reference_point))
        .enumerate()
        .map(|(objective, (value, (utopia, reference)))| {
            let range = reference - utopia;
            if range == 0.0 {
                return Err(QError::DegenerateReferenceRange {
                    objective,
                    value: *reference,
                });
            }
            Ok((value - utopia) / range)
        })
        .collect()
}

/// Collect the worst-case QoS metrics of the final generation of every run, for every treatment
/// in the comparison group, and filter them with [`pareto_frontier_nd`].
///
/// # Arguments
///
/// * `source`: The experiment results.
/// * `config`: The configuration of the comparison group.
///
/// returns: `Result<Vec<Vec<f64>>, QError>`
pub fn worst_case_front<S: ResultSource + ?Sized>(
    source: &S,
    config: &ExperimentConfig,
) -> Result<Vec<Vec<f64>>, QError> {
    let mut points: Vec<Vec<f64>> = Vec::new();
    for treatment in config.treatments() {
        for run in config.runs() {
            let generation = config.final_generation_of(source, run, &treatment)?;
            match source.qos_metrics(run, &treatment, generation)? {
                Some(records) => points.extend(records.iter().map(|r| r.objectives().to_vec())),
                None => debug!(
                    "No QoS metrics for run #{run} of {:?} at generation #{generation}",
                    treatment
                ),
            }
        }
    }
    info!("initial front size = {}", points.len());

    let front = pareto_frontier_nd(&points)?;
    info!("front size = {}", front.len());
    Ok(front)
}

/// Componentwise maximum of the front, starting from 0.
fn nadir(front: &[Vec<f64>]) -> Vec<f64> {
    let mut point = vec![0.0; NUMBER_OF_OBJECTIVES];
    for values in front {
        for (coordinate, value) in point.iter_mut().zip(values) {
            if *value > *coordinate {
                *coordinate = *value;
            }
        }
    }
    if front.is_empty() {
        warn!("No QoS metrics were found. The reference point is {:?}", point);
    }
    point
}

/// Componentwise minimum of the front, starting from [`UTOPIA_START`].
fn ideal(front: &[Vec<f64>]) -> Vec<f64> {
    let mut point = vec![UTOPIA_START; NUMBER_OF_OBJECTIVES];
    for values in front {
        for (coordinate, value) in point.iter_mut().zip(values) {
            if *value < *coordinate {
                *coordinate = *value;
            }
        }
    }
    if front.is_empty() {
        warn!("No QoS metrics were found. The utopia point is {:?}", point);
    }
    point
}

/// Find the reference point, the worst (nadir) point of the worst-case front of all the runs in
/// the comparison group. The point is made of the delay, the energy and the success ratio
/// complement (`100 - success_ratio`).
///
/// When no QoS metrics are available the point is `[0, 0, 0]`. No error is raised in this case
/// and the point must be checked by the caller.
///
/// # Arguments
///
/// * `source`: The experiment results.
/// * `config`: The configuration of the comparison group.
///
/// returns: `Result<Vec<f64>, QError>`
pub fn reference_point<S: ResultSource + ?Sized>(
    source: &S,
    config: &ExperimentConfig,
) -> Result<Vec<f64>, QError> {
    Ok(nadir(&worst_case_front(source, config)?))
}

/// Find the utopia point, the best (ideal) point of the worst-case front of all the runs in the
/// comparison group.
///
/// # Arguments
///
/// * `source`: The experiment results.
/// * `config`: The configuration of the comparison group.
///
/// returns: `Result<Vec<f64>, QError>`
pub fn utopia_point<S: ResultSource + ?Sized>(
    source: &S,
    config: &ExperimentConfig,
) -> Result<Vec<f64>, QError> {
    Ok(ideal(&worst_case_front(source, config)?))
}

/// Find the reference set used to calculate the generational distance. The solutions of the
/// final Pareto front of all the runs in the comparison group are normalised with
/// [`normalise`] and filtered with [`pareto_frontier_nd`]. Each coordinate of the resulting front
/// is then divided by the corresponding coordinate of the reference point.
///
/// # Arguments
///
/// * `source`: The experiment results.
/// * `config`: The configuration of the comparison group.
/// * `reference_point`: The reference point from [`reference_point`].
/// * `utopia_point`: The utopia point from [`utopia_point`].
///
/// returns: `Result<Vec<Vec<f64>>, QError>`
pub fn reference_set<S: ResultSource + ?Sized>(
    source: &S,
    config: &ExperimentConfig,
    reference_point: &[f64],
    utopia_point: &[f64],
) -> Result<Vec<Vec<f64>>, QError> {
    let mut points: Vec<Vec<f64>> = Vec::new();
    for treatment in config.treatments() {
        for run in config.runs() {
            let generation = config.final_generation_of(source, run, &treatment)?;
            if let Some(front) = source.pareto_front(run, &treatment, generation)? {
                for solution in &front.solutions {
                    points.push(normalise(
                        &solution.objectives(),
                        utopia_point,
                        reference_point,
                    )?);
                }
            }
        }
    }

    let mut reference_set = pareto_frontier_nd(&points)?;
    info!(
        "Reference set has {} points out of {} solutions",
        reference_set.len(),
        points.len()
    );

    for point in reference_set.iter_mut() {
        for (objective, (value, reference)) in point.iter_mut().zip(reference_point).enumerate() {
            if *reference == 0.0 {
                return Err(QError::DegenerateReferenceRange {
                    objective,
                    value: *reference,
                });
            }
            *value /= reference;
        }
    }
    Ok(reference_set)
}

/// The data shared by all the indicator calculations of a comparison group. This is calculated
/// once with [`ReferenceData::initialise`] and never changed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    /// The worst (nadir) point of all the runs.
    pub reference_point: Vec<f64>,
    /// The best (ideal) point of all the runs.
    pub utopia_point: Vec<f64>,
    /// The normalised Pareto front of all the runs.
    pub reference_set: Vec<Vec<f64>>,
}

impl ReferenceData {
    /// Create the data from known points and set.
    ///
    /// # Arguments
    ///
    /// * `reference_point`: The reference point.
    /// * `utopia_point`: The utopia point.
    /// * `reference_set`: The normalised reference set.
    ///
    /// returns: `Result<ReferenceData, QError>`
    pub fn new(
        reference_point: Vec<f64>,
        utopia_point: Vec<f64>,
        reference_set: Vec<Vec<f64>>,
    ) -> Result<Self, QError> {
        if reference_point.len() != NUMBER_OF_OBJECTIVES
            || utopia_point.len() != NUMBER_OF_OBJECTIVES
        {
            return Err(QError::InvalidInput(format!(
                "The reference and utopia points must have {} coordinates",
                NUMBER_OF_OBJECTIVES
            )));
        }
        if reference_set
            .iter()
            .any(|p| p.len() != NUMBER_OF_OBJECTIVES)
        {
            return Err(QError::InvalidInput(format!(
                "The points of the reference set must have {} coordinates",
                NUMBER_OF_OBJECTIVES
            )));
        }
        Ok(Self {
            reference_point,
            utopia_point,
            reference_set,
        })
    }

    /// Calculate the reference point, utopia point and reference set of a comparison group.
    ///
    /// # Arguments
    ///
    /// * `source`: The experiment results.
    /// * `config`: The configuration of the comparison group.
    ///
    /// returns: `Result<ReferenceData, QError>`
    pub fn initialise<S: ResultSource + ?Sized>(
        source: &S,
        config: &ExperimentConfig,
    ) -> Result<Self, QError> {
        info!(
            "Initialising the reference data for runs {:?} of {} treatments",
            config.runs(),
            config.treatments().len()
        );
        let front = worst_case_front(source, config)?;
        let reference_point = nadir(&front);
        let utopia_point = ideal(&front);
        info!("Reference point = {:?}", reference_point);
        info!("Utopia point = {:?}", utopia_point);

        let reference_set = reference_set(source, config, &reference_point, &utopia_point)?;
        Ok(Self {
            reference_point,
            utopia_point,
            reference_set,
        })
    }

    /// Normalise a solution with the utopia and reference points. See [`normalise`].
    ///
    /// # Arguments
    ///
    /// * `solution`: The solution.
    ///
    /// returns: `Result<Vec<f64>, QError>`
    pub fn normalise(&self, solution: &Solution) -> Result<Vec<f64>, QError> {
        normalise(
            &solution.objectives(),
            &self.utopia_point,
            &self.reference_point,
        )
    }
}
