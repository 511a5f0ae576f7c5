use serde::Serialize;

use crate::core::QError;
use crate::utils::vectors::{round_to, vector_max, vector_min};

/// The number of decimal digits the column statistics from [`mean_and_std`] are rounded to.
pub const AGGREGATION_DIGITS: u32 = 4;

/// Means and standard deviations of a set of samples, one item per column or generation.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MeanStd {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

/// Calculate the mean and the population standard deviation of a vector.
///
/// # Arguments
///
/// * `values`: The vector.
///
/// returns: `Result<(f64, f64), QError>`. An error is returned if the vector is empty.
pub fn mean_std(values: &[f64]) -> Result<(f64, f64), QError> {
    if values.is_empty() {
        return Err(QError::InvalidInput(
            "Cannot calculate the mean and standard deviation of an empty vector".to_string(),
        ));
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Ok((mean, variance.sqrt()))
}

/// Calculate the mean and the population (not Bessel-corrected) standard deviation of each
/// column of a table. Values are rounded to [`AGGREGATION_DIGITS`] digits.
///
/// # Arguments
///
/// * `table`: The table. Each nested vector is a row (for example a run) and each column an
///   item to aggregate (for example a generation). All rows must have the same size.
///
/// returns: `Result<MeanStd, QError>`
pub fn mean_and_std(table: &[Vec<f64>]) -> Result<MeanStd, QError> {
    let columns = table
        .first()
        .ok_or(QError::InvalidInput(
            "The table to aggregate has no rows".to_string(),
        ))?
        .len();
    for (row, values) in table.iter().enumerate() {
        if values.len() != columns {
            return Err(QError::ShapeMismatch {
                row,
                expected: columns,
                found: values.len(),
            });
        }
    }

    let mut stats = MeanStd::default();
    for column in 0..columns {
        let values: Vec<f64> = table.iter().map(|row| row[column]).collect();
        let (mean, std) = mean_std(&values)?;
        stats.mean.push(round_to(mean, AGGREGATION_DIGITS));
        stats.std.push(round_to(std, AGGREGATION_DIGITS));
    }
    Ok(stats)
}

/// Calculate the q-th percentile of a vector using linear interpolation between the two closest
/// ranks (numpy's default method).
///
/// # Arguments
///
/// * `values`: The vector.
/// * `q`: The percentile between 0 and 100.
///
/// returns: `Result<f64, QError>`
pub fn percentile(values: &[f64], q: f64) -> Result<f64, QError> {
    if values.is_empty() {
        return Err(QError::InvalidInput(
            "Cannot calculate the percentile of an empty vector".to_string(),
        ));
    }
    if !(0.0..=100.0).contains(&q) {
        return Err(QError::InvalidInput(format!(
            "The percentile ({q}) must be between 0 and 100"
        )));
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Summary statistics of a sample of QoS values.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DescriptiveStatistics {
    pub mean: f64,
    /// The population standard deviation.
    pub std: f64,
    pub min: f64,
    pub first_quartile: f64,
    pub median: f64,
    pub third_quartile: f64,
    pub max: f64,
}

impl DescriptiveStatistics {
    /// Calculate the statistics of a sample.
    ///
    /// # Arguments
    ///
    /// * `values`: The sample.
    /// * `digits`: The number of decimal digits to round the statistics to.
    ///
    /// returns: `Result<DescriptiveStatistics, QError>`
    pub fn new(values: &[f64], digits: u32) -> Result<Self, QError> {
        let (mean, std) = mean_std(values)?;
        Ok(Self {
            mean: round_to(mean, digits),
            std: round_to(std, digits),
            min: round_to(vector_min(values)?, digits),
            first_quartile: round_to(percentile(values, 25.0)?, digits),
            median: round_to(percentile(values, 50.0)?, digits),
            third_quartile: round_to(percentile(values, 75.0)?, digits),
            max: round_to(vector_max(values)?, digits),
        })
    }

    /// The statistics in the order: mean, standard deviation, minimum, first quartile, median,
    /// third quartile and maximum.
    ///
    /// returns: `[f64; 7]`
    pub fn to_array(&self) -> [f64; 7] {
        [
            self.mean,
            self.std,
            self.min,
            self.first_quartile,
            self.median,
            self.third_quartile,
            self.max,
        ]
    }
}
