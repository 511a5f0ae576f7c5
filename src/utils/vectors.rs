use crate::core::QError;

/// Define the sort type
#[derive(PartialEq)]
pub enum Sort {
    /// Sort values in ascending order
    Ascending,
    /// Sort values in descending order
    Descending,
}

/// Returns the indices that would sort an array in ascending order. The sort is stable.
///
/// # Arguments
///
/// * `data`: The vector to sort.
/// * `sort_type`: Specify whether to sort in ascending or descending order.
///
/// returns: `Vec<usize>`. The vector with the indices.
pub fn argsort(data: &[f64], sort_type: Sort) -> Vec<usize> {
    let mut indices = (0..data.len()).collect::<Vec<_>>();
    indices.sort_by(|a, b| data[*a].total_cmp(&data[*b]));

    if sort_type == Sort::Descending {
        indices.reverse();
    }
    indices
}

/// Calculate the vector minimum value.
///
/// # Arguments
///
/// * `v`: The vector.
///
/// returns: `Result<f64, QError>`
pub fn vector_min(v: &[f64]) -> Result<f64, QError> {
    Ok(*v
        .iter()
        .min_by(|a, b| a.total_cmp(b))
        .ok_or(QError::InvalidInput(
            "Cannot calculate vector min value of an empty vector".to_string(),
        ))?)
}

/// Calculate the vector maximum value.
///
/// # Arguments
///
/// * `v`: The vector.
///
/// returns: `Result<f64, QError>`
pub fn vector_max(v: &[f64]) -> Result<f64, QError> {
    Ok(*v
        .iter()
        .max_by(|a, b| a.total_cmp(b))
        .ok_or(QError::InvalidInput(
            "Cannot calculate vector max value of an empty vector".to_string(),
        ))?)
}

/// Calculate the Euclidean distance between two points in the objective space.
///
/// # Arguments
///
/// * `a`: The first point.
/// * `b`: The second point.
///
/// returns: `Result<f64, QError>`. An error is returned if the points have a different size.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> Result<f64, QError> {
    if a.len() != b.len() {
        return Err(QError::InvalidInput(format!(
            "The points must have the same size to calculate their distance, but {} and {} given",
            a.len(),
            b.len()
        )));
    }
    Ok(a.iter()
        .zip(b)
        .map(|(a_k, b_k)| (a_k - b_k).powi(2))
        .sum::<f64>()
        .sqrt())
}

/// Round a number to the given number of decimal digits. Ties are rounded to the nearest even
/// value, as numpy does.
///
/// # Arguments
///
/// * `value`: The number.
/// * `digits`: The number of decimal digits.
///
/// returns: `f64`
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10_f64.powi(digits as i32);
    (value * factor).round_ties_even() / factor
}
