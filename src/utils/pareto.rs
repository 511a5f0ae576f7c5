use crate::core::QError;

/// Find the points lying on the Pareto frontier of two equally-sized lists of coordinates.
///
/// The points are sorted by `x` (in ascending order when `maximise_x` is `false`, in descending
/// order otherwise; ties are sorted by `y` in the same direction). The first sorted point starts
/// the frontier and any following point is appended only when its `y` does not worsen compared to
/// the last appended point (`>=` when `maximise_y` is `true`, `<=` otherwise). The result is a
/// monotonic staircase.
///
/// # Arguments
///
/// * `xs`: The x coordinates.
/// * `ys`: The y coordinates.
/// * `maximise_x`: Whether the `x` coordinate is maximised.
/// * `maximise_y`: Whether the `y` coordinate is maximised.
///
/// returns: `Result<(Vec<f64>, Vec<f64>), QError>`. The coordinates of the frontier points. An
/// error is returned if the lists are empty or have a different size.
pub fn pareto_frontier_2d(
    xs: &[f64],
    ys: &[f64],
    maximise_x: bool,
    maximise_y: bool,
) -> Result<(Vec<f64>, Vec<f64>), QError> {
    if xs.len() != ys.len() {
        return Err(QError::InvalidInput(format!(
            "The number of x coordinates ({}) must match the number of y coordinates ({})",
            xs.len(),
            ys.len()
        )));
    }
    if xs.is_empty() {
        return Err(QError::InvalidInput(
            "At least one point is needed to find the Pareto frontier".to_string(),
        ));
    }

    let mut pairs: Vec<(f64, f64)> = xs.iter().copied().zip(ys.iter().copied()).collect();
    pairs.sort_by(|a, b| {
        let order = a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1));
        if maximise_x {
            order.reverse()
        } else {
            order
        }
    });

    let mut front = vec![pairs[0]];
    for pair in pairs.into_iter().skip(1) {
        // unwrap is safe, front is never empty
        let last_y = front.last().unwrap().1;
        let keep = if maximise_y {
            pair.1 >= last_y
        } else {
            pair.1 <= last_y
        };
        if keep {
            front.push(pair);
        }
    }

    Ok(front.into_iter().unzip())
}

/// Find the front of a set of multi-dimensional points where all coordinates are minimised.
///
/// The points are stably sorted by their first coordinate in ascending order. The first point
/// starts the front and any following point is appended when it is strictly smaller than the
/// **last appended point** in at least one coordinate. Points are never compared against the
/// other points already in the front, therefore the result may still contain dominated points.
/// This reproduces the filter the reference data of past experiments were generated with.
///
/// # Arguments
///
/// * `points`: The points. Each nested vector is a point and all points must have the same size.
///
/// returns: `Result<Vec<Vec<f64>>, QError>`. An empty vector is returned when `points` is empty.
pub fn pareto_frontier_nd(points: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, QError> {
    let Some(first) = points.first() else {
        return Ok(Vec::new());
    };
    let dimensions = first.len();
    if dimensions == 0 {
        return Err(QError::InvalidInput(
            "The points must have at least one coordinate".to_string(),
        ));
    }
    if let Some((idx, p)) = points
        .iter()
        .enumerate()
        .find(|(_, p)| p.len() != dimensions)
    {
        return Err(QError::InvalidInput(format!(
            "Point #{} has {} coordinates, but {} were expected",
            idx,
            p.len(),
            dimensions
        )));
    }

    let mut sorted: Vec<&Vec<f64>> = points.iter().collect();
    sorted.sort_by(|a, b| a[0].total_cmp(&b[0]));

    let mut front: Vec<Vec<f64>> = vec![sorted[0].clone()];
    for point in sorted.into_iter().skip(1) {
        // unwrap is safe, front is never empty
        let last = front.last().unwrap();
        if point.iter().zip(last).any(|(p, l)| p < l) {
            front.push(point.clone());
        }
    }

    Ok(front)
}
