use crate::core::QError;
use crate::utils::{argsort, vector_min, Sort};

static HV_NAME: &str = "Hyper-volume";

/// Calculate the exact hyper-volume of a set of points where all objectives are minimised. The
/// hyper-volume is the volume of the region dominated by the points and bounded by a reference
/// point (or corner).
///
/// The volume is calculated with the dimension-sweep (slicing) approach: the points are sorted by
/// their last coordinate and the hyper-rectangle between the points and the reference point is
/// cut into slices at each coordinate value. The volume of each slice is its thickness times the
/// hyper-volume, in one dimension less, of the points lying below the slice. In two dimensions
/// the area is calculated by sweeping the points sorted by the first coordinate.
///
/// **IMPLEMENTATION NOTES**:
/// 1) Points must weakly dominate the reference point to contribute to the metric. Points with
///    at least one coordinate larger than the reference point are ignored, points with a
///    coordinate equal to the reference point contribute with a zero volume.
/// 2) Duplicated and dominated points do not change the hyper-volume and the result does not
///    depend on the order of the points.
/// 3) An empty set of points has a zero hyper-volume.
///
/// > Fonseca, C. M., Paquete, L., & López-Ibáñez, M. (2006). An improved dimension-sweep algorithm
/// > for the hypervolume indicator. In IEEE Congress on Evolutionary Computation, 1157-1163.
#[derive(Debug, Clone)]
pub struct HyperVolume {
    /// The reference point.
    reference_point: Vec<f64>,
}

impl HyperVolume {
    /// Initialise the metric with the reference point.
    ///
    /// # Arguments
    ///
    /// * `reference_point`: The reference or anti-optimal point. For normalised objectives, this
    ///   is usually `[1.0, 1.0, 1.0]`.
    ///
    /// returns: `Result<HyperVolume, QError>`
    pub fn new(reference_point: &[f64]) -> Result<Self, QError> {
        if reference_point.is_empty() {
            return Err(QError::Metric(
                HV_NAME.to_string(),
                "The reference point must have at least one coordinate".to_string(),
            ));
        }
        if reference_point.iter().any(|c| !c.is_finite()) {
            return Err(QError::Metric(
                HV_NAME.to_string(),
                format!("The reference point {:?} must be finite", reference_point),
            ));
        }
        Ok(Self {
            reference_point: reference_point.to_vec(),
        })
    }

    /// The reference point.
    ///
    /// returns: `&[f64]`
    pub fn reference_point(&self) -> &[f64] {
        &self.reference_point
    }

    /// Calculate the hyper-volume.
    ///
    /// # Arguments
    ///
    /// * `points`: The points. Each nested vector is a point whose size must match the size of the
    ///   reference point.
    ///
    /// returns: `Result<f64, QError>`
    pub fn compute(&self, points: &[Vec<f64>]) -> Result<f64, QError> {
        let dimensions = self.reference_point.len();
        for (idx, point) in points.iter().enumerate() {
            if point.len() != dimensions {
                return Err(QError::Metric(
                    HV_NAME.to_string(),
                    format!(
                        "Point #{} has {} coordinates, but the reference point has {}",
                        idx,
                        point.len(),
                        dimensions
                    ),
                ));
            }
            if point.iter().any(|v| v.is_nan()) {
                return Err(QError::Metric(
                    HV_NAME.to_string(),
                    format!("NaN detected in point #{}", idx),
                ));
            }
        }

        // only points dominating the reference point contribute
        let mut relevant: Vec<&[f64]> = points
            .iter()
            .filter(|p| p.iter().zip(&self.reference_point).all(|(v, r)| v <= r))
            .map(|p| p.as_slice())
            .collect();

        self.volume(&mut relevant, dimensions)
    }

    /// Calculate the hyper-volume of the `points` using their first `dimensions` coordinates.
    ///
    /// # Arguments
    ///
    /// * `points`: The points.
    /// * `dimensions`: The number of coordinates to use.
    ///
    /// returns: `Result<f64, QError>`
    fn volume(&self, points: &mut [&[f64]], dimensions: usize) -> Result<f64, QError> {
        if points.is_empty() {
            return Ok(0.0);
        }

        match dimensions {
            1 => {
                let values: Vec<f64> = points.iter().map(|p| p[0]).collect();
                Ok(self.reference_point[0] - vector_min(&values)?)
            }
            2 => Ok(self.area(points)),
            _ => {
                let last = dimensions - 1;
                points.sort_by(|a, b| a[last].total_cmp(&b[last]));

                let mut volume = 0.0;
                for idx in 0..points.len() {
                    let upper = match points.get(idx + 1) {
                        Some(next) => next[last],
                        None => self.reference_point[last],
                    };
                    let thickness = upper - points[idx][last];
                    if thickness > 0.0 {
                        let mut slice = points[..=idx].to_vec();
                        volume += thickness * self.volume(&mut slice, last)?;
                    }
                }
                Ok(volume)
            }
        }
    }

    /// Calculate the area dominated by the points using the first two coordinates.
    ///
    /// # Arguments
    ///
    /// * `points`: The points.
    ///
    /// returns: `f64`
    fn area(&self, points: &[&[f64]]) -> f64 {
        let x: Vec<f64> = points.iter().map(|p| p[0]).collect();
        let mut best_y = self.reference_point[1];
        let mut area = 0.0;

        // points with the same x are visited in any order, only the smallest y adds area
        for idx in argsort(&x, Sort::Ascending) {
            let point = points[idx];
            if point[1] < best_y {
                area += (self.reference_point[0] - point[0]) * (best_y - point[1]);
                best_y = point[1];
            }
        }
        area
    }
}
