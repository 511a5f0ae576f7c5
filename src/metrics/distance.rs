use crate::core::QError;
use crate::utils::{euclidean_distance, vector_min};

static GD_NAME: &str = "Generational distance";

/// This struct allows calculation of the Generational Distance (GD) of a front from a reference
/// set:
///
/// $  GD (A, R) =  \frac{1}{| A |} \cdot \[ \sum_{a \in A } min_{r \in R} \quad  d(a, r)^p \]^{1/p} $
///
/// where
/// - $p$ is an exponent set to `2`;
/// - $a$ is an objective point belonging to the front $A$;
/// - $r$ is a point belonging to the reference set $R$. $R$ is either the true Pareto front or a
///   good approximation of it;
/// - $|A|$ the number of points in the front;
/// - $d$ is the Euclidean distance $ \sqrt{ \sum_{j \in 1 }^{M} (a_k-r_k)^2 } $ with `M` being the
///   objective number.
///
/// # Reference
/// > David A. Van Veldhuizen, Gary B. Lamont (1998). “Evolutionary Computation and Convergence to
/// > a Pareto Front.” In John R. Koza (ed.), Late Breaking Papers at the Genetic Programming 1998
/// > Conference, 221-228.
///
/// # Notes
/// The GD metric is not Pareto-compliant and a low distance does not guarantee a good front.
pub struct Distance<'a> {
    /// The points of the front.
    front: &'a [Vec<f64>],
    /// The reference points to use to calculate the distance.
    reference_set: &'a [Vec<f64>],
}

impl<'a> Distance<'a> {
    /// Create the distance metric. This returns an error if the front or reference set is empty,
    /// or if their points have a different size.
    ///
    /// # Arguments
    ///
    /// * `front`: The points of the front.
    /// * `reference_set`: The reference points. This should be either the true Pareto front or its
    ///   good approximation.
    ///
    /// returns: `Result<Distance, QError>`
    pub fn new(front: &'a [Vec<f64>], reference_set: &'a [Vec<f64>]) -> Result<Self, QError> {
        let Some(first) = front.first() else {
            return Err(QError::EmptyFront(GD_NAME.to_string()));
        };
        if reference_set.is_empty() {
            return Err(QError::Metric(
                GD_NAME.to_string(),
                "The reference set is empty".to_string(),
            ));
        }
        if front
            .iter()
            .chain(reference_set)
            .any(|point| point.len() != first.len())
        {
            return Err(QError::Metric(
                GD_NAME.to_string(),
                format!(
                    "All the points in the front and reference set must have {} coordinates",
                    first.len()
                ),
            ));
        }

        Ok(Self {
            front,
            reference_set,
        })
    }

    /// Calculate the generational distance (GD) as the root of the sum of the squared distances
    /// between each point in the front and the closest point in the reference set, divided by the
    /// size of the front.
    ///
    /// returns: `Result<f64, QError>`
    pub fn generational_distance(&self) -> Result<f64, QError> {
        let p = 2;
        let distance_sum = self
            .front
            .iter()
            .map(|a| {
                let distances = self
                    .reference_set
                    .iter()
                    .map(|r| Ok(euclidean_distance(a, r)?.powi(p)))
                    .collect::<Result<Vec<f64>, QError>>()?;
                vector_min(&distances)
            })
            .sum::<Result<f64, QError>>()?;

        Ok(distance_sum.powf(1.0 / p as f64) / self.front.len() as f64)
    }
}

#[cfg(test)]
mod test {
    use float_cmp::assert_approx_eq;

    use crate::core::QError;
    use crate::metrics::Distance;

    #[test]
    fn test_generational_distance() {
        let reference_set = vec![vec![0.0, 0.0, 0.0], vec![1.0, 1.0, 1.0]];
        let front = vec![vec![0.0, 0.0, 1.0], vec![1.0, 1.0, 3.0]];
        let metric = Distance::new(&front, &reference_set).unwrap();
        // nearest distances are 1 and 2
        assert_approx_eq!(
            f64,
            metric.generational_distance().unwrap(),
            5.0_f64.sqrt() / 2.0,
            epsilon = 1e-12
        );
    }

    /// Each point is its own closest reference point.
    #[test]
    fn test_reference_set_against_itself() {
        let reference_set = vec![
            vec![0.0, 0.5, 0.25],
            vec![0.5, 0.0, 0.25],
            vec![0.25, 0.25, 0.0],
        ];
        let metric = Distance::new(&reference_set, &reference_set).unwrap();
        assert_eq!(metric.generational_distance().unwrap(), 0.0);
    }

    #[test]
    fn test_invalid_input() {
        let reference_set = vec![vec![0.0, 0.0, 0.0]];
        match Distance::new(&[], &reference_set) {
            Err(QError::EmptyFront(name)) => assert_eq!(name, "Generational distance"),
            _ => panic!("Expected an empty front error"),
        }

        let front = vec![vec![0.0, 0.0, 0.0]];
        assert!(Distance::new(&front, &[])
            .err()
            .unwrap()
            .to_string()
            .contains("The reference set is empty"));

        let front = vec![vec![0.0, 0.0]];
        assert!(Distance::new(&front, &reference_set)
            .err()
            .unwrap()
            .to_string()
            .contains("must have 2 coordinates"));
    }
}
