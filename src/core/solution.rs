use serde::{Deserialize, Serialize};

/// The number of objectives of the service composition problem.
pub const NUMBER_OF_OBJECTIVES: usize = 3;

/// An evaluated service composition in the objective space. All objectives are minimised.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct Solution {
    /// The composition response time.
    #[serde(rename = "ResponseTime")]
    pub response_time: f64,
    /// The network latency.
    #[serde(rename = "NetworkLatency")]
    pub network_latency: f64,
    /// The consumed energy.
    #[serde(rename = "Energy")]
    pub energy: f64,
}

impl Solution {
    /// Create a new solution.
    ///
    /// # Arguments
    ///
    /// * `response_time`: The response time.
    /// * `network_latency`: The network latency.
    /// * `energy`: The energy.
    ///
    /// returns: `Solution`
    pub fn new(response_time: f64, network_latency: f64, energy: f64) -> Self {
        Self {
            response_time,
            network_latency,
            energy,
        }
    }

    /// The objective values in the order (response time, network latency, energy).
    ///
    /// returns: `[f64; NUMBER_OF_OBJECTIVES]`
    pub fn objectives(&self) -> [f64; NUMBER_OF_OBJECTIVES] {
        [self.response_time, self.network_latency, self.energy]
    }
}

/// A row of the worst-case QoS metrics table exported by a run.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct QosRecord {
    #[serde(rename = "Delay2")]
    pub delay: f64,
    #[serde(rename = "Energy")]
    pub energy: f64,
    /// The success ratio as percentage.
    #[serde(rename = "Success_Ratio")]
    pub success_ratio: f64,
}

impl QosRecord {
    /// The objective values used to build the reference and utopia points. The success ratio is
    /// turned into a minimised objective as `100 - success_ratio`.
    ///
    /// returns: `[f64; NUMBER_OF_OBJECTIVES]`
    pub fn objectives(&self) -> [f64; NUMBER_OF_OBJECTIVES] {
        [self.delay, self.energy, 100.0 - self.success_ratio]
    }
}

/// A row of the per-generation results summary of a run. Only the fields used by the indicators
/// are decoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct GenerationRecord {
    /// The spacing (spread) indicator calculated by the optimiser.
    #[serde(rename = "Spacing", default)]
    pub spacing: Option<f64>,
    /// The generation execution time in milliseconds.
    #[serde(rename = "ExecutionTime", default)]
    pub execution_time: Option<f64>,
}

/// The Pareto front exported by a run at a generation. The front may be split across several
/// files.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParetoFront {
    /// The solutions from all the files. These are not sorted and may contain duplicates.
    pub solutions: Vec<Solution>,
    /// The number of files the front was read from.
    pub files: usize,
}

impl ParetoFront {
    /// Create a front.
    ///
    /// # Arguments
    ///
    /// * `solutions`: The solutions.
    /// * `files`: The number of files holding the solutions.
    ///
    /// returns: `ParetoFront`
    pub fn new(solutions: Vec<Solution>, files: usize) -> Self {
        Self { solutions, files }
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }
}
