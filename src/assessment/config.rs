use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assessment::ResultSource;
use crate::core::{QError, NUMBER_OF_OBJECTIVES};

/// The composition model, objective function and optimisation algorithm identifying the
/// results of an experiment run.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Treatment {
    /// The composition model (for example `Centralised` or `Decentralised`).
    pub model: String,
    /// The fitness function (for example `ExpensiveFunction` or a surrogate model name).
    pub function: String,
    /// The optimisation algorithm (for example `NSGAIInew`).
    pub algorithm: String,
}

impl Treatment {
    pub fn new(model: &str, function: &str, algorithm: &str) -> Self {
        Self {
            model: model.to_string(),
            function: function.to_string(),
            algorithm: algorithm.to_string(),
        }
    }
}

/// The part of an experiment that does not change when comparing approaches. The other part
/// (the variable) is given with the list of names being compared.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixedRole {
    /// The fitness function is fixed and the algorithms are compared.
    Function(String),
    /// The algorithm is fixed and the fitness functions are compared.
    Algorithm(String),
}

impl FixedRole {
    /// Build the treatment for a variable being compared.
    ///
    /// # Arguments
    ///
    /// * `model`: The composition model.
    /// * `variable`: The name of the algorithm when the function is fixed, or the name of the
    ///   function when the algorithm is fixed.
    ///
    /// returns: `Treatment`
    pub fn treatment(&self, model: &str, variable: &str) -> Treatment {
        match self {
            FixedRole::Function(function) => Treatment::new(model, function, variable),
            FixedRole::Algorithm(algorithm) => Treatment::new(model, variable, algorithm),
        }
    }
}

/// Thresholds applied to the solutions when summarising the QoS values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// The minimum success ratio (as percentage) a solution must have to be included in the QoS
    /// statistics.
    #[serde(default)]
    pub success_ratio: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { success_ratio: 0.0 }
    }
}

fn default_reference_corner() -> Vec<f64> {
    vec![1.0; NUMBER_OF_OBJECTIVES]
}

fn default_digits() -> u32 {
    3
}

/// The configuration of the assessment of a group of experiments compared together.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// The first run number.
    pub start_run: usize,
    /// The last run number (inclusive).
    pub end_run: usize,
    /// The composition model used by all the runs.
    pub composition_model: String,
    /// The fitness functions.
    pub objective_functions: Vec<String>,
    /// The optimisation algorithms.
    pub algorithms: Vec<String>,
    /// When provided, this generation is used as final generation of every run instead of
    /// discovering it from the run results.
    #[serde(default)]
    pub final_generation: Option<usize>,
    #[serde(default)]
    pub thresholds: Thresholds,
    /// The reference corner for the hyper-volume of the normalised fronts.
    #[serde(default = "default_reference_corner")]
    pub reference_corner: Vec<f64>,
    /// The number of decimal digits the run summaries are rounded to.
    #[serde(default = "default_digits")]
    pub digits: u32,
    /// Whether to calculate the indicators of the runs in parallel.
    #[serde(default)]
    pub parallel: bool,
}

impl ExperimentConfig {
    /// Create a configuration with the default options.
    ///
    /// # Arguments
    ///
    /// * `runs`: The run numbers.
    /// * `composition_model`: The composition model.
    /// * `objective_functions`: The fitness functions.
    /// * `algorithms`: The optimisation algorithms.
    ///
    /// returns: `Result<ExperimentConfig, QError>`
    pub fn new(
        runs: RangeInclusive<usize>,
        composition_model: &str,
        objective_functions: &[&str],
        algorithms: &[&str],
    ) -> Result<Self, QError> {
        let config = Self {
            start_run: *runs.start(),
            end_run: *runs.end(),
            composition_model: composition_model.to_string(),
            objective_functions: objective_functions.iter().map(|f| f.to_string()).collect(),
            algorithms: algorithms.iter().map(|a| a.to_string()).collect(),
            final_generation: None,
            thresholds: Thresholds::default(),
            reference_corner: default_reference_corner(),
            digits: default_digits(),
            parallel: false,
        };
        config.validate()?;
        Ok(config)
    }

    /// Read and validate the configuration from a JSON file.
    ///
    /// # Arguments
    ///
    /// * `file`: The path to the JSON file.
    ///
    /// returns: `Result<ExperimentConfig, QError>`
    pub fn from_file(file: &Path) -> Result<Self, QError> {
        let data = fs::read_to_string(file).map_err(|e| {
            QError::Config(format!("Cannot read the file {}: {}", file.display(), e))
        })?;
        let config: Self = serde_json::from_str(&data).map_err(|e| {
            QError::Config(format!("Cannot parse the file {}: {}", file.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration options.
    ///
    /// returns: `Result<(), QError>`
    pub fn validate(&self) -> Result<(), QError> {
        if self.start_run == 0 {
            return Err(QError::Config("Run numbers start from 1".to_string()));
        }
        if self.start_run > self.end_run {
            return Err(QError::Config(format!(
                "The first run ({}) must not be larger than the last run ({})",
                self.start_run, self.end_run
            )));
        }
        if self.composition_model.is_empty() {
            return Err(QError::Config(
                "The composition model cannot be empty".to_string(),
            ));
        }
        if self.objective_functions.is_empty() {
            return Err(QError::Config(
                "At least one objective function is needed".to_string(),
            ));
        }
        if self.algorithms.is_empty() {
            return Err(QError::Config("At least one algorithm is needed".to_string()));
        }
        if self.reference_corner.len() != NUMBER_OF_OBJECTIVES {
            return Err(QError::Config(format!(
                "The reference corner must have {} coordinates, but {} given",
                NUMBER_OF_OBJECTIVES,
                self.reference_corner.len()
            )));
        }
        if self
            .reference_corner
            .iter()
            .any(|c| !c.is_finite() || *c <= 0.0)
        {
            return Err(QError::Config(format!(
                "The reference corner coordinates {:?} must be strictly positive",
                self.reference_corner
            )));
        }
        if self.final_generation == Some(0) {
            return Err(QError::Config(
                "The final generation must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The run numbers.
    ///
    /// returns: `RangeInclusive<usize>`
    pub fn runs(&self) -> RangeInclusive<usize> {
        self.start_run..=self.end_run
    }

    /// The final generation of a run. This is [`ExperimentConfig::final_generation`] when set,
    /// otherwise the last generation found in the run results.
    ///
    /// # Arguments
    ///
    /// * `source`: The experiment results.
    /// * `run`: The run number.
    /// * `treatment`: The run treatment.
    ///
    /// returns: `Result<usize, QError>`
    pub fn final_generation_of<S: ResultSource + ?Sized>(
        &self,
        source: &S,
        run: usize,
        treatment: &Treatment,
    ) -> Result<usize, QError> {
        match self.final_generation {
            Some(generation) => Ok(generation),
            None => source.final_generation(run, treatment),
        }
    }

    /// All the treatments in the comparison group (every combination of function and algorithm).
    ///
    /// returns: `Vec<Treatment>`
    pub fn treatments(&self) -> Vec<Treatment> {
        let mut treatments = Vec::new();
        for algorithm in &self.algorithms {
            for function in &self.objective_functions {
                treatments.push(Treatment::new(
                    &self.composition_model,
                    function,
                    algorithm,
                ));
            }
        }
        treatments
    }
}
