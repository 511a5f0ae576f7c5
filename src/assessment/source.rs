use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::de::DeserializeOwned;

use crate::assessment::Treatment;
use crate::core::{GenerationRecord, ParetoFront, QError, QosRecord, Solution};

/// The name of the file with the population dump in the QoS metrics folders. This is not part of
/// the QoS metrics of a front.
pub const POPULATION_FILE: &str = "population.csv";

/// Access to the data exported by the experiment runs.
pub trait ResultSource: Send + Sync {
    /// Get the last generation reached by a run.
    ///
    /// # Arguments
    ///
    /// * `run`: The run number.
    /// * `treatment`: The run treatment.
    ///
    /// returns: `Result<usize, QError>`. This is `0` when the run has no results.
    fn final_generation(&self, run: usize, treatment: &Treatment) -> Result<usize, QError>;

    /// Get the Pareto front of a run at a generation.
    ///
    /// # Arguments
    ///
    /// * `run`: The run number.
    /// * `treatment`: The run treatment.
    /// * `generation`: The generation number.
    ///
    /// returns: `Result<Option<ParetoFront>, QError>`. This is `None` when the run did not export
    /// any front for the generation.
    fn pareto_front(
        &self,
        run: usize,
        treatment: &Treatment,
        generation: usize,
    ) -> Result<Option<ParetoFront>, QError>;

    /// Get the worst-case QoS metrics of a run at a generation.
    ///
    /// # Arguments
    ///
    /// * `run`: The run number.
    /// * `treatment`: The run treatment.
    /// * `generation`: The generation number.
    ///
    /// returns: `Result<Option<Vec<QosRecord>>, QError>`. This is `None` when the run did not
    /// export any metric for the generation.
    fn qos_metrics(
        &self,
        run: usize,
        treatment: &Treatment,
        generation: usize,
    ) -> Result<Option<Vec<QosRecord>>, QError>;

    /// Get the rows of the results summary of a run at a generation.
    ///
    /// # Arguments
    ///
    /// * `run`: The run number.
    /// * `treatment`: The run treatment.
    /// * `generation`: The generation number.
    ///
    /// returns: `Result<Vec<GenerationRecord>, QError>`
    fn generation_summary(
        &self,
        run: usize,
        treatment: &Treatment,
        generation: usize,
    ) -> Result<Vec<GenerationRecord>, QError>;
}

/// Read the results from the folder tree written by the experiment runner:
///
/// ```text
/// <root>/<run>/<model>/<function>/<algorithm>/
///     Results/<generation>.csv              (comma-separated, with Spacing and ExecutionTime)
///     Pareto/Generation<generation>/*       (comma-separated, with ResponseTime, NetworkLatency
///                                            and Energy)
///     QoSMetrics/Generation<generation>/*   (tab-separated, with Delay2, Energy and
///                                            Success_Ratio)
/// ```
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Create the source.
    ///
    /// # Arguments
    ///
    /// * `root`: The folder containing one sub-folder per run.
    ///
    /// returns: `Result<DirectorySource, QError>`
    pub fn new(root: &Path) -> Result<Self, QError> {
        if !root.is_dir() {
            return Err(QError::Source(format!(
                "The results folder {} does not exist",
                root.display()
            )));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// The folder with the data of a run.
    ///
    /// # Arguments
    ///
    /// * `run`: The run number.
    /// * `treatment`: The run treatment.
    ///
    /// returns: `PathBuf`
    pub fn run_folder(&self, run: usize, treatment: &Treatment) -> PathBuf {
        self.root
            .join(run.to_string())
            .join(&treatment.model)
            .join(&treatment.function)
            .join(&treatment.algorithm)
    }

    /// List the files in a folder sorted by name.
    fn list_files(folder: &Path) -> Result<Vec<PathBuf>, QError> {
        let entries = fs::read_dir(folder).map_err(|e| {
            QError::Source(format!("Cannot read the folder {}: {}", folder.display(), e))
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| QError::Source(format!("Cannot read {}: {}", folder.display(), e)))?
                .path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Deserialise all the rows of a delimited file with a header.
    fn read_records<T: DeserializeOwned>(file: &Path, delimiter: u8) -> Result<Vec<T>, QError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(file)
            .map_err(|e| QError::Source(format!("Cannot open {}: {}", file.display(), e)))?;

        reader
            .deserialize()
            .map(|row| {
                row.map_err(|e| QError::Source(format!("Cannot parse {}: {}", file.display(), e)))
            })
            .collect()
    }
}

impl ResultSource for DirectorySource {
    fn final_generation(&self, run: usize, treatment: &Treatment) -> Result<usize, QError> {
        let folder = self.run_folder(run, treatment).join("Results");
        if !folder.is_dir() {
            warn!(
                "The results folder {} does not exist. The final generation is set to 0",
                folder.display()
            );
            return Ok(0);
        }

        let generation = Self::list_files(&folder)?
            .iter()
            .filter_map(|f| f.file_stem()?.to_str()?.parse::<usize>().ok())
            .max()
            .unwrap_or(0);
        debug!("Run #{run} of {:?} reached generation #{generation}", treatment);
        Ok(generation)
    }

    fn pareto_front(
        &self,
        run: usize,
        treatment: &Treatment,
        generation: usize,
    ) -> Result<Option<ParetoFront>, QError> {
        let folder = self
            .run_folder(run, treatment)
            .join("Pareto")
            .join(format!("Generation{generation}"));
        if !folder.is_dir() {
            return Ok(None);
        }

        let files = Self::list_files(&folder)?;
        let mut solutions = Vec::new();
        for file in &files {
            solutions.extend(Self::read_records::<Solution>(file, b',')?);
        }
        Ok(Some(ParetoFront::new(solutions, files.len())))
    }

    fn qos_metrics(
        &self,
        run: usize,
        treatment: &Treatment,
        generation: usize,
    ) -> Result<Option<Vec<QosRecord>>, QError> {
        let folder = self
            .run_folder(run, treatment)
            .join("QoSMetrics")
            .join(format!("Generation{generation}"));
        if !folder.is_dir() {
            return Ok(None);
        }

        let mut records = Vec::new();
        for file in Self::list_files(&folder)? {
            if file.file_name().and_then(|n| n.to_str()) == Some(POPULATION_FILE) {
                continue;
            }
            records.extend(Self::read_records::<QosRecord>(&file, b'\t')?);
        }
        Ok(Some(records))
    }

    fn generation_summary(
        &self,
        run: usize,
        treatment: &Treatment,
        generation: usize,
    ) -> Result<Vec<GenerationRecord>, QError> {
        let file = self
            .run_folder(run, treatment)
            .join("Results")
            .join(format!("{generation}.csv"));
        Self::read_records(&file, b',')
    }
}
