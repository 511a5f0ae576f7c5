use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;

use crate::assessment::{
    ApproachSummary, ExecutionTime, Experiment, ExperimentConfig, FixedRole, QosStatistics,
    ReferenceData, RelativePerformance, ResultSource, TreatmentEvolution,
};
use crate::core::QError;

/// The data of an assessment to export to a JSON file.
#[derive(Serialize, Debug)]
pub struct AssessmentExport {
    pub config: ExperimentConfig,
    pub reference: ReferenceData,
    /// The comparison of the approaches on the indicators of the final fronts.
    pub comparison: Vec<ApproachSummary>,
    /// The QoS statistics of the approaches. Approaches without any solution above the success
    /// ratio threshold are not included.
    pub qos_statistics: Vec<QosStatistics>,
    pub execution_times: Vec<ExecutionTime>,
    /// The performance of the approaches relative to the first one. This is empty when there is
    /// only one approach or when the baseline has a zero hyper-volume or execution time.
    pub relative_performance: Vec<RelativePerformance>,
    pub evolutions: Vec<TreatmentEvolution>,
    pub exported_on: DateTime<Utc>,
}

impl AssessmentExport {
    /// Run all the assessments of an experiment. The first variable is the baseline of the
    /// relative performance.
    ///
    /// # Arguments
    ///
    /// * `experiment`: The experiment.
    /// * `fixed`: The fixed part of the treatment.
    /// * `variables`: The names of the algorithms or functions to compare.
    ///
    /// returns: `Result<AssessmentExport, QError>`
    pub fn new<S: ResultSource>(
        experiment: &Experiment<S>,
        fixed: &FixedRole,
        variables: &[&str],
    ) -> Result<Self, QError> {
        let comparison = experiment.compare(fixed, variables)?;
        let execution_times = comparison
            .iter()
            .map(|summary| experiment.execution_time(&summary.treatment))
            .collect::<Result<Vec<ExecutionTime>, QError>>()?;

        let mut qos_statistics = Vec::with_capacity(variables.len());
        for name in variables {
            match experiment.qos_statistics(fixed, &[*name]) {
                Ok(statistics) => qos_statistics.extend(statistics),
                Err(QError::EmptyFront(_)) => {
                    warn!("{name} has no solutions above the success ratio threshold")
                }
                Err(e) => return Err(e),
            }
        }

        let relative_performance = match variables.split_first() {
            Some((baseline, others)) if !others.is_empty() => {
                match experiment.relative_performance(fixed, baseline, others) {
                    Ok(performance) => performance,
                    Err(QError::Metric(metric, e)) => {
                        warn!("The {metric} relative to {baseline} is not available: {e}");
                        Vec::new()
                    }
                    Err(e) => return Err(e),
                }
            }
            _ => Vec::new(),
        };

        Ok(Self {
            config: experiment.config().clone(),
            reference: experiment.reference().clone(),
            comparison,
            qos_statistics,
            execution_times,
            relative_performance,
            evolutions: experiment.evolve()?,
            exported_on: Utc::now(),
        })
    }

    /// Save the assessment to a JSON file. This returns an error if the file cannot be saved.
    ///
    /// # Arguments
    ///
    /// * `file`: The path to the JSON file.
    ///
    /// returns: `Result<(), QError>`
    pub fn save_to_json(&self, file: &Path) -> Result<(), QError> {
        let data = serde_json::to_string_pretty(self).map_err(|e| {
            QError::Export(format!(
                "The following error occurred while converting the assessment: {e}"
            ))
        })?;

        info!("Saving JSON file {:?}", file);
        fs::write(file, data).map_err(|e| {
            QError::Export(format!(
                "The following error occurred while exporting the assessment JSON file: {e}",
            ))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::assessment::{
        AssessmentExport, Experiment, ExperimentConfig, FixedRole, ReferenceData, Treatment,
    };
    use crate::core::test_utils::MemorySource;
    use crate::core::Solution;

    #[test]
    fn test_save_to_json() {
        let t = Treatment::new("Decentralised", "ExpensiveFunction", "NSGAIInew");
        let mut source = MemorySource::default();
        source.set_final_generation(1, &t, 1);
        source.add_front(1, &t, 1, vec![Solution::new(1.0, 1.0, 1.0)], 1);
        source.add_summary(1, &t, 1, &[(0.5, 2000.0)]);

        let config =
            ExperimentConfig::new(1..=1, "Decentralised", &["ExpensiveFunction"], &["NSGAIInew"])
                .unwrap();
        let reference =
            ReferenceData::new(vec![2.0; 3], vec![0.0; 3], vec![vec![0.5; 3]]).unwrap();
        let experiment = Experiment::with_reference(config, source, reference).unwrap();
        let export = AssessmentExport::new(
            &experiment,
            &FixedRole::Function("ExpensiveFunction".to_string()),
            &["NSGAIInew"],
        )
        .unwrap();
        assert_eq!(export.execution_times[0].mean, 2.0);

        let folder = tempfile::tempdir().unwrap();
        let file = folder.path().join("assessment.json");
        export.save_to_json(&file).unwrap();

        let data: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&file).unwrap()).unwrap();
        assert_eq!(data["comparison"][0]["name"], "NSGAIInew");
        assert_eq!(data["comparison"][0]["hypervolume"]["mean"], 0.125);
        assert_eq!(data["reference"]["reference_point"][0], 2.0);
        assert_eq!(data["evolutions"][0]["evolution"]["generations"], 1);
        assert!(data["exported_on"].is_string());
    }

    #[test]
    fn test_save_to_missing_folder() {
        let config =
            ExperimentConfig::new(1..=1, "Decentralised", &["ExpensiveFunction"], &["NSGAIInew"])
                .unwrap();
        let reference = ReferenceData::new(vec![2.0; 3], vec![0.0; 3], vec![]).unwrap();
        let export = AssessmentExport {
            config,
            reference,
            comparison: vec![],
            qos_statistics: vec![],
            execution_times: vec![],
            relative_performance: vec![],
            evolutions: vec![],
            exported_on: chrono::Utc::now(),
        };
        let folder = tempfile::tempdir().unwrap();
        assert!(export
            .save_to_json(&folder.path().join("missing").join("assessment.json"))
            .unwrap_err()
            .to_string()
            .contains("exporting the assessment JSON file"));
    }

    /// An approach without solutions above the threshold does not stop the export.
    #[test]
    fn test_export_with_filtered_approach() {
        let a1 = Treatment::new("Decentralised", "ExpensiveFunction", "A1");
        let a2 = Treatment::new("Decentralised", "ExpensiveFunction", "A2");
        let mut source = MemorySource::default();
        source.set_final_generation(1, &a1, 1);
        source.add_front(1, &a1, 1, vec![Solution::new(1.0, 1.0, 1.0)], 1);
        source.add_summary(1, &a1, 1, &[(0.5, 4000.0)]);
        // success ratio of 50 %
        source.set_final_generation(1, &a2, 1);
        source.add_front(1, &a2, 1, vec![Solution::new(1.0, 1.0, 50.0)], 1);
        source.add_summary(1, &a2, 1, &[(0.5, 2000.0)]);

        let mut config =
            ExperimentConfig::new(1..=1, "Decentralised", &["ExpensiveFunction"], &["A1", "A2"])
                .unwrap();
        config.thresholds.success_ratio = 90.0;
        let reference =
            ReferenceData::new(vec![2.0; 3], vec![0.0; 3], vec![vec![0.5; 3]]).unwrap();
        let experiment = Experiment::with_reference(config, source, reference).unwrap();
        let export = AssessmentExport::new(
            &experiment,
            &FixedRole::Function("ExpensiveFunction".to_string()),
            &["A1", "A2"],
        )
        .unwrap();

        assert_eq!(export.comparison.len(), 2);
        assert_eq!(export.qos_statistics.len(), 1);
        assert_eq!(export.qos_statistics[0].name, "A1");
        assert_eq!(export.evolutions.len(), 2);

        // A2 front is outside the reference corner
        assert_eq!(export.relative_performance.len(), 1);
        assert_eq!(export.relative_performance[0].name, "A2");
        assert_eq!(export.relative_performance[0].quality_degradation, 0.0);
        assert_eq!(export.relative_performance[0].speed_up, 2.0);
    }
}
