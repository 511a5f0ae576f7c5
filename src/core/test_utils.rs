use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use float_cmp::{approx_eq, F64Margin};

use crate::assessment::{ResultSource, Treatment};
use crate::core::{GenerationRecord, ParetoFront, QError, QosRecord, Solution};

/// Compare two arrays of f64
pub(crate) fn assert_approx_array_eq(calculated_values: &[f64], expected_values: &[f64]) {
    assert_eq!(
        calculated_values.len(),
        expected_values.len(),
        "the arrays have a different size"
    );
    let margins = F64Margin {
        epsilon: 1e-9,
        ulps: 4,
    };
    for (i, (calculated, expected)) in calculated_values.iter().zip(expected_values).enumerate() {
        if !approx_eq!(f64, *calculated, *expected, margins) {
            panic!(
                r#"assertion failed on item #{i:?}
                    actual: `{calculated:?}`,
                    expected: `{expected:?}`"#,
            )
        }
    }
}

type RunKey = (usize, Treatment);
type GenerationKey = (usize, Treatment, usize);

/// Results kept in memory. Runs without a final generation report generation `0`.
#[derive(Default)]
pub(crate) struct MemorySource {
    final_generations: HashMap<RunKey, usize>,
    fronts: HashMap<GenerationKey, ParetoFront>,
    qos: HashMap<GenerationKey, Vec<QosRecord>>,
    summaries: HashMap<GenerationKey, Vec<GenerationRecord>>,
}

impl MemorySource {
    pub(crate) fn set_final_generation(&mut self, run: usize, treatment: &Treatment, value: usize) {
        self.final_generations
            .insert((run, treatment.clone()), value);
    }

    pub(crate) fn add_front(
        &mut self,
        run: usize,
        treatment: &Treatment,
        generation: usize,
        solutions: Vec<Solution>,
        files: usize,
    ) {
        self.fronts.insert(
            (run, treatment.clone(), generation),
            ParetoFront::new(solutions, files),
        );
    }

    pub(crate) fn add_qos(
        &mut self,
        run: usize,
        treatment: &Treatment,
        generation: usize,
        records: Vec<QosRecord>,
    ) {
        self.qos
            .insert((run, treatment.clone(), generation), records);
    }

    /// Add a summary with the given `(spacing, execution_time)` rows.
    pub(crate) fn add_summary(
        &mut self,
        run: usize,
        treatment: &Treatment,
        generation: usize,
        rows: &[(f64, f64)],
    ) {
        let records = rows
            .iter()
            .map(|(spacing, execution_time)| GenerationRecord {
                spacing: Some(*spacing),
                execution_time: Some(*execution_time),
            })
            .collect();
        self.summaries
            .insert((run, treatment.clone(), generation), records);
    }
}

impl ResultSource for MemorySource {
    fn final_generation(&self, run: usize, treatment: &Treatment) -> Result<usize, QError> {
        Ok(self
            .final_generations
            .get(&(run, treatment.clone()))
            .copied()
            .unwrap_or(0))
    }

    fn pareto_front(
        &self,
        run: usize,
        treatment: &Treatment,
        generation: usize,
    ) -> Result<Option<ParetoFront>, QError> {
        Ok(self
            .fronts
            .get(&(run, treatment.clone(), generation))
            .cloned())
    }

    fn qos_metrics(
        &self,
        run: usize,
        treatment: &Treatment,
        generation: usize,
    ) -> Result<Option<Vec<QosRecord>>, QError> {
        Ok(self.qos.get(&(run, treatment.clone(), generation)).cloned())
    }

    fn generation_summary(
        &self,
        run: usize,
        treatment: &Treatment,
        generation: usize,
    ) -> Result<Vec<GenerationRecord>, QError> {
        self.summaries
            .get(&(run, treatment.clone(), generation))
            .cloned()
            .ok_or(QError::Source(format!(
                "Cannot open the summary of run #{run} at generation #{generation}"
            )))
    }
}

fn generation_folder(
    root: &Path,
    run: usize,
    treatment: &Treatment,
    kind: &str,
    generation: usize,
) -> PathBuf {
    let folder = root
        .join(run.to_string())
        .join(&treatment.model)
        .join(&treatment.function)
        .join(&treatment.algorithm)
        .join(kind)
        .join(format!("Generation{generation}"));
    fs::create_dir_all(&folder).unwrap();
    folder
}

fn write_table(file: &Path, header: &str, delimiter: &str, rows: &[[f64; 3]]) {
    let mut content = format!("{header}\n");
    for row in rows {
        let values: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        content.push_str(&values.join(delimiter));
        content.push('\n');
    }
    fs::write(file, content).unwrap();
}

/// Write a Pareto front file with `(ResponseTime, NetworkLatency, Energy)` rows.
pub(crate) fn write_pareto_file(
    root: &Path,
    run: usize,
    treatment: &Treatment,
    generation: usize,
    file_name: &str,
    rows: &[[f64; 3]],
) {
    let folder = generation_folder(root, run, treatment, "Pareto", generation);
    write_table(
        &folder.join(file_name),
        "ResponseTime,NetworkLatency,Energy",
        ",",
        rows,
    );
}

/// Write a QoS metrics file with `(Delay2, Energy, Success_Ratio)` rows.
pub(crate) fn write_qos_file(
    root: &Path,
    run: usize,
    treatment: &Treatment,
    generation: usize,
    file_name: &str,
    rows: &[[f64; 3]],
) {
    let folder = generation_folder(root, run, treatment, "QoSMetrics", generation);
    write_table(
        &folder.join(file_name),
        "Delay2\tEnergy\tSuccess_Ratio",
        "\t",
        rows,
    );
}

/// Write the results summary of a generation with `(Spacing, ExecutionTime)` rows.
pub(crate) fn write_summary_file(
    root: &Path,
    run: usize,
    treatment: &Treatment,
    generation: usize,
    rows: &[(f64, f64)],
) {
    let folder = root
        .join(run.to_string())
        .join(&treatment.model)
        .join(&treatment.function)
        .join(&treatment.algorithm)
        .join("Results");
    fs::create_dir_all(&folder).unwrap();

    let mut content = "Generation,Spacing,ExecutionTime\n".to_string();
    for (spacing, execution_time) in rows {
        content.push_str(&format!("{generation},{spacing},{execution_time}\n"));
    }
    fs::write(folder.join(format!("{generation}.csv")), content).unwrap();
}
