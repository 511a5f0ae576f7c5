use std::env;
use std::error::Error;
use std::path::PathBuf;

use log::LevelFilter;

use qosmoea::assessment::{
    AssessmentExport, DirectorySource, Experiment, ExperimentConfig, FixedRole,
};

/// Compare the algorithms of an experiment on the quality indicators of the final Pareto fronts
/// and on the QoS values of their solutions. The fitness function is fixed.
///
/// The first argument is the folder with the run results (one sub-folder per run) and the
/// optional second argument is the configuration file (`demos/config.json` by default):
///
/// `cargo run --example compare_moeas --release -- /path/to/results`
fn main() -> Result<(), Box<dyn Error>> {
    // Add log
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let mut args = env::args().skip(1);
    let results = PathBuf::from(args.next().ok_or("The results folder is required")?);
    let config_file = args
        .next()
        .map(PathBuf::from)
        .unwrap_or(PathBuf::from("demos").join("config.json"));

    let config = ExperimentConfig::from_file(&config_file)?;
    let fixed = FixedRole::Function(config.objective_functions[0].clone());
    let algorithms: Vec<String> = config.algorithms.clone();
    let algorithms: Vec<&str> = algorithms.iter().map(|a| a.as_str()).collect();

    let source = DirectorySource::new(&results)?;
    let experiment = Experiment::initialise(config, source)?;
    println!("Reference point: {:?}", experiment.reference().reference_point);
    println!("Utopia point: {:?}", experiment.reference().utopia_point);

    for summary in experiment.compare(&fixed, &algorithms)? {
        println!(
            "{:<12} HV = {} ± {}   GD = {} ± {}   Spacing = {} ± {}   Cardinality = {} ± {}",
            summary.name,
            summary.hypervolume.mean,
            summary.hypervolume.std,
            summary.generational_distance.mean,
            summary.generational_distance.std,
            summary.spacing.mean,
            summary.spacing.std,
            summary.cardinality.mean,
            summary.cardinality.std,
        );
    }

    for stats in experiment.qos_statistics(&fixed, &algorithms)? {
        println!("{} ({} solutions)", stats.name, stats.solutions);
        println!("  Response time: {:?}", stats.response_time.to_array());
        println!("  Success ratio: {:?}", stats.success_ratio.to_array());
        println!("  Network latency: {:?}", stats.network_latency.to_array());
    }

    // Export all the assessments
    let export = AssessmentExport::new(&experiment, &fixed, &algorithms)?;
    export.save_to_json(&results.join("assessment.json"))?;

    Ok(())
}
