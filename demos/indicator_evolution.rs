use std::env;
use std::error::Error;
use std::path::PathBuf;

use log::LevelFilter;

use qosmoea::assessment::{DirectorySource, Experiment, ExperimentConfig};

/// Print how the mean hyper-volume and generational distance of the fronts change over the
/// generations, for each algorithm and fitness function in the configuration.
///
/// `cargo run --example indicator_evolution --release -- /path/to/results demos/config.json`
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let mut args = env::args().skip(1);
    let results = PathBuf::from(args.next().ok_or("The results folder is required")?);
    let config_file = args
        .next()
        .map(PathBuf::from)
        .unwrap_or(PathBuf::from("demos").join("config.json"));

    let config = ExperimentConfig::from_file(&config_file)?;
    let source = DirectorySource::new(&results)?;
    let experiment = Experiment::initialise(config, source)?;

    for item in experiment.evolve()? {
        println!(
            "{} with {} ({} generations)",
            item.treatment.algorithm, item.treatment.function, item.evolution.generations
        );
        let hv = &item.evolution.hypervolume;
        let gd = &item.evolution.generational_distance;
        for generation in 0..item.evolution.generations {
            println!(
                "  #{:<4} HV = {:.4} ± {:.4}   GD = {:.4} ± {:.4}",
                generation + 1,
                hv.mean[generation],
                hv.std[generation],
                gd.mean[generation],
                gd.std[generation]
            );
        }
    }

    Ok(())
}
