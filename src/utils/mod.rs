pub use pareto::{pareto_frontier_2d, pareto_frontier_nd};
pub use statistics::{
    mean_and_std, mean_std, percentile, DescriptiveStatistics, MeanStd, AGGREGATION_DIGITS,
};
pub use vectors::{argsort, euclidean_distance, round_to, vector_max, vector_min, Sort};

mod pareto;
mod statistics;
mod vectors;
