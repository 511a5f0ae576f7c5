pub use distance::Distance;
pub use hypervolume::HyperVolume;

mod distance;
mod hypervolume;
