pub mod stats;

pub use stats::{DescriptiveStats, describe};
