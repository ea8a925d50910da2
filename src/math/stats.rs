//! Descriptive statistics over a collection of values (for example, GC-content across sequences).

use std::fmt;
use crate::{
    Error,
    ext::vec::{VecExt, F64Ext},
    scan::ser::{JsonSer, get_f64, get_usize},
};

/// Summary of a non-empty collection of values.
/// Standard deviation is calculated for the population (divided by N, not N-1).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DescriptiveStats {
    mean: f64,
    median: f64,
    std_dev: f64,
    min: f64,
    max: f64,
    count: usize,
}

impl DescriptiveStats {
    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn median(&self) -> f64 {
        self.median
    }

    /// Population standard deviation.
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl fmt::Display for DescriptiveStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "n = {}, mean {:.2} ± {:.2}, median {:.2}, range [{:.2}, {:.2}]",
            self.count, self.mean, self.std_dev, self.median, self.min, self.max)
    }
}

impl JsonSer for DescriptiveStats {
    fn save(&self) -> json::JsonValue {
        json::object!{
            count: self.count,
            mean: self.mean,
            median: self.median,
            std_dev: self.std_dev,
            min: self.min,
            max: self.max,
        }
    }

    fn load(obj: &json::JsonValue) -> Result<Self, Error> {
        Ok(Self {
            count: get_usize(obj, "count")?,
            mean: get_f64(obj, "mean")?,
            median: get_f64(obj, "median")?,
            std_dev: get_f64(obj, "std_dev")?,
            min: get_f64(obj, "min")?,
            max: get_f64(obj, "max")?,
        })
    }
}

/// Calculates descriptive statistics.
/// Returns None if there are no values.
pub fn describe(values: &[f64]) -> Option<DescriptiveStats> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    VecExt::sort(&mut sorted);
    let mean = F64Ext::mean(values);
    Some(DescriptiveStats {
        mean,
        median: F64Ext::median_sorted(&sorted),
        std_dev: F64Ext::population_variance(values, mean).sqrt(),
        min: F64Ext::min(values),
        max: F64Ext::max(values),
        count: values.len(),
    })
}
