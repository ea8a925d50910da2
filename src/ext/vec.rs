/// Static methods extending slices.
pub struct VecExt;

impl VecExt {
    /// Sort vector/slice using `partial_ord`.
    pub fn sort<T: PartialOrd>(a: &mut [T]) {
        a.sort_unstable_by(|x, y| x.partial_cmp(y).expect("Error in sort: elements are not comparable"));
    }
}

/// Static methods related to vectors over f64.
pub struct F64Ext;

impl F64Ext {
    /// Calculate mean.
    pub fn mean(a: &[f64]) -> f64 {
        a.iter().sum::<f64>() / a.len() as f64
    }

    /// Returns population variance (sum of squared deviations divided by N) for already calculated mean.
    pub fn population_variance(a: &[f64], mean: f64) -> f64 {
        let n = a.len();
        assert!(n > 0, "Cannot calculate variance of an empty array!");
        a.iter().fold(0.0, |acc, x| {
            let diff = x - mean;
            acc + diff * diff
        }) / n as f64
    }

    /// Returns minimal vector value.
    pub fn min(a: &[f64]) -> f64 {
        a.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Returns maximal vector value.
    pub fn max(a: &[f64]) -> f64 {
        a.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Finds median in a sorted array: middle element for odd length, average of two middle elements otherwise.
    pub fn median_sorted(a: &[f64]) -> f64 {
        let n = a.len();
        assert!(n > 0, "Cannot find median of an empty array!");
        if n % 2 == 1 {
            a[n / 2]
        } else {
            0.5 * (a[n / 2 - 1] + a[n / 2])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_floats() {
        let mut a = [3.0, -1.0, 2.5, 0.0];
        VecExt::sort(&mut a);
        assert_eq!(a, [-1.0, 0.0, 2.5, 3.0]);
    }

    #[test]
    fn median() {
        assert_eq!(F64Ext::median_sorted(&[1.0, 2.0, 10.0]), 2.0);
        assert_eq!(F64Ext::median_sorted(&[1.0, 2.0, 4.0, 10.0]), 3.0);
        assert_eq!(F64Ext::median_sorted(&[7.0]), 7.0);
    }

    #[test]
    fn moments() {
        let a = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let mean = F64Ext::mean(&a);
        assert_eq!(mean, 5.0);
        assert_eq!(F64Ext::population_variance(&a, mean), 4.0);
        assert_eq!(F64Ext::min(&a), 2.0);
        assert_eq!(F64Ext::max(&a), 9.0);
    }
}
