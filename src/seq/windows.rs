//! GC-content across fixed-size sliding windows.

use crate::{Error, err::validate_param};
use super::is_gc;

/// Cumulative G/C counts: `pref[i]` = number of G/C nucleotides in `seq[..i]`, `pref.len() == seq.len() + 1`.
fn gc_prefix_sums(seq: &[u8]) -> Vec<u64> {
    let mut pref = Vec::with_capacity(seq.len() + 1);
    let mut c = 0;
    pref.push(c);
    for &nt in seq {
        c += u64::from(is_gc(nt));
        pref.push(c);
    }
    pref
}

/// Number of windows of size `window_size` with step `step` that fit into a sequence of length `seq_len`.
/// Trailing remainder, shorter than the window, is not counted.
pub fn count_windows(seq_len: usize, window_size: usize, step: usize) -> usize {
    if seq_len < window_size {
        0
    } else {
        (seq_len - window_size) / step + 1
    }
}

/// Calculates GC-content (0-100) across windows `[i * step, i * step + window_size)`.
/// Only complete windows are produced, trailing remainder is dropped.
/// Returns an empty vector if the window is longer than the sequence.
///
/// Window size and step must be positive.
pub fn sliding_window(seq: &[u8], window_size: usize, step: usize) -> Result<Vec<f64>, Error> {
    validate_param!(window_size > 0, "Window size must be positive");
    validate_param!(step > 0, "Window step must be positive");
    let n_windows = count_windows(seq.len(), window_size, step);
    if n_windows == 0 {
        log::trace!("Sequence of length {} is shorter than the window ({})", seq.len(), window_size);
        return Ok(Vec::new());
    }

    let pref = gc_prefix_sums(seq);
    let size = window_size as f64;
    Ok((0..n_windows)
        .map(|i| {
            let start = i * step;
            100.0 * (pref[start + window_size] - pref[start]) as f64 / size
        })
        .collect())
}
