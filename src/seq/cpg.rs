//! Detection of CpG islands using seed-and-expand heuristic.
//!
//! Seeds of length `SEED_LEN` are tested every `SEED_STRIDE` bp. A seed with high enough GC-content and
//! CpG observed/expected ratio is expanded through the adjacent runs of G/C nucleotides,
//! trimmed to the outermost G/C nucleotides, and the final region is validated again.
//! After an island is found, scanning continues from its end, so that islands never overlap.

use std::fmt;
use crate::err::{Error, validate_param};
use super::is_gc;

/// Seed length.
pub const SEED_LEN: usize = 50;
/// Distance between consecutive seeds.
pub const SEED_STRIDE: usize = 10;

/// CpG island detection parameters.
#[derive(Clone, Debug)]
pub struct Params {
    /// Minimal island length. Default: 200.
    pub min_len: u32,
    /// Minimal GC-content (0-100). Default: 50.
    pub min_gc: f64,
    /// Minimal CpG observed/expected ratio. Default: 0.6.
    pub min_oe: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            min_len: 200,
            min_gc: 50.0,
            min_oe: 0.6,
        }
    }
}

impl Params {
    /// Validate all parameter values.
    pub fn validate(&self) -> Result<(), Error> {
        validate_param!(self.min_len > 0, "Minimal CpG island length must be positive");
        validate_param!(0.0 <= self.min_gc && self.min_gc <= 100.0,
            "Minimal GC-content ({}) must be within [0, 100]", self.min_gc);
        validate_param!(self.min_oe >= 0.0 && self.min_oe.is_finite(),
            "Minimal CpG observed/expected ratio ({}) must be non-negative", self.min_oe);
        if (self.min_len as usize) < SEED_LEN {
            log::warn!("Minimal CpG island length ({}) is smaller than the seed length ({}), \
                short regions will not be found", self.min_len, SEED_LEN);
        }
        Ok(())
    }
}

/// Nucleotide composition of a sequence region.
struct Composition {
    len: u64,
    g: u64,
    c: u64,
    /// Number of CG dinucleotides.
    cg: u64,
}

impl Composition {
    fn new(seq: &[u8]) -> Self {
        let mut g = 0;
        let mut c = 0;
        let mut cg = 0;
        let mut prev_c = false;
        for &nt in seq {
            match nt {
                b'G' | b'g' => {
                    g += 1;
                    cg += u64::from(prev_c);
                    prev_c = false;
                }
                b'C' | b'c' => {
                    c += 1;
                    prev_c = true;
                }
                _ => prev_c = false,
            }
        }
        Self { len: seq.len() as u64, g, c, cg }
    }

    /// GC-content between 0 and 100.
    fn gc_percent(&self) -> f64 {
        if self.len == 0 {
            0.0
        } else {
            100.0 * (self.g + self.c) as f64 / self.len as f64
        }
    }

    /// CpG observed/expected ratio: `#CG * len / (#C * #G)`. Zero if there are no C or no G.
    fn oe_ratio(&self) -> f64 {
        if self.c == 0 || self.g == 0 {
            0.0
        } else {
            (self.cg * self.len) as f64 / (self.c * self.g) as f64
        }
    }
}

/// Longest sequence, for which island coordinates fit into `u32`.
pub const MAX_SEQ_LEN: usize = u32::MAX as usize;

/// Detected CpG island. Coordinates are 0-based, end is exclusive.
/// Sequences must not be longer than `MAX_SEQ_LEN`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CpGIsland {
    start: u32,
    end: u32,
    gc_percent: f64,
    oe_ratio: f64,
}

impl CpGIsland {
    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// GC-content of the island (0-100).
    pub fn gc_percent(&self) -> f64 {
        self.gc_percent
    }

    /// CpG observed/expected ratio.
    pub fn oe_ratio(&self) -> f64 {
        self.oe_ratio
    }
}

impl fmt::Display for CpGIsland {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}:{}] GC: {:.1}%, Obs/Exp: {:.2}", self.start, self.end, self.gc_percent, self.oe_ratio)
    }
}

/// Stages of a single seed extension.
#[derive(Debug)]
enum State {
    /// Check seed `[pos, pos + SEED_LEN)`.
    Seeding,
    /// Extend boundaries through adjacent G/C nucleotides.
    Expanding { start: usize, end: usize },
    /// Trim boundaries to the outermost G/C nucleotides.
    Trimming { start: usize, end: usize },
    /// Check final region.
    Validating { start: usize, end: usize },
}

/// Tries to find a CpG island from the seed, starting at `pos`.
/// Left boundary never extends below `floor` (end of the previous island).
fn try_seed(seq: &[u8], pos: usize, floor: usize, params: &Params) -> Option<CpGIsland> {
    let mut state = State::Seeding;
    loop {
        state = match state {
            State::Seeding => {
                let end = pos + SEED_LEN;
                let comp = Composition::new(&seq[pos..end]);
                if comp.gc_percent() < params.min_gc || comp.oe_ratio() < params.min_oe {
                    return None;
                }
                State::Expanding { start: pos, end }
            }
            State::Expanding { mut start, mut end } => {
                while start > floor && is_gc(seq[start - 1]) {
                    start -= 1;
                }
                while end < seq.len() && is_gc(seq[end]) {
                    end += 1;
                }
                State::Trimming { start, end }
            }
            State::Trimming { start, end } => {
                let region = &seq[start..end];
                let first = region.iter().position(|&nt| is_gc(nt))?;
                let last = region.iter().rposition(|&nt| is_gc(nt))?;
                State::Validating { start: start + first, end: start + last + 1 }
            }
            State::Validating { start, end } => {
                if end - start < params.min_len as usize {
                    return None;
                }
                let comp = Composition::new(&seq[start..end]);
                let gc_percent = comp.gc_percent();
                let oe_ratio = comp.oe_ratio();
                return if gc_percent >= params.min_gc && oe_ratio >= params.min_oe {
                    debug_assert!(end <= MAX_SEQ_LEN, "CpG island end ({}) does not fit into u32", end);
                    Some(CpGIsland {
                        start: start as u32,
                        end: end as u32,
                        gc_percent, oe_ratio,
                    })
                } else {
                    None
                };
            }
        };
    }
}

/// Finds CpG islands in the sequence (case-insensitive).
/// Returns non-overlapping islands, sorted by their start.
/// Sequences shorter than the seed produce no islands.
pub fn detect_islands(seq: &[u8], params: &Params) -> Vec<CpGIsland> {
    let mut islands = Vec::new();
    let n = seq.len();
    let mut floor = 0;
    let mut i = 0;
    while i + SEED_LEN <= n {
        match try_seed(seq, i, floor, params) {
            Some(island) => {
                floor = island.end as usize;
                i = floor;
                islands.push(island);
            }
            None => i += SEED_STRIDE,
        }
    }
    islands
}
