pub mod fastx;
pub mod windows;
pub mod cpg;

pub use windows::sliding_window;
pub use cpg::{CpGIsland, detect_islands};

/// Returns true for G and C nucleotides (in any case).
#[inline]
pub fn is_gc(nt: u8) -> bool {
    matches!(nt, b'C' | b'G' | b'c' | b'g')
}

/// Count the number of C,G nucleotides in the sequence (case-insensitive).
pub fn gc_count(seq: &[u8]) -> u64 {
    seq.iter().fold(0_u64, |acc, &nt| acc + u64::from(is_gc(nt)))
}

/// Calculate GC-content (between 0 and 100).
/// All symbols other than G/C count towards the length; empty sequence has GC-content 0.
pub fn gc_percentage(seq: &[u8]) -> f64 {
    if seq.is_empty() {
        0.0
    } else {
        100.0 * gc_count(seq) as f64 / seq.len() as f64
    }
}

/// Sequence with its name.
#[derive(Clone, Debug)]
pub struct NamedSeq {
    name: String,
    seq: Vec<u8>,
}

impl NamedSeq {
    /// Constructs new named sequence.
    pub fn new(name: String, seq: Vec<u8>) -> Self {
        Self { name, seq }
    }

    /// Returns reference to the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replaces sequence name.
    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Returns reference to the sequence.
    pub fn seq(&self) -> &[u8] {
        &self.seq
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }
}
