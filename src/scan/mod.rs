//! Per-sequence analysis: GC-content, sliding windows and CpG islands,
//! and its distribution across several threads.

pub mod ser;
pub mod out;

use std::{
    thread,
    sync::Arc,
    collections::HashSet,
    path::{Path, PathBuf},
};
use crate::{
    Error,
    err::{error, validate_param},
    seq::{self, NamedSeq, CpGIsland, cpg},
    math::{self, DescriptiveStats},
    ext::sys as sys_ext,
};
use ser::{JsonSer, get_f64, get_u32, get_opt_u32, get_bool, opt_to_json};

/// Analysis parameters.
#[derive(Clone, Debug)]
pub struct Params {
    /// Calculate GC-content across sliding windows of this size. Default: None (do not calculate).
    pub window_size: Option<u32>,
    /// Step between consecutive windows. Default: equal to the window size.
    pub step: Option<u32>,
    /// Search for CpG islands. Default: false.
    pub cpg: bool,
    pub islands: cpg::Params,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            window_size: None,
            step: None,
            cpg: false,
            islands: Default::default(),
        }
    }
}

impl Params {
    /// Validate all parameter values.
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(window_size) = self.window_size {
            validate_param!(window_size > 0, "Window size must be positive");
        }
        if let Some(step) = self.step {
            validate_param!(self.window_size.is_some(), "Window step ({}) is set without the window size", step);
            validate_param!(step > 0, "Window step must be positive");
        }
        if self.cpg {
            self.islands.validate()?;
        }
        Ok(())
    }

    /// Returns window size and step, if sliding windows need to be calculated.
    pub fn window_step(&self) -> Option<(usize, usize)> {
        self.window_size.map(|w| (w as usize, self.step.unwrap_or(w) as usize))
    }
}

impl JsonSer for cpg::Params {
    fn save(&self) -> json::JsonValue {
        json::object!{
            min_len: self.min_len,
            min_gc: self.min_gc,
            min_oe: self.min_oe,
        }
    }

    fn load(obj: &json::JsonValue) -> Result<Self, Error> {
        Ok(Self {
            min_len: get_u32(obj, "min_len")?,
            min_gc: get_f64(obj, "min_gc")?,
            min_oe: get_f64(obj, "min_oe")?,
        })
    }
}

impl JsonSer for Params {
    fn save(&self) -> json::JsonValue {
        json::object!{
            window_size: opt_to_json(self.window_size),
            step: opt_to_json(self.window_step().map(|(_, step)| step)),
            cpg: self.cpg,
            islands: self.islands.save(),
        }
    }

    fn load(obj: &json::JsonValue) -> Result<Self, Error> {
        Ok(Self {
            window_size: get_opt_u32(obj, "window_size")?,
            step: get_opt_u32(obj, "step")?,
            cpg: get_bool(obj, "cpg")?,
            islands: cpg::Params::load(&obj["islands"])?,
        })
    }
}

/// Analysis results for a single sequence.
#[derive(Clone, Debug)]
pub struct SeqAnalysis {
    name: String,
    len: usize,
    gc: f64,
    windows: Option<Vec<f64>>,
    islands: Option<Vec<CpGIsland>>,
}

impl SeqAnalysis {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sequence length.
    pub fn len(&self) -> usize {
        self.len
    }

    /// GC-content of the whole sequence (0-100).
    pub fn gc(&self) -> f64 {
        self.gc
    }

    /// GC-content across sliding windows, if calculated.
    pub fn windows(&self) -> Option<&[f64]> {
        self.windows.as_deref()
    }

    /// CpG islands, if calculated.
    pub fn islands(&self) -> Option<&[CpGIsland]> {
        self.islands.as_deref()
    }
}

/// Island coordinates are stored as u32, longer sequences cannot be searched for CpG islands.
fn check_island_coords(name: &str, len: usize) -> Result<(), Error> {
    if len > cpg::MAX_SEQ_LEN {
        Err(error!(InvalidData, "Sequence {} is too long ({} bp) to search for CpG islands, at most {} bp is allowed",
            name, len, cpg::MAX_SEQ_LEN))
    } else {
        Ok(())
    }
}

/// Analyzes one sequence. Does not modify any shared state, so it can be safely called from several threads.
pub fn analyze_seq(seq: &NamedSeq, params: &Params) -> Result<SeqAnalysis, Error> {
    let windows = match params.window_step() {
        Some((window_size, step)) => Some(seq::sliding_window(seq.seq(), window_size, step)?),
        None => None,
    };
    let islands = if params.cpg {
        check_island_coords(seq.name(), seq.len())?;
        Some(seq::detect_islands(seq.seq(), &params.islands))
    } else {
        None
    };
    Ok(SeqAnalysis {
        name: seq.name().to_owned(),
        len: seq.len(),
        gc: seq::gc_percentage(seq.seq()),
        windows, islands,
    })
}

/// Analyzes all sequences in `threads` threads. Output order matches the input order.
pub fn analyze_all(seqs: Vec<NamedSeq>, params: &Params, threads: u16) -> Result<Vec<SeqAnalysis>, Error> {
    let n_seqs = seqs.len();
    let threads = usize::from(threads.max(1)).min(n_seqs.max(1));
    if threads == 1 {
        return seqs.iter().map(|seq| analyze_seq(seq, params)).collect();
    }

    log::debug!("    Analyzing {} sequences in {} threads", n_seqs, threads);
    let seqs = Arc::new(seqs);
    let mut handles = Vec::with_capacity(threads);
    let mut start = 0;
    for worker_ix in 0..threads {
        let rem_workers = threads - worker_ix;
        let end = start + (n_seqs - start + rem_workers - 1) / rem_workers;
        assert!(start < end);
        // Closure with cloned data.
        {
            let seqs = Arc::clone(&seqs);
            let params = params.clone();
            handles.push(thread::spawn(move ||
                seqs[start..end].iter().map(|seq| analyze_seq(seq, &params)).collect::<Result<Vec<_>, Error>>()
            ));
        }
        start = end;
    }
    assert_eq!(start, n_seqs);

    let mut res = Vec::with_capacity(n_seqs);
    for handle in handles {
        let part = handle.join().map_err(|_| error!(RuntimeError, "Worker thread failed"))??;
        res.extend(part);
    }
    Ok(res)
}

/// Makes sequence names unique by appending `_2`, `_3`, ... to repeated names.
/// Returns the number of renamed sequences.
pub fn qualify_names(seqs: &mut [NamedSeq]) -> usize {
    let original: HashSet<String> = seqs.iter().map(|seq| seq.name().to_owned()).collect();
    let mut used = HashSet::with_capacity(seqs.len());
    let mut renamed = 0;
    for seq in seqs.iter_mut() {
        if used.insert(seq.name().to_owned()) {
            continue;
        }
        let new_name = (2..)
            .map(|i| format!("{}_{}", seq.name(), i))
            .find(|name| !original.contains(name) && !used.contains(name))
            .expect("Infinite iterator exhausted");
        log::warn!("    Sequence name {} appears several times, renaming to {}", seq.name(), new_name);
        used.insert(new_name.clone());
        seq.set_name(new_name);
        renamed += 1;
    }
    renamed
}

/// Analysis results for all sequences in one input file.
pub struct FileSummary {
    filename: PathBuf,
    stem: String,
    analyses: Vec<SeqAnalysis>,
    stats: Option<DescriptiveStats>,
}

impl FileSummary {
    /// Summarizes analyses, calculating GC-content statistics across all sequences.
    pub fn new(filename: &Path, analyses: Vec<SeqAnalysis>) -> Self {
        let gc_values: Vec<f64> = analyses.iter().map(SeqAnalysis::gc).collect();
        Self {
            filename: filename.to_owned(),
            stem: sys_ext::file_stem(filename),
            stats: math::describe(&gc_values),
            analyses,
        }
    }

    pub fn filename(&self) -> &Path {
        &self.filename
    }

    /// Filename without directories and extensions.
    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn analyses(&self) -> &[SeqAnalysis] {
        &self.analyses
    }

    /// GC-content statistics across sequences, None if the file contains no sequences.
    pub fn stats(&self) -> Option<&DescriptiveStats> {
        self.stats.as_ref()
    }

    /// Total number of CpG islands.
    pub fn n_islands(&self) -> usize {
        self.analyses.iter().map(|a| a.islands().map(<[_]>::len).unwrap_or(0)).sum()
    }

    /// Pairs (sequence id, GC-content). If `prefix` is true, sequence ids are prefixed with the file stem.
    pub fn gc_results(&self, prefix: bool) -> Vec<(String, f64)> {
        self.analyses.iter()
            .map(|a| {
                let id = if prefix { format!("{}:{}", self.stem, a.name()) } else { a.name().to_owned() };
                (id, a.gc())
            })
            .collect()
    }
}

/// Loads, analyzes and summarizes one FASTA file.
pub fn process_file(filename: &Path, params: &Params, threads: u16) -> Result<FileSummary, Error> {
    let mut seqs = seq::fastx::load_all(filename)?;
    let renamed = qualify_names(&mut seqs);
    if renamed > 0 {
        log::warn!("    Renamed {} sequences with repeated names", renamed);
    }
    let analyses = analyze_all(seqs, params, threads)?;
    Ok(FileSummary::new(filename, analyses))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str, seq: &str) -> NamedSeq {
        NamedSeq::new(name.to_owned(), seq.as_bytes().to_vec())
    }

    fn island_seq() -> String {
        format!("{}{}{}", "AT".repeat(200), "CG".repeat(200), "AT".repeat(200))
    }

    #[test]
    fn gc_only() {
        let res = analyze_seq(&named("s", "ATGC"), &Params::default()).unwrap();
        assert_eq!(res.name(), "s");
        assert_eq!(res.len(), 4);
        assert_eq!(res.gc(), 50.0);
        assert!(res.windows().is_none());
        assert!(res.islands().is_none());
    }

    #[test]
    fn windows_and_islands() {
        let params = Params { window_size: Some(4), cpg: true, ..Params::default() };
        let res = analyze_seq(&named("s", "ATGCATGCA"), &params).unwrap();
        assert_eq!(res.windows(), Some(&[50.0, 50.0][..]));
        assert_eq!(res.islands().map(<[_]>::len), Some(0));

        let params = Params { window_size: Some(4), step: Some(2), ..Params::default() };
        let res = analyze_seq(&named("s", "ATGCATGC"), &params).unwrap();
        assert_eq!(res.windows(), Some(&[50.0, 50.0, 50.0][..]));
    }

    #[test]
    fn parallel_matches_sequential() {
        let params = Params { window_size: Some(100), step: Some(50), cpg: true, ..Params::default() };
        let seqs: Vec<_> = (0..11)
            .map(|i| {
                let s = if i % 3 == 0 { island_seq() } else { "ACGTTA".repeat(10 + i * 7) };
                named(&format!("seq{}", i), &s)
            })
            .collect();
        let seq_res = analyze_all(seqs.clone(), &params, 1).unwrap();
        for threads in [2, 4, 16] {
            let par_res = analyze_all(seqs.clone(), &params, threads).unwrap();
            assert_eq!(par_res.len(), seq_res.len());
            for (a, b) in seq_res.iter().zip(&par_res) {
                assert_eq!(a.name(), b.name());
                assert_eq!(a.gc(), b.gc());
                assert_eq!(a.windows(), b.windows());
                assert_eq!(a.islands(), b.islands());
            }
        }
        assert_eq!(seq_res[0].islands().unwrap().len(), 1);
    }

    #[test]
    fn empty_input() {
        assert!(analyze_all(Vec::new(), &Params::default(), 4).unwrap().is_empty());
        let summary = FileSummary::new(Path::new("dir/empty.fa"), Vec::new());
        assert!(summary.stats().is_none());
        assert_eq!(summary.stem(), "empty");
        assert_eq!(summary.n_islands(), 0);
    }

    #[test]
    fn invalid_window_propagates() {
        let params = Params { window_size: Some(0), ..Params::default() };
        assert!(params.validate().is_err());
        assert!(analyze_seq(&named("s", "ACGT"), &params).is_err());
        assert!(analyze_all(vec![named("a", "AC"), named("b", "GT")], &params, 2).is_err());
    }

    #[test]
    fn island_coordinate_limit() {
        assert!(check_island_coords("s", 0).is_ok());
        assert!(check_island_coords("s", u32::MAX as usize).is_ok());
        assert!(matches!(check_island_coords("s", u32::MAX as usize + 1), Err(Error::InvalidData(_))));
    }

    #[test]
    fn params_validation() {
        assert!(Params::default().validate().is_ok());
        assert!(Params { step: Some(5), ..Params::default() }.validate().is_err());
        assert!(Params { window_size: Some(10), step: Some(0), ..Params::default() }.validate().is_err());
        let bad_islands = cpg::Params { min_gc: -1.0, ..Default::default() };
        assert!(Params { cpg: true, islands: bad_islands.clone(), ..Params::default() }.validate().is_err());
        // Island parameters are not checked, when islands are not searched.
        assert!(Params { cpg: false, islands: bad_islands, ..Params::default() }.validate().is_ok());
    }

    #[test]
    fn params_json() {
        let params = Params { window_size: Some(1000), step: None, cpg: true, ..Params::default() };
        let loaded = Params::load(&params.save()).unwrap();
        assert_eq!(loaded.window_size, Some(1000));
        // Default step is saved explicitly.
        assert_eq!(loaded.step, Some(1000));
        assert!(loaded.cpg);
        assert_eq!(loaded.islands.min_len, 200);

        let loaded = Params::load(&Params::default().save()).unwrap();
        assert_eq!((loaded.window_size, loaded.step), (None, None));
        assert!(Params::load(&json::object!{ cpg: true }).is_err());
    }

    #[test]
    fn repeated_names() {
        let mut seqs = vec![named("a", "A"), named("b", "C"), named("a", "G"), named("a_2", "T"), named("a", "N")];
        assert_eq!(qualify_names(&mut seqs), 2);
        let names: Vec<_> = seqs.iter().map(NamedSeq::name).collect();
        assert_eq!(names, vec!["a", "b", "a_3", "a_2", "a_4"]);
    }

    #[test]
    fn summary() {
        let seqs = vec![named("x", "GGGG"), named("y", "ATGC"), named("z", &island_seq())];
        let params = Params { cpg: true, ..Params::default() };
        let summary = FileSummary::new(Path::new("in/sample.fa.gz"), analyze_all(seqs, &params, 2).unwrap());
        assert_eq!(summary.stem(), "sample");
        let stats = summary.stats().unwrap();
        assert_eq!(stats.count(), 3);
        assert_eq!(stats.max(), 100.0);
        assert_eq!(summary.n_islands(), 1);
        assert_eq!(summary.gc_results(false)[1], ("y".to_owned(), 50.0));
        assert_eq!(summary.gc_results(true)[0].0, "sample:x");
    }

    #[test]
    fn process_fasta_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reads.fa");
        std::fs::write(&path, ">a\nGGCC\n>a\nATAT\n").unwrap();
        let summary = process_file(&path, &Params::default(), 1).unwrap();
        let results = summary.gc_results(false);
        assert_eq!(results, vec![("a".to_owned(), 100.0), ("a_2".to_owned(), 0.0)]);
        assert_eq!(summary.stats().unwrap().mean(), 50.0);
    }
}
