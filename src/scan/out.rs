//! Writing analysis results: CSV tables, BED-like island list and JSON summaries.

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};
use crate::{
    Error,
    err::{error, add_path},
    ext::{sys as sys_ext, fmt as fmt_ext},
};
use super::{
    Params, FileSummary,
    ser::{JsonSer, opt_to_json},
};

/// File with effective analysis parameters.
pub const PARAMS_FILENAME: &'static str = "params.json";
/// Prefix of combined outputs, when several input files are analyzed.
pub const COMBINED_STEM: &'static str = "combined";

/// Output file paths for one input file.
pub struct OutPaths {
    pub gc: PathBuf,
    pub windows: Option<PathBuf>,
    pub islands: Option<PathBuf>,
    pub summary: PathBuf,
}

impl OutPaths {
    pub fn new(out_dir: &Path, stem: &str, params: &Params) -> Self {
        Self {
            gc: out_dir.join(format!("{}.gc.csv", stem)),
            windows: params.window_size.map(|_| out_dir.join(format!("{}.windows.csv", stem))),
            islands: if params.cpg { Some(out_dir.join(format!("{}.islands.bed", stem))) } else { None },
            summary: out_dir.join(format!("{}.summary.json", stem)),
        }
    }

    /// Iterates over all output paths.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.gc.as_path())
            .chain(self.windows.as_deref())
            .chain(self.islands.as_deref())
            .chain(std::iter::once(self.summary.as_path()))
    }
}

/// Returns an error if some of the output files already exist and `force` is not set.
pub fn check_existing<'a>(paths: impl Iterator<Item = &'a Path>, force: bool) -> Result<(), Error> {
    let existing: Vec<_> = paths.filter(|path| path.exists()).map(Path::to_path_buf).collect();
    if existing.is_empty() {
        Ok(())
    } else if force {
        log::warn!("Force flag is set: overwriting {}", fmt_ext::paths(&existing));
        Ok(())
    } else {
        Err(error!(InvalidInput, "Output files {} already exist, use -F/--force to overwrite",
            fmt_ext::paths(&existing)))
    }
}

/// Writes GC-content of each sequence. Values are written with 2 decimal places.
pub fn write_gc_csv<W: Write>(mut writer: W, results: &[(String, f64)]) -> io::Result<()> {
    writeln!(writer, "sequence_id,gc_percent")?;
    for (id, gc) in results.iter() {
        writeln!(writer, "{},{:.2}", id, gc)?;
    }
    writer.flush()
}

/// Writes GC-content across sliding windows of all sequences.
pub fn write_windows_csv<W: Write>(
    mut writer: W,
    summary: &FileSummary,
    window_size: usize,
    step: usize,
) -> io::Result<()>
{
    writeln!(writer, "sequence_id,window,start,end,gc_percent")?;
    for analysis in summary.analyses() {
        let Some(windows) = analysis.windows() else { continue };
        for (i, gc) in windows.iter().enumerate() {
            let start = i * step;
            writeln!(writer, "{},{},{},{},{:.2}", analysis.name(), i, start, start + window_size, gc)?;
        }
    }
    writer.flush()
}

/// Writes CpG islands in a BED-like format (0-based, end exclusive).
pub fn write_islands_bed<W: Write>(mut writer: W, summary: &FileSummary) -> io::Result<()> {
    writeln!(writer, "#sequence_id\tstart\tend\tgc_percent\toe_ratio")?;
    for analysis in summary.analyses() {
        for isl in analysis.islands().unwrap_or(&[]) {
            writeln!(writer, "{}\t{}\t{}\t{:.2}\t{:.3}", analysis.name(), isl.start(), isl.end(),
                isl.gc_percent(), isl.oe_ratio())?;
        }
    }
    writer.flush()
}

/// Converts file summary into JSON format.
pub fn summary_json(summary: &FileSummary) -> json::JsonValue {
    let mut obj = json::object!{
        filename: summary.filename().to_string_lossy().into_owned(),
        sequences: summary.analyses().len(),
        stats: opt_to_json(summary.stats().map(|stats| stats.save())),
    };
    if summary.analyses().iter().any(|a| a.islands().is_some()) {
        obj["islands"] = summary.n_islands().into();
    }
    obj
}

/// Writes all outputs for one input file.
pub fn write_outputs(out_paths: &OutPaths, summary: &FileSummary, params: &Params) -> Result<(), Error> {
    let gc_results = summary.gc_results(false);
    write_gc_csv(sys_ext::create_uncompressed(&out_paths.gc).map_err(add_path!(out_paths.gc))?, &gc_results)
        .map_err(add_path!(out_paths.gc))?;

    if let (Some(path), Some((window_size, step))) = (&out_paths.windows, params.window_step()) {
        write_windows_csv(sys_ext::create_uncompressed(path).map_err(add_path!(path))?, summary, window_size, step)
            .map_err(add_path!(path))?;
    }
    if let Some(path) = &out_paths.islands {
        write_islands_bed(sys_ext::create_uncompressed(path).map_err(add_path!(path))?, summary)
            .map_err(add_path!(path))?;
    }

    let mut summary_file = sys_ext::create_uncompressed(&out_paths.summary).map_err(add_path!(out_paths.summary))?;
    summary_json(summary).write_pretty(&mut summary_file, 4).map_err(add_path!(out_paths.summary))?;
    summary_file.flush().map_err(add_path!(out_paths.summary))?;
    log::debug!("    Written {}", fmt_ext::path(&out_paths.gc));
    Ok(())
}

/// Writes effective parameters in the output directory.
pub fn write_params(out_dir: &Path, params: &Params) -> Result<(), Error> {
    let path = out_dir.join(PARAMS_FILENAME);
    let mut file = sys_ext::create_uncompressed(&path).map_err(add_path!(path))?;
    params.save().write_pretty(&mut file, 4).map_err(add_path!(path))?;
    file.flush().map_err(add_path!(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        seq::NamedSeq,
        scan::{analyze_all, FileSummary},
    };

    fn summary(params: &Params) -> FileSummary {
        let island = format!("{}{}{}", "AT".repeat(200), "CG".repeat(200), "AT".repeat(200));
        let seqs = vec![
            NamedSeq::new("s1".to_owned(), b"ATGCATGCA".to_vec()),
            NamedSeq::new("s2".to_owned(), island.into_bytes()),
        ];
        FileSummary::new(Path::new("data/sample.fa"), analyze_all(seqs, params, 1).unwrap())
    }

    fn to_string(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn gc_table() {
        let rows = vec![("a".to_owned(), 50.0), ("b".to_owned(), 100.0 / 3.0)];
        let s = to_string(|w| write_gc_csv(w, &rows));
        assert_eq!(s, "sequence_id,gc_percent\na,50.00\nb,33.33\n");
    }

    #[test]
    fn windows_table() {
        let params = Params { window_size: Some(4), ..Params::default() };
        let summary = summary(&params);
        let s = to_string(|w| write_windows_csv(w, &summary, 4, 4));
        let lines: Vec<_> = s.lines().collect();
        assert_eq!(lines[0], "sequence_id,window,start,end,gc_percent");
        assert_eq!(lines[1], "s1,0,0,4,50.00");
        assert_eq!(lines[2], "s1,1,4,8,50.00");
        assert_eq!(lines[3], "s2,0,0,4,0.00");
        assert_eq!(lines.len(), 3 + 300);
    }

    #[test]
    fn islands_table() {
        let params = Params { cpg: true, ..Params::default() };
        let summary = summary(&params);
        let s = to_string(|w| write_islands_bed(w, &summary));
        assert_eq!(s, "#sequence_id\tstart\tend\tgc_percent\toe_ratio\ns2\t400\t800\t100.00\t2.000\n");
    }

    #[test]
    fn json_summary() {
        let summary = summary(&Params { cpg: true, ..Params::default() });
        let obj = summary_json(&summary);
        assert_eq!(obj["sequences"].as_usize(), Some(2));
        assert_eq!(obj["islands"].as_usize(), Some(1));
        assert_eq!(obj["stats"]["count"].as_usize(), Some(2));

        let obj = summary_json(&FileSummary::new(Path::new("my data/empty.fa"), Vec::new()));
        // Paths are written as is, without quotes.
        assert_eq!(obj["filename"].as_str(), Some("my data/empty.fa"));
        assert!(obj["stats"].is_null());
        assert!(obj["islands"].is_null());
    }

    #[test]
    fn output_files() {
        let dir = tempfile::tempdir().unwrap();
        let params = Params { window_size: Some(4), cpg: true, ..Params::default() };
        let summary = summary(&params);
        let out_paths = OutPaths::new(dir.path(), summary.stem(), &params);
        assert_eq!(out_paths.iter().count(), 4);
        check_existing(out_paths.iter(), false).unwrap();

        write_outputs(&out_paths, &summary, &params).unwrap();
        write_params(dir.path(), &params).unwrap();
        for path in out_paths.iter() {
            assert!(path.exists(), "{} was not written", path.display());
        }
        let gc = std::fs::read_to_string(dir.path().join("sample.gc.csv")).unwrap();
        assert_eq!(gc, "sequence_id,gc_percent\ns1,44.44\ns2,33.33\n");
        let saved = json::parse(&std::fs::read_to_string(dir.path().join(PARAMS_FILENAME)).unwrap()).unwrap();
        assert_eq!(Params::load(&saved).unwrap().window_size, Some(4));

        assert!(matches!(check_existing(out_paths.iter(), false), Err(Error::InvalidInput(_))));
        assert!(check_existing(out_paths.iter(), true).is_ok());
    }
}
