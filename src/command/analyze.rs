use std::{
    cmp::max,
    collections::HashSet,
    path::{Path, PathBuf},
    time::Instant,
};
use colored::Colorize;
use const_format::str_repeat;
use crate::{
    Error,
    err::{error, validate_param, add_path},
    algo::parse_int,
    math,
    scan::{self, FileSummary, out},
    ext::{fmt as fmt_ext, sys as sys_ext},
};

/// Recognized FASTA extensions, each can be followed by `.gz`.
const FASTA_EXTS: [&'static str; 3] = ["fasta", "fa", "fna"];

struct Args {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    threads: u16,
    force: bool,
    verbosity: log::LevelFilter,

    params: scan::Params,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            threads: 4,
            force: false,
            verbosity: log::LevelFilter::Debug,

            params: Default::default(),
        }
    }
}

impl Args {
    /// Validate arguments, modifying some, if needed.
    fn validate(mut self) -> Result<Self, Error> {
        self.threads = max(self.threads, 1);
        validate_param!(self.input.is_some(), "Input file or directory is not provided (see -i/--input)");
        validate_param!(self.output.is_some(), "Output directory is not provided (see -o/--output)");
        self.params.validate()?;
        Ok(self)
    }
}

fn print_help() {
    const KEY: usize = 16;
    const VAL: usize = 5;
    const EMPTY: &'static str = str_repeat!(" ", KEY + VAL + 5);

    let defaults = Args::default();
    println!("{}", "Calculate GC-content, GC-content across sliding windows and CpG islands.".yellow());

    println!("\n{} {} analyze -i (in.fa | dir) -o out [arguments]",
        "Usage:".bold(), super::PKG_NAME);

    println!("\n{}", "Input/output arguments:".bold());
    println!("    {:KEY$} {:VAL$}  Input FASTA file (optionally gzip compressed), or a directory.\n\
        {EMPTY}  In the latter case, all *.fasta, *.fa and *.fna files are analyzed.",
        "-i, --input".green(), "FILE".yellow());
    println!("    {:KEY$} {:VAL$}  Output directory.",
        "-o, --output".green(), "DIR".yellow());

    println!("\n{}", "GC-content:".bold());
    println!("    {:KEY$} {:VAL$}  Calculate GC-content across sliding windows of this size.\n\
        {EMPTY}  Default: windows are not analyzed.",
        "-w, --window".green(), "INT".yellow());
    println!("    {:KEY$} {:VAL$}  Step between consecutive windows. Default: window size.",
        "-s, --step".green(), "INT".yellow());

    println!("\n{}", "CpG islands:".bold());
    println!("    {:KEY$} {:VAL$}  Detect CpG islands.",
        "    --cpg".green(), super::flag());
    println!("    {:KEY$} {:VAL$}  Minimal island length [{}].",
        "    --min-len".green(), "INT".yellow(), defaults.params.islands.min_len);
    println!("    {:KEY$} {:VAL$}  Minimal GC-content of an island, in percent [{}].",
        "    --min-gc".green(), "FLOAT".yellow(), defaults.params.islands.min_gc);
    println!("    {:KEY$} {:VAL$}  Minimal observed/expected CpG ratio [{}].",
        "    --min-oe".green(), "FLOAT".yellow(), defaults.params.islands.min_oe);

    println!("\n{}", "Execution parameters:".bold());
    println!("    {:KEY$} {:VAL$}  Number of threads [{}].",
        "-@, --threads".green(), "INT".yellow(), defaults.threads);
    println!("    {:KEY$} {:VAL$}  Force rewrite output files.",
        "-F, --force".green(), super::flag());
    println!("    {:KEY$} {:VAL$}  Only show warnings and errors.",
        "-q, --quiet".green(), super::flag());
    println!("    {:KEY$} {:VAL$}  Show all log messages.",
        "-v, --verbose".green(), super::flag());

    println!("\n{}", "Other parameters:".bold());
    println!("    {:KEY$} {:VAL$}  Show this help message.", "-h, --help".green(), "");
    println!("    {:KEY$} {:VAL$}  Show version.", "-V, --version".green(), "");
}

fn parse_args(argv: &[String]) -> Result<Args, lexopt::Error> {
    use lexopt::prelude::*;
    let mut args = Args::default();
    let mut parser = lexopt::Parser::from_args(argv);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('i') | Long("input") => args.input = Some(parser.value()?.parse()?),
            Short('o') | Long("output") => args.output = Some(parser.value()?.parse()?),

            Short('w') | Long("window") => args.params.window_size = Some(parser.value()?.parse_with(parse_int)?),
            Short('s') | Long("step") => args.params.step = Some(parser.value()?.parse_with(parse_int)?),

            Long("cpg") => args.params.cpg = true,
            Long("min-len") => args.params.islands.min_len = parser.value()?.parse_with(parse_int)?,
            Long("min-gc") => args.params.islands.min_gc = parser.value()?.parse()?,
            Long("min-oe") => args.params.islands.min_oe = parser.value()?.parse()?,

            Short('@') | Long("threads") => args.threads = parser.value()?.parse()?,
            Short('F') | Long("force") => args.force = true,
            Short('q') | Long("quiet") => args.verbosity = log::LevelFilter::Warn,
            Short('v') | Long("verbose") => args.verbosity = log::LevelFilter::Trace,

            Short('V') | Long("version") => {
                super::print_version();
                std::process::exit(0);
            }
            Short('h') | Long("help") => {
                print_help();
                std::process::exit(0);
            }
            _ => Err(arg.unexpected())?,
        }
    }
    Ok(args)
}

/// Returns input FASTA files: either the input file itself, or all FASTA files in the input directory.
fn input_files(input: &Path) -> Result<Vec<PathBuf>, Error> {
    if !input.is_dir() {
        if input != Path::new("-") && !input.exists() {
            return Err(error!(InvalidInput, "Input file {} does not exist", fmt_ext::path(input)));
        }
        return Ok(vec![input.to_owned()]);
    }

    let filenames = sys_ext::filenames_with_ext(input, &FASTA_EXTS).map_err(add_path!(input))?;
    if filenames.is_empty() {
        return Err(error!(InvalidInput, "No FASTA files (*.{}) found in {}",
            FASTA_EXTS.join(", *."), fmt_ext::path(input)));
    }
    let mut stems = HashSet::with_capacity(filenames.len());
    for filename in filenames.iter() {
        let stem = sys_ext::file_stem(filename);
        validate_param!(stem != out::COMBINED_STEM, "Input file {} conflicts with the combined output",
            fmt_ext::path(filename));
        validate_param!(stems.insert(stem), "Several input files share the same name as {}",
            fmt_ext::path(filename));
    }
    Ok(filenames)
}

/// Prints analysis results for one file to stdout.
fn report(summary: &FileSummary, params: &scan::Params) {
    println!("{} {}", "==>".bold(), fmt_ext::path(summary.filename()).bold());
    println!("Sequences: {}", summary.analyses().len());
    match summary.stats() {
        Some(stats) => println!("GC-content: {:.2}% ± {:.2}% (median {:.2}%, range {:.2}% - {:.2}%)",
            stats.mean(), stats.std_dev(), stats.median(), stats.min(), stats.max()),
        None => println!("GC-content: {}", "no sequences".yellow()),
    }

    if let Some((window_size, step)) = params.window_step() {
        println!("Sliding windows ({} bp, step {}):", window_size, step);
        for analysis in summary.analyses() {
            println!("    {:<20}  {} windows", analysis.name(), analysis.windows().map(<[_]>::len).unwrap_or(0));
        }
    }

    if params.cpg {
        println!("CpG islands: {}", summary.n_islands());
        for analysis in summary.analyses() {
            match analysis.islands() {
                Some(islands) if !islands.is_empty() => {
                    println!("    {}:", analysis.name());
                    for island in islands {
                        println!("        {}  ({} bp)", island, island.len());
                    }
                }
                _ => println!("    {}: {}", analysis.name(), "none found".dimmed()),
            }
        }
    }
    println!();
}

/// Writes combined GC-content table and logs combined statistics.
fn write_combined(out_dir: &Path, summaries: &[FileSummary]) -> Result<(), Error> {
    let gc_results: Vec<(String, f64)> = summaries.iter().flat_map(|summary| summary.gc_results(true)).collect();
    let path = out_dir.join(format!("{}.gc.csv", out::COMBINED_STEM));
    out::write_gc_csv(sys_ext::create_uncompressed(&path).map_err(add_path!(path))?, &gc_results)
        .map_err(add_path!(path))?;

    let gc_values: Vec<f64> = gc_results.iter().map(|(_, gc)| *gc).collect();
    match math::describe(&gc_values) {
        Some(stats) => log::info!("Combined GC-content across {} files: {}", summaries.len(), stats),
        None => log::warn!("Input files contain no sequences"),
    }
    Ok(())
}

fn analyze(args: &Args) -> Result<Vec<FileSummary>, Error> {
    let input = args.input.as_ref().ok_or_else(|| error!(InvalidInput, "Input is not provided"))?;
    let out_dir = args.output.as_ref().ok_or_else(|| error!(InvalidInput, "Output directory is not provided"))?;
    let filenames = input_files(input)?;
    log::info!("Analyzing {} file{}", filenames.len(), if filenames.len() == 1 { "" } else { "s" });

    sys_ext::mkdir(out_dir).map_err(add_path!(out_dir))?;
    let all_paths: Vec<_> = filenames.iter()
        .map(|filename| out::OutPaths::new(out_dir, &sys_ext::file_stem(filename), &args.params))
        .collect();
    let mut existing: Vec<PathBuf> = all_paths.iter().flat_map(|paths| paths.iter().map(Path::to_path_buf)).collect();
    existing.push(out_dir.join(out::PARAMS_FILENAME));
    if filenames.len() > 1 {
        existing.push(out_dir.join(format!("{}.gc.csv", out::COMBINED_STEM)));
    }
    out::check_existing(existing.iter().map(PathBuf::as_path), args.force)?;
    out::write_params(out_dir, &args.params)?;

    let mut summaries = Vec::with_capacity(filenames.len());
    for (filename, out_paths) in filenames.iter().zip(&all_paths) {
        log::info!("Processing {}", fmt_ext::path(filename));
        let timer = Instant::now();
        let summary = scan::process_file(filename, &args.params, args.threads)?;
        log::debug!("    Analyzed {} sequences in {}", summary.analyses().len(), fmt_ext::Duration(timer.elapsed()));
        report(&summary, &args.params);
        out::write_outputs(out_paths, &summary, &args.params)?;
        summaries.push(summary);
    }
    if summaries.len() > 1 {
        write_combined(out_dir, &summaries)?;
    }
    Ok(summaries)
}

pub(super) fn run(argv: &[String]) -> Result<(), Error> {
    let args = parse_args(argv)?.validate()?;
    log::set_max_level(args.verbosity);
    let timer = Instant::now();
    analyze(&args)?;
    log::info!("Success. Total time: {}", fmt_ext::Duration(timer.elapsed()));
    Ok(())
}
