use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use rand::prelude::*;

use rlebwt::bcr::{Bcr, BuildOpts, SEQ_NT6_TABLE, SYM_CHARS};
use rlebwt::error::{Error, Result};
use rlebwt::fastx;
use rlebwt::utils::{cputime, realtime};

#[derive(Parser)]
#[command(name = "rlebwt")]
#[command(about = "Build the run-length BWT of a DNA read collection", long_about = None)]
#[command(version)]
struct Cli {
    /// Input FASTA/FASTQ file, optionally gzipped
    #[arg(value_name = "READS")]
    input: PathBuf,

    /// Index the forward strand only (skip reverse complements)
    #[arg(short = 'f', long)]
    for_only: bool,

    /// Number of threads; anything above 1 enables the per-bucket 4-way
    /// parallel inner step
    #[arg(short = 't', long, value_name = "INT", default_value = "1")]
    threads: usize,

    /// Sort strings into reverse lexicographic order while building
    #[arg(long)]
    rlo: bool,

    /// Classify with an auxiliary array: more memory, less time
    #[arg(long)]
    fast: bool,

    /// Spill transposed columns to FILE up front and stream them back one
    /// per cycle (lower peak memory)
    #[arg(long, value_name = "FILE")]
    tmp: Option<PathBuf>,

    /// Write the BWT to FILE instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// What to do with N and other ambiguity codes: rewrite to a random
    /// base before building (the classic demo behavior) or keep N as a
    /// sixth symbol
    #[arg(long, value_enum, default_value = "random")]
    n_policy: NPolicy,

    /// Seed for `--n-policy random`
    #[arg(long, value_name = "INT", default_value = "11")]
    seed: u64,

    /// Verbose level: 1=error, 2=warning, 3=message, 4+=debugging
    #[arg(short = 'v', long, value_name = "INT", default_value = "3")]
    verbosity: i32,
}

#[derive(Clone, Copy, ValueEnum)]
enum NPolicy {
    /// Replace every N with a uniformly random A/C/G/T
    Random,
    /// Feed N through as symbol 5
    Keep,
}

/// In-place reverse complement over the 0..=5 codes; the sentinel and N map
/// to themselves.
fn revcomp6(seq: &mut [u8]) {
    seq.reverse();
    for c in seq.iter_mut() {
        if (1..=4).contains(c) {
            *c = 5 - *c;
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let t_start = realtime();
    let mut bcr = Bcr::new();
    let mut rng = StdRng::seed_from_u64(cli.seed);

    let mut n_reads = 0u64;
    let mut n_bases = 0u64;
    for record in fastx::open(&cli.input)? {
        let seq = record?;
        let mut codes: Vec<u8> = seq.iter().map(|&b| SEQ_NT6_TABLE[b as usize]).collect();
        if matches!(cli.n_policy, NPolicy::Random) {
            for c in codes.iter_mut() {
                if *c == 5 {
                    *c = rng.gen_range(1..=4);
                }
            }
        }
        n_reads += 1;
        n_bases += codes.len() as u64;
        bcr.append(&codes)?;
        if !cli.for_only {
            revcomp6(&mut codes);
            bcr.append(&codes)?;
        }
    }
    log::info!(
        "read {} sequences, {} bases ({} strings appended) in {:.2} s",
        n_reads,
        n_bases,
        bcr.n_seqs(),
        realtime() - t_start
    );

    let opts = BuildOpts {
        fast: cli.fast,
        rlo: cli.rlo,
        threaded: cli.threads > 1,
    };
    let t_build = realtime();
    bcr.build(opts, cli.tmp.as_deref())?;
    let mc = bcr.marginal_counts();
    log::info!(
        "built BWT of {} symbols in {:.2} s real, {:.2} s CPU",
        bcr.len(),
        realtime() - t_build,
        cputime()
    );
    log::info!(
        "marginal counts: $={} A={} C={} G={} T={} N={}",
        mc[0],
        mc[1],
        mc[2],
        mc[3],
        mc[4],
        mc[5]
    );

    let out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(File::create(path).map_err(|e| Error::io("create output", e))?),
        None => Box::new(io::stdout().lock()),
    };
    let mut out = io::BufWriter::new(out);
    let mut run_buf: Vec<u8> = Vec::new();
    for (count, sym) in bcr.cells() {
        run_buf.clear();
        run_buf.resize(count as usize, SYM_CHARS[sym as usize]);
        out.write_all(&run_buf)
            .map_err(|e| Error::io("write BWT", e))?;
    }
    out.write_all(b"\n").map_err(|e| Error::io("write BWT", e))?;
    out.flush().map_err(|e| Error::io("write BWT", e))?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbosity {
        v if v <= 1 => log::LevelFilter::Error,
        2 => log::LevelFilter::Warn,
        3 => log::LevelFilter::Info,
        4 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None)
        .format_target(false)
        .init();

    if let Err(e) = run(&cli) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
