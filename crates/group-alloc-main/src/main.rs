// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use group_alloc_core::bitvec::SummaryMerge;
use group_alloc_model::{
    generator::{InstanceGenConfigBuilder, InstanceGenerator},
    io::{read_problem_file, write_problem_file, write_solution_file},
    problem::ProblemStats,
    sol::SolutionStats,
};
use group_alloc_solver::{
    cache::CacheStats,
    config::{AllocConfig, DEFAULT_PROGRESS_STEP_PERCENT, DEFAULT_SAMPLE_SIZE, DEFAULT_SEED},
    driver::AllocationDriver,
    progress::{Progress, ProgressObserver},
    sampler::RandomIndexSampler,
};
use serde::Serialize;
use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Assemble fixed-capacity groups of maximally diverse items.
#[derive(Parser)]
#[command(name = "group-alloc")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve `<input-dir>/<name>` and write the groups to `<output-dir>/<name>`.
    Solve(SolveArgs),

    /// Write a synthetic problem in the input format.
    #[command(alias = "gen")]
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct SolveArgs {
    /// File name of the problem, shared by input and output.
    name: String,

    #[arg(long, default_value = "input")]
    input_dir: PathBuf,

    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Candidates sampled per assignment.
    #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    sample_size: usize,

    /// How a group's summary vector absorbs a new member.
    #[arg(long, value_enum, default_value_t = MergeArg::SelfAgreement)]
    merge: MergeArg,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Percentage step between progress lines.
    #[arg(long, default_value_t = DEFAULT_PROGRESS_STEP_PERCENT)]
    progress_step: u8,

    /// Also write a JSON run summary to this path.
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Destination file.
    path: PathBuf,

    #[arg(long, default_value_t = 1000)]
    items: usize,

    /// Number of distinct feature labels to draw from.
    #[arg(long, default_value_t = 200)]
    vocabulary: usize,

    #[arg(long, default_value_t = 1)]
    min_features: usize,

    #[arg(long, default_value_t = 8)]
    max_features: usize,

    /// Skew of feature popularity; larger values favour fewer labels.
    #[arg(long, default_value_t = 1.0)]
    decay: f64,

    /// Group declaration as `CAPACITY:COUNT`. Repeatable. Defaults to an even
    /// split over capacities 2, 3 and 4.
    #[arg(long = "group", value_parser = parse_group)]
    groups: Vec<(usize, usize)>,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MergeArg {
    SelfAgreement,
    Intersection,
}

impl From<MergeArg> for SummaryMerge {
    fn from(value: MergeArg) -> Self {
        match value {
            MergeArg::SelfAgreement => SummaryMerge::SelfAgreement,
            MergeArg::Intersection => SummaryMerge::Intersection,
        }
    }
}

fn parse_group(s: &str) -> Result<(usize, usize), String> {
    let (cap, count) = s
        .split_once(':')
        .ok_or_else(|| format!("expected CAPACITY:COUNT, got `{s}`"))?;
    let cap = cap
        .trim()
        .parse()
        .map_err(|e| format!("invalid capacity `{cap}`: {e}"))?;
    let count = count
        .trim()
        .parse()
        .map_err(|e| format!("invalid count `{count}`: {e}"))?;
    Ok((cap, count))
}

/// Prints `<name>: <percent>%` lines.
struct NamedProgress<'a> {
    name: &'a str,
}

impl ProgressObserver for NamedProgress<'_> {
    fn on_progress(&mut self, progress: Progress) {
        println!("{}: {}%", self.name, progress.percent());
    }
}

#[derive(Debug, Serialize)]
struct ConfigReport {
    sample_size: usize,
    merge: String,
    seed: u64,
}

#[derive(Debug, Serialize)]
struct CacheReport {
    entries: usize,
    hits: u64,
    misses: u64,
    hit_rate: f64,
}

impl From<&CacheStats> for CacheReport {
    fn from(value: &CacheStats) -> Self {
        Self {
            entries: value.entries(),
            hits: value.hits(),
            misses: value.misses(),
            hit_rate: value.hit_rate(),
        }
    }
}

#[derive(Debug, Serialize)]
struct RunReport {
    name: String,
    config: ConfigReport,
    problem: ProblemStats,
    solution: SolutionStats,
    partial_groups: usize,
    leftover_items: usize,
    cache: CacheReport,
    elapsed_ms: u128,
}

fn solve(args: SolveArgs) -> Result<()> {
    let config = AllocConfig::new(
        args.sample_size,
        args.merge.into(),
        args.seed,
        args.progress_step,
    )
    .context("invalid solver configuration")?;

    let input = args.input_dir.join(&args.name);
    let problem = read_problem_file(&input)
        .with_context(|| format!("failed to read problem from {}", input.display()))?;
    info!(
        items = problem.item_count(),
        features = problem.feature_len(),
        groups = problem.group_count(),
        "Loaded {}",
        input.display()
    );

    let started = Instant::now();
    let mut driver = AllocationDriver::with_parts(
        config,
        RandomIndexSampler::seeded(config.seed()),
        NamedProgress { name: &args.name },
    );
    let allocation = driver
        .run(&problem)
        .with_context(|| format!("failed to allocate {}", args.name))?;
    let elapsed = started.elapsed();

    let solution = allocation.solution();
    solution
        .validate(&problem)
        .context("allocation produced an invalid solution")?;

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("failed to create {}", args.output_dir.display()))?;
    let output = args.output_dir.join(&args.name);
    write_solution_file(&output, solution)
        .with_context(|| format!("failed to write solution to {}", output.display()))?;

    if let Some(path) = &args.report {
        let report = RunReport {
            name: args.name.clone(),
            config: ConfigReport {
                sample_size: config.sample_size(),
                merge: config.merge().to_string(),
                seed: config.seed(),
            },
            problem: *problem.stats(),
            solution: *solution.stats(),
            partial_groups: allocation.partial_groups().len(),
            leftover_items: allocation.leftover().len(),
            cache: allocation.cache().into(),
            elapsed_ms: elapsed.as_millis(),
        };
        write_report(path, &report)?;
    }

    println!("{}: Done!", args.name);
    Ok(())
}

fn write_report(path: &Path, report: &RunReport) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    info!("Wrote report to {}", path.display());
    Ok(())
}

fn generate(args: GenerateArgs) -> Result<()> {
    if args.items == 0 {
        bail!("--items must be positive");
    }

    let mut builder = InstanceGenConfigBuilder::new()
        .item_count(args.items)
        .vocabulary(args.vocabulary)
        .features_per_item(args.min_features, args.max_features)
        .popularity_decay(args.decay)
        .seed(args.seed);
    if args.groups.is_empty() {
        let per_capacity = (args.items / 9).max(1);
        for capacity in 2..=4 {
            builder = builder.groups(capacity, per_capacity);
        }
    } else {
        for &(capacity, count) in &args.groups {
            builder = builder.groups(capacity, count);
        }
    }

    let config = builder.build().context("invalid generator configuration")?;
    let problem = InstanceGenerator::new(config)
        .context("invalid generator configuration")?
        .generate()
        .context("failed to generate problem")?;

    if let Some(parent) = args.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    write_problem_file(&args.path, &problem)
        .with_context(|| format!("failed to write {}", args.path.display()))?;
    info!(
        items = problem.item_count(),
        features = problem.feature_len(),
        groups = problem.group_count(),
        "Wrote {}",
        args.path.display()
    );
    Ok(())
}

fn main() -> Result<()> {
    enable_tracing();
    match Cli::parse().command {
        Command::Solve(args) => solve(args),
        Command::Generate(args) => generate(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_group() {
        assert_eq!(parse_group("3:20"), Ok((3, 20)));
        assert_eq!(parse_group(" 2 : 5"), Ok((2, 5)));
        assert!(parse_group("3").is_err());
        assert!(parse_group("x:1").is_err());
    }

    #[test]
    fn test_solve_defaults() {
        let cli = Cli::parse_from(["group-alloc", "solve", "a_example"]);
        let Command::Solve(args) = cli.command else {
            panic!("expected solve");
        };
        assert_eq!(args.name, "a_example");
        assert_eq!(args.input_dir, PathBuf::from("input"));
        assert_eq!(args.sample_size, DEFAULT_SAMPLE_SIZE);
        assert_eq!(SummaryMerge::from(args.merge), SummaryMerge::SelfAgreement);
        assert!(args.report.is_none());
    }

    #[test]
    fn test_merge_flag() {
        let cli = Cli::parse_from(["group-alloc", "solve", "x", "--merge", "intersection"]);
        let Command::Solve(args) = cli.command else {
            panic!("expected solve");
        };
        assert_eq!(SummaryMerge::from(args.merge), SummaryMerge::Intersection);
    }
}
