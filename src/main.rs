//! typefold CLI - group-type balanced k-fold splits
//!
//! Usage:
//!   typefold split trials.csv -k 5           # Split a CSV and print the report
//!   typefold summarize trials.csv            # Per-group type counts
//!   typefold demo --groups 30 -k 5           # Split synthetic data
//!   typefold config set n-splits 10          # Store a default

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use console::style;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use typefold_core::folds::{FoldAssignment, SplitReport};
use typefold_core::{summarize_groups_with, AssignStrategy, GroupTypeKFold, ImpurityPolicy, SplitConfig};

mod config;
mod csv_support;
mod test_data;

use config::Config;
use csv_support::{read_labeled_csv, ColumnRef, LabeledRows};

// ============================================================================
// CLI STRUCTURE
// ============================================================================

#[derive(Parser)]
#[command(name = "typefold")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "typefold - k-fold splits that keep groups whole and group types balanced", long_about = None)]
#[command(after_help = "Set RUST_LOG=typefold_core=debug to trace fold placement.")]
struct Cli {
    /// Verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a CSV file into group-type balanced folds
    Split {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        split: SplitArgs,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,

        /// List the held-out groups of every fold
        #[arg(long)]
        show_groups: bool,
    },

    /// Show per-group type counts of a CSV file
    Summarize {
        #[command(flatten)]
        input: InputArgs,

        /// Impurity policy: counts or majority
        #[arg(long)]
        policy: Option<ImpurityPolicy>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Split a synthetic grouped dataset
    Demo {
        /// Number of groups
        #[arg(long, default_value = "10")]
        groups: usize,

        /// Number of samples
        #[arg(long, default_value = "500")]
        samples: usize,

        /// Number of group types
        #[arg(long, default_value = "3")]
        types: usize,

        /// Share of each group's samples carrying its home type (0.0-1.0)
        #[arg(long, default_value = "1.0")]
        purity: f64,

        /// Seed for the synthetic data
        #[arg(long, default_value = "42")]
        data_seed: u64,

        #[command(flatten)]
        split: SplitArgs,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,

        /// List the held-out groups of every fold
        #[arg(long)]
        show_groups: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Input CSV file. Use - for stdin.
    input: PathBuf,

    /// Column holding group ids (header name or 0-based index)
    #[arg(long)]
    group_column: Option<String>,

    /// Column holding group types (header name or 0-based index)
    #[arg(long)]
    type_column: Option<String>,

    /// CSV has no header row
    #[arg(long)]
    no_header: bool,
}

#[derive(Args)]
struct SplitArgs {
    /// Number of folds (default: 5)
    #[arg(short = 'k', long)]
    n_splits: Option<usize>,

    /// Seed for shuffling equally sized groups
    #[arg(long)]
    seed: Option<u64>,

    /// Assignment strategy: balanced or round-robin
    #[arg(long)]
    strategy: Option<AssignStrategy>,

    /// Impurity policy: counts or majority
    #[arg(long)]
    policy: Option<ImpurityPolicy>,

    /// Largest acceptable per-type deviation before a fold is flagged
    #[arg(long)]
    tolerance: Option<f64>,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set a configuration value
    Set {
        /// Key (n-splits, strategy, policy, seed, group-column, type-column)
        key: String,
        /// Value
        value: String,
    },
    /// Get a configuration value
    Get {
        /// Key
        key: String,
    },
    /// List all configuration
    List,
    /// Show config file path
    Path,
}

// ============================================================================
// MAIN
// ============================================================================

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Split { input, split, json, show_groups } => {
            split_cmd(&input, &split, json, show_groups)?;
        }
        Commands::Summarize { input, policy, json } => {
            summarize_cmd(&input, policy, json)?;
        }
        Commands::Demo { groups, samples, types, purity, data_seed, split, json, show_groups } => {
            demo_cmd(groups, samples, types, purity, data_seed, &split, json, show_groups)?;
        }
        Commands::Config { action } => match action {
            ConfigCommands::Set { key, value } => config_set(&key, &value)?,
            ConfigCommands::Get { key } => config_get(&key)?,
            ConfigCommands::List => config_list()?,
            ConfigCommands::Path => config_path()?,
        },
    }

    Ok(())
}

/// Logs go to stderr so JSON on stdout stays clean
fn init_logging(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("typefold=debug,typefold_core=debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("typefold=warn,typefold_core=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Config file defaults overridden by command-line flags
fn resolve_split_config(config: &Config, args: &SplitArgs) -> Result<SplitConfig> {
    let mut split = config.split_config()?;
    if let Some(n) = args.n_splits {
        split = split.with_n_splits(n);
    }
    if let Some(seed) = args.seed {
        split = split.with_seed(seed);
    }
    if let Some(strategy) = args.strategy {
        split = split.with_strategy(strategy);
    }
    if let Some(policy) = args.policy {
        split = split.with_policy(policy);
    }
    if let Some(tolerance) = args.tolerance {
        split = split.with_deviation_tolerance(tolerance);
    }
    split.validate()?;
    Ok(split)
}

fn load_rows(args: &InputArgs, config: &Config) -> Result<LabeledRows> {
    let parse_column = |s: &String| s.parse::<ColumnRef>().unwrap_or_else(|e| match e {});
    let group_column = args.group_column.as_ref().or(config.group_column.as_ref()).map(parse_column);
    let type_column = args.type_column.as_ref().or(config.type_column.as_ref()).map(parse_column);

    let rows = read_labeled_csv(&args.input, !args.no_header, group_column.as_ref(), type_column.as_ref())?;
    tracing::debug!(
        rows = rows.len(),
        group_column = %rows.group_column,
        type_column = %rows.type_column,
        "Loaded {}",
        args.input.display()
    );
    Ok(rows)
}

// ============================================================================
// SPLIT / DEMO COMMANDS
// ============================================================================

/// JSON output of a split
#[derive(Serialize)]
struct SplitOutput<'a> {
    #[serde(flatten)]
    report: &'a SplitReport,
    /// Group -> fold mapping, only with --show-groups
    #[serde(skip_serializing_if = "Option::is_none")]
    groups: Option<BTreeMap<&'a str, usize>>,
}

fn split_cmd(input: &InputArgs, args: &SplitArgs, json: bool, show_groups: bool) -> Result<()> {
    let config = Config::load()?;
    let split = resolve_split_config(&config, args)?;
    let rows = load_rows(input, &config)?;

    let source = format!(
        "{} ({} / {})",
        input.input.display(),
        rows.group_column,
        rows.type_column
    );
    run_split(&rows.groups, &rows.group_types, &split, &source, json, show_groups)
}

#[allow(clippy::too_many_arguments)]
fn demo_cmd(
    n_groups: usize,
    n_samples: usize,
    n_types: usize,
    purity: f64,
    data_seed: u64,
    args: &SplitArgs,
    json: bool,
    show_groups: bool,
) -> Result<()> {
    if n_groups == 0 {
        anyhow::bail!("--groups must be at least 1");
    }

    let config = Config::load()?;
    let split = resolve_split_config(&config, args)?;
    let data = test_data::generate_grouped_data(n_groups, n_samples, n_types, purity, data_seed);

    let source = format!("synthetic (data seed {}, purity {:.2})", data_seed, purity);
    run_split(&data.groups, &data.group_types, &split, &source, json, show_groups)
}

fn run_split(
    groups: &[String],
    group_types: &[String],
    split: &SplitConfig,
    source: &str,
    json: bool,
    show_groups: bool,
) -> Result<()> {
    let kfold = GroupTypeKFold::from_config(split);
    let outcome = kfold
        .split_detailed(groups, group_types)
        .context("Failed to split data")?;

    let report = SplitReport::build(&outcome.folds, group_types, split.strategy, split.deviation_tolerance);

    if json {
        let output = SplitOutput {
            report: &report,
            groups: show_groups.then(|| outcome.assignment.iter().map(|(g, f)| (g.as_str(), f)).collect()),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_report(&report, source, show_groups.then_some(&outcome.assignment));
    }

    Ok(())
}

fn print_report(report: &SplitReport, source: &str, assignment: Option<&FoldAssignment<String>>) {
    println!();
    println!("{}", style("Group-Type K-Fold Split").bold().cyan());
    println!("{}", style("═".repeat(60)).dim());
    println!();
    println!("  Source:      {}", style(source).white());
    println!("  Samples:     {}", report.n_samples);
    println!("  Groups:      {}", report.n_groups);
    println!("  Types:       {}", report.types.join(", "));
    println!("  Strategy:    {}", style(&report.strategy).green());
    println!("  Folds:       {}", report.n_splits);
    println!();
    println!("{}", style("─".repeat(60)).dim());

    let width = report.types.iter().map(|t| t.len()).max().unwrap_or(0).max(6);
    let mut header = format!("  {:<6}{:>7}{:>7}{:>8}", "Fold", "Train", "Test", "Groups");
    for t in &report.types {
        header.push_str(&format!("{:>w$}", t, w = width + 1));
    }
    header.push_str(&format!("{:>8}", "Dev"));
    println!("{}", style(header).underlined());

    for fold in &report.folds {
        let mut row = format!(
            "  {:<6}{:>7}{:>7}{:>8}",
            fold.fold, fold.train_samples, fold.test_samples, fold.test_groups
        );
        for p in &fold.proportions {
            row.push_str(&format!("{:>w$.3}", p.test, w = width + 1));
        }
        let dev = format!("{:>8.3}", fold.test_deviation);
        if fold.test_deviation > report.deviation_tolerance || !fold.missing_types.is_empty() {
            println!("{}{}", row, style(dev).yellow());
        } else {
            println!("{}{}", row, style(dev).green());
        }
    }

    let mut global = format!("  {:<28}", "global");
    for p in &report.global_proportions {
        global.push_str(&format!("{:>w$.3}", p, w = width + 1));
    }
    println!("{}", style(global).dim());
    println!("{}", style("─".repeat(60)).dim());

    if let Some(assignment) = assignment {
        println!();
        for fold in 0..assignment.n_splits() {
            let held_out: Vec<&str> = assignment.test_groups(fold).into_iter().map(String::as_str).collect();
            println!("  Fold {}: {}", fold, held_out.join(", "));
        }
        println!();
        println!("{}", style("─".repeat(60)).dim());
    }

    println!();
    for rec in &report.recommendations {
        if rec.is_warning() {
            println!("  {} {}", style("⚠").yellow(), rec.message);
        } else {
            println!("  {} {}", style("ℹ").blue(), rec.message);
        }
    }
    println!();

    if report.is_balanced() {
        println!(
            "  {} {}",
            style("VERDICT:").bold(),
            style(format!("BALANCED - max deviation {:.3}", report.max_deviation)).green().bold()
        );
    } else {
        println!(
            "  {} {}",
            style("VERDICT:").bold(),
            style(format!("CHECK WARNINGS - max deviation {:.3}", report.max_deviation)).yellow().bold()
        );
    }
    println!("{}", style("═".repeat(60)).dim());
    println!();
}

// ============================================================================
// SUMMARIZE COMMAND
// ============================================================================

/// One group of `typefold summarize --json`
#[derive(Serialize)]
struct GroupRow<'a> {
    group: &'a str,
    size: usize,
    dominant_type: Option<&'a str>,
    counts: BTreeMap<&'a str, usize>,
}

fn summarize_cmd(input: &InputArgs, policy: Option<ImpurityPolicy>, json: bool) -> Result<()> {
    let config = Config::load()?;
    let policy = match policy {
        Some(p) => p,
        None => config.split_config()?.policy,
    };
    let rows = load_rows(input, &config)?;

    let summary = summarize_groups_with(&rows.groups, &rows.group_types, policy)
        .context("Failed to summarize groups")?;
    let types: Vec<&str> = summary.types().iter().map(String::as_str).collect();

    if json {
        let out: Vec<GroupRow> = summary
            .iter()
            .map(|(g, counts)| GroupRow {
                group: g.as_str(),
                size: counts.iter().sum(),
                dominant_type: summary.dominant_type(g).map(String::as_str),
                counts: types.iter().copied().zip(counts.iter().copied()).collect(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("{}", style("Group Summary").bold().cyan());
    println!("{}", style("─".repeat(60)).dim());
    println!(
        "  {} samples, {} groups, {} types (policy: {})",
        summary.n_samples(),
        summary.n_groups(),
        summary.n_types(),
        policy
    );
    println!();

    let width = types.iter().map(|t| t.len()).max().unwrap_or(0).max(6);
    let gwidth = summary.groups().map(|g| g.len()).max().unwrap_or(0).max(8);
    let mut header = format!("  {:<gw$}{:>7}", rows.group_column, "Size", gw = gwidth);
    for t in &types {
        header.push_str(&format!("{:>w$}", t, w = width + 1));
    }
    println!("{}", style(header).underlined());

    for (g, counts) in summary.iter() {
        let mut row = format!("  {:<gw$}{:>7}", g, counts.iter().sum::<usize>(), gw = gwidth);
        for c in counts {
            row.push_str(&format!("{:>w$}", c, w = width + 1));
        }
        println!("{}", row);
    }

    let mut total = format!("  {:<gw$}{:>7}", "total", summary.n_samples(), gw = gwidth);
    for c in summary.global_counts() {
        total.push_str(&format!("{:>w$}", c, w = width + 1));
    }
    println!("{}", style(total).dim());
    println!();

    let impure = summary.impure_groups();
    if !impure.is_empty() {
        println!(
            "  {} {} groups mix several types; use --policy majority to count them by their dominant type",
            style("ℹ").blue(),
            impure.len()
        );
        println!();
    }

    Ok(())
}

// ============================================================================
// CONFIG COMMANDS
// ============================================================================

fn config_set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;
    println!("{} Set {} = {}", style("✓").green(), key, value);
    Ok(())
}

fn config_get(key: &str) -> Result<()> {
    let config = Config::load()?;
    let value = config.get(key)?;
    println!("{}", value.as_deref().unwrap_or("(not set)"));
    Ok(())
}

fn config_list() -> Result<()> {
    let config = Config::load()?;

    println!();
    println!("{}", style("Configuration").bold().cyan());
    println!("{}", style("─".repeat(40)).dim());
    println!();
    for key in config::KEYS {
        println!(
            "  {:<14}  {}",
            format!("{}:", key),
            config.get(key)?.as_deref().unwrap_or("(not set)")
        );
    }
    println!();
    println!("  Config file: {}", Config::path()?.display());
    println!();

    Ok(())
}

fn config_path() -> Result<()> {
    println!("{}", Config::path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_args() -> SplitArgs {
        SplitArgs { n_splits: None, seed: None, strategy: None, policy: None, tolerance: None }
    }

    #[test]
    fn test_cli_parses_split() {
        let cli = Cli::try_parse_from([
            "typefold", "split", "trials.csv", "-k", "4", "--strategy", "round-robin", "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Split { input, split, json, show_groups } => {
                assert_eq!(input.input, PathBuf::from("trials.csv"));
                assert_eq!(split.n_splits, Some(4));
                assert_eq!(split.strategy, Some(AssignStrategy::RoundRobin));
                assert!(json);
                assert!(!show_groups);
            }
            _ => panic!("expected split command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_strategy() {
        assert!(Cli::try_parse_from(["typefold", "split", "x.csv", "--strategy", "random"]).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        config.set("n-splits", "10").unwrap();
        config.set("seed", "3").unwrap();

        let mut args = split_args();
        args.n_splits = Some(4);
        let split = resolve_split_config(&config, &args).unwrap();

        assert_eq!(split.n_splits, 4);
        assert_eq!(split.seed, Some(3));
        assert_eq!(split.strategy, AssignStrategy::Balanced);
    }

    #[test]
    fn test_invalid_fold_count_rejected() {
        let mut args = split_args();
        args.n_splits = Some(1);
        assert!(resolve_split_config(&Config::default(), &args).is_err());
    }

    #[test]
    fn test_demo_data_splits() {
        let data = test_data::generate_grouped_data(10, 500, 3, 1.0, 42);
        let folds = GroupTypeKFold::new(5).split(&data.groups, &data.group_types).unwrap();

        assert_eq!(folds.len(), 5);
        assert!(folds.iter().all(|f| f.test_groups > 0));
        assert_eq!(folds.iter().map(|f| f.test_groups).sum::<usize>(), 10);
    }
}
