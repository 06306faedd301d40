//! joinstat - hash join and selectivity estimation over relation files

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use joinstat::executor::{collect_tuples, Executor, HashJoinExecutor, Operator, ValuesExecutor};
use joinstat::expression::{ComparisonOp, JoinPredicate};
use joinstat::statistics::ColumnStatistics;
use log::info;
use std::path::{Path, PathBuf};

/// joinstat - Join relations and estimate predicate selectivity
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Equi-join two relation files with an in-memory hash join
    Join {
        /// Build-side relation
        left: PathBuf,

        /// Probe-side relation
        right: PathBuf,

        /// Join column of the left relation
        #[arg(short = 'l', long, default_value = "0")]
        left_field: usize,

        /// Join column of the right relation
        #[arg(short = 'r', long, default_value = "0")]
        right_field: usize,

        /// Table alias prefixed to the left relation's column names
        #[arg(long)]
        left_alias: Option<String>,

        /// Table alias prefixed to the right relation's column names
        #[arg(long)]
        right_alias: Option<String>,
    },

    /// Estimate the selectivity of `column OP value` from a histogram
    Estimate {
        /// Relation file
        file: PathBuf,

        /// Int column to summarize
        #[arg(short, long, default_value = "0")]
        field: usize,

        /// Number of histogram buckets
        #[arg(short, long, default_value = "10")]
        buckets: usize,

        /// Comparison operator (=, !=, <, <=, >, >=)
        #[arg(short, long, default_value = "=")]
        op: ComparisonOp,

        /// Constant to compare against
        #[arg(short, long, allow_negative_numbers = true)]
        value: i32,

        /// Print the histogram buckets
        #[arg(long)]
        show_histogram: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match args.command {
        Command::Join {
            left,
            right,
            left_field,
            right_field,
            left_alias,
            right_alias,
        } => {
            let left = load_relation(&left)?.with_alias(left_alias.as_deref());
            let right = load_relation(&right)?.with_alias(right_alias.as_deref());
            run_join(left, right, left_field, right_field)
        }
        Command::Estimate {
            file,
            field,
            buckets,
            op,
            value,
            show_histogram,
        } => {
            let mut relation = load_relation(&file)?;
            let stats = ColumnStatistics::collect(&mut relation, field, buckets)
                .context("Failed to collect column statistics")?;
            info!(
                "column {}: {} rows, {} nulls",
                field,
                stats.row_count(),
                stats.null_count()
            );

            if show_histogram {
                if let Some(histogram) = stats.histogram() {
                    print!("{}", histogram);
                }
            }
            println!("{:.6}", stats.estimate_selectivity(op, value));
            Ok(())
        }
    }
}

fn load_relation(path: &Path) -> Result<ValuesExecutor> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    ValuesExecutor::parse(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn run_join(
    left: ValuesExecutor,
    right: ValuesExecutor,
    left_field: usize,
    right_field: usize,
) -> Result<()> {
    let join = HashJoinExecutor::new(
        JoinPredicate::equals(left_field, right_field),
        Box::new(left),
        Box::new(right),
    )?;
    info!(
        "joining on {} = {}",
        join.join_field1_name().unwrap_or("null"),
        join.join_field2_name().unwrap_or("null")
    );

    let mut join = join.into_executor();
    join.open()?;
    let rows = collect_tuples(&mut join)?;
    join.close();

    println!("{}", join.output_schema());
    for row in &rows {
        println!("{}", row);
    }
    info!("{} rows", rows.len());
    Ok(())
}
