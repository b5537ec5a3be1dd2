//! CLI entry point for the puzzle solver.
//!
//! Usage:
//!   puzzle-solver solve <board.json> [options]
//!   puzzle-solver solve --stdin --format text [options]
//!
//! Options:
//!   --format <json|text>    Input format (default: json)
//!   --config <file>         TOML solver configuration
//!   --timeout <seconds>     Maximum search time (default: 30)
//!   --no-time-limit         Search until a verdict is reached
//!   --max-expansions <n>    Stop after n main-lane expansions
//!   --policy <p>            Duplicate policy: first-seen or reopen (default)
//!   --no-path               Omit the solution boards from the report
//!
//! Exit status is 0 for a solved board, 1 for an unsolvable or inconclusive
//! one, and 2 when the input or configuration can't be read.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use puzzle_solver::{
    Board, BoardError, ConfigError, DuplicatePolicy, LaneStats, Solver, SolverConfig,
    Termination, Verdict,
};

#[derive(Parser)]
#[command(name = "puzzle-solver")]
#[command(about = "Shortest solutions for sliding-tile puzzles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a board, or prove it unsolvable
    Solve {
        /// Path to the board file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read the board from stdin instead of a file
        #[arg(long)]
        stdin: bool,

        /// Board file format
        #[arg(long, value_enum, default_value_t = InputFormat::Json)]
        format: InputFormat,

        /// TOML solver configuration; flags below override it
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Maximum search time in seconds
        #[arg(long, conflicts_with = "no_time_limit")]
        timeout: Option<u64>,

        /// Disable the search time ceiling
        #[arg(long)]
        no_time_limit: bool,

        /// Maximum node expansions in the main search lane
        #[arg(long)]
        max_expansions: Option<usize>,

        /// How to treat states that were already enqueued
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,

        /// Leave the solution boards out of the report
        #[arg(long)]
        no_path: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    /// Array of rows, e.g. [[1,2,3],[4,5,6],[7,8,0]]
    Json,
    /// Dimension followed by the tiles, whitespace separated
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    FirstSeen,
    Reopen,
}

impl From<PolicyArg> for DuplicatePolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::FirstSeen => DuplicatePolicy::FirstSeen,
            PolicyArg::Reopen => DuplicatePolicy::Reopen,
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("must provide either a file path or --stdin")]
    MissingInput,

    #[error("failed to read {source_name}: {source}")]
    Io {
        source_name: String,
        source: io::Error,
    },

    #[error("invalid board JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid board: {0}")]
    Board(#[from] BoardError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Report printed for every solve
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    solvable: bool,
    verdict: Verdict,
    termination: Termination,
    #[serde(skip_serializing_if = "Option::is_none")]
    moves: Option<usize>,
    /// Independent inversion-parity answer, for comparison
    parity_check: bool,
    time_elapsed_ms: u64,
    nodes_expanded: usize,
    nodes_enqueued: usize,
    search: SearchOutput,
    #[serde(skip_serializing_if = "Option::is_none")]
    solution: Option<Vec<BoardOutput>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchOutput {
    iterations: usize,
    main: LaneStats,
    twin: LaneStats,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BoardOutput {
    tiles: Vec<Vec<u16>>,
    manhattan: u32,
    hamming: u32,
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    match run(cli) {
        Ok(verdict) => {
            if verdict == Verdict::Solvable {
                process::exit(0);
            } else {
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("puzzle_solver=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<Verdict, CliError> {
    match cli.command {
        Commands::Solve {
            file,
            stdin,
            format,
            config,
            timeout,
            no_time_limit,
            max_expansions,
            policy,
            no_path,
        } => {
            let content = read_input(file, stdin)?;
            let board = match format {
                InputFormat::Json => serde_json::from_str::<Board>(&content)?,
                InputFormat::Text => content.parse::<Board>()?,
            };

            let mut solver_config = match config {
                Some(path) => SolverConfig::load(path)?,
                None => SolverConfig::default(),
            };
            if no_time_limit {
                solver_config.time_limit_secs = None;
            } else if timeout.is_some() {
                solver_config.time_limit_secs = timeout;
            }
            if max_expansions.is_some() {
                solver_config.max_expansions = max_expansions;
            }
            if let Some(policy) = policy {
                solver_config.duplicate_policy = policy.into();
            }

            let parity_check = board.is_solvable_by_parity();
            let solver = Solver::with_config(board, &solver_config);
            let output = format_result(&solver, parity_check, !no_path);

            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(solver.verdict())
        }
    }
}

fn read_input(file: Option<PathBuf>, stdin: bool) -> Result<String, CliError> {
    if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|source| CliError::Io {
                source_name: "stdin".to_string(),
                source,
            })?;
        Ok(buffer)
    } else if let Some(path) = file {
        fs::read_to_string(&path).map_err(|source| CliError::Io {
            source_name: path.display().to_string(),
            source,
        })
    } else {
        Err(CliError::MissingInput)
    }
}

fn format_result(solver: &Solver<Board>, parity_check: bool, with_path: bool) -> SolveOutput {
    let stats = solver.stats();
    let solution = if with_path {
        solver.solution().map(|path| {
            path.iter()
                .map(|b| BoardOutput {
                    tiles: b.rows(),
                    manhattan: b.manhattan(),
                    hamming: b.hamming(),
                })
                .collect()
        })
    } else {
        None
    };

    SolveOutput {
        solvable: solver.is_solvable(),
        verdict: solver.verdict(),
        termination: solver.termination(),
        moves: solver.moves(),
        parity_check,
        time_elapsed_ms: stats.elapsed.as_millis() as u64,
        nodes_expanded: stats.main.expanded + stats.twin.expanded,
        nodes_enqueued: stats.main.enqueued + stats.twin.enqueued,
        search: SearchOutput {
            iterations: stats.iterations,
            main: stats.main.clone(),
            twin: stats.twin.clone(),
        },
        solution,
    }
}
