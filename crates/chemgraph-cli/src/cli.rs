use chemgraph::RingAlgorithm;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "ChemGraph CLI - inspect connectivity, rings and formulas of 2-D chemical structures.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for ring perception.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Perceive rings and print them in double-bond placement order.
    Rings(RingsArgs),
    /// Print the molecular formula of every molecule in a structure.
    Formula(FormulaArgs),
}

/// Arguments shared by every command that reads a structure.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Path to the structure description in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Arguments for the `rings` subcommand.
#[derive(Args, Debug)]
pub struct RingsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Override the ring perception algorithm from the config file.
    #[arg(short, long, value_enum, value_name = "NAME")]
    pub algorithm: Option<AlgorithmArg>,

    /// Override the working-set size above which RP-Path falls back to Figueras.
    #[arg(long, value_name = "INT")]
    pub max_sssr_atoms: Option<usize>,

    /// Also decide and print the ring side of every multiple bond.
    #[arg(long)]
    pub placements: bool,
}

/// Arguments for the `formula` subcommand.
#[derive(Args, Debug)]
pub struct FormulaArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmArg {
    /// Exact smallest set of smallest rings.
    RpPath,
    /// Fast iterative single-ring search.
    Figueras,
}

impl From<AlgorithmArg> for RingAlgorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::RpPath => RingAlgorithm::RpPath,
            AlgorithmArg::Figueras => RingAlgorithm::Figueras,
        }
    }
}
