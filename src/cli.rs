use std::path::PathBuf;

use clap::{ArgAction, Parser};
use log::LevelFilter;

#[derive(Parser)]
#[command(version, about = "Converts a grammar to Chomsky normal form and tests words with CYK")]
pub struct Cli {
    /// File containing the grammar, one `X : p1 | p2` rule per line
    pub file: PathBuf,

    /// Words to test for membership
    pub words: Vec<String>,

    /// Amount of random sentences to derive from the grammar and test (default: 0)
    #[arg(short = 'n', long, value_name = "AMOUNT")]
    pub sample: Option<usize>,

    /// Seed for the sentence sampler (default: random)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Silence all logging
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Off;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
