use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct CommandLineOptions {
    /// Number of ranks (threads) to run the ring with.
    #[cfg(not(feature = "mpi"))]
    pub num_ranks: usize,
    pub parameter_file_path: Option<PathBuf>,
    #[clap(short, parse(from_occurrences))]
    pub verbosity: usize,
    /// Override a parameter, e.g. `--set ring.seed=4`. Can be given
    /// multiple times.
    #[clap(long = "set", short = 's')]
    pub overrides: Vec<String>,
}
