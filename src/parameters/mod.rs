use std::path::Path;
use std::path::PathBuf;

use derive_custom::ring_parameters;
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

mod parameter_file_contents;

pub use parameter_file_contents::Override;
pub use parameter_file_contents::ParameterFileContents;

use crate::communication::Rank;
use crate::error::Result;
use crate::report::ResultFormat;
use crate::topology::Direction;
use crate::vectors::Value;
use crate::vectors::ValueRange;

#[derive(Error, Debug)]
pub enum ParameterError {
    #[error("Failed to read parameter file at {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse parameter file: {0}")]
    Parse(serde_yaml::Error),

    #[error("Parameter file is not a mapping of named sections")]
    NotAMapping,

    #[error("Failed to read parameter file section \"{section}\": {source}")]
    Section {
        section: String,
        source: serde_yaml::Error,
    },

    #[error("Invalid parameter override \"{0}\", expected section.key=value")]
    InvalidOverride(String),
}

/// Settings of a run.
#[ring_parameters("ring")]
#[serde(default)]
pub struct RunParameters {
    /// Smallest value that is generated for the matrices.
    pub min_value: Value,
    /// Largest value that is generated for the matrices.
    pub max_value: Value,
    /// If given, rank `r` seeds its generator with `seed + r`, which
    /// makes runs reproducible. Otherwise every rank draws its seed
    /// from the OS.
    pub seed: Option<u64>,
    /// Step by which the columns move along the ring in each round.
    /// Either -1 or 1.
    pub shift_displacement: i32,
    /// Print both matrices on the main rank before the exchange.
    pub print_matrices: bool,
    pub result_format: ResultFormat,
}

impl Default for RunParameters {
    fn default() -> Self {
        Self {
            min_value: 0,
            max_value: 9,
            seed: None,
            shift_displacement: -1,
            print_matrices: true,
            result_format: ResultFormat::Rank,
        }
    }
}

impl RunParameters {
    pub fn value_range(&self) -> Result<ValueRange> {
        ValueRange::new(self.min_value, self.max_value)
    }

    pub fn direction(&self) -> Result<Direction> {
        Direction::from_displacement(self.shift_displacement)
    }

    pub fn validate(&self) -> Result<()> {
        self.value_range()?;
        self.direction()?;
        Ok(())
    }

    pub fn rng_for_rank(&self, rank: Rank) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(rank as u64)),
            None => StdRng::from_entropy(),
        }
    }
}

/// Reads the run parameters from the (optional) parameter file and
/// applies the overrides, given as `section.key=value`.
pub fn read_parameters(path: Option<&Path>, overrides: &[String]) -> Result<RunParameters> {
    let mut contents = match path {
        Some(path) => ParameterFileContents::from_file(path)?,
        None => ParameterFileContents::new("")?,
    };
    let overrides = overrides
        .iter()
        .map(|o| Override::parse(o))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    contents.with_overrides(overrides);
    let parameters: RunParameters = contents.extract_parameter_struct()?;
    parameters.validate()?;
    debug!("Run parameters: {:?}", parameters);
    Ok(parameters)
}
