use thiserror::Error;

use crate::communication::Rank;
use crate::parameters::ParameterError;

/// Failures of point-to-point or collective operations. All of these
/// are fatal for the whole process group.
#[derive(Error, Debug)]
pub enum CommunicationError {
    #[error("Lost connection to rank {0}")]
    Disconnected(Rank),

    #[error("Received {received} values from rank {rank}, expected {expected}")]
    LengthMismatch {
        rank: Rank,
        expected: usize,
        received: usize,
    },

    #[error("Rank {0} terminated abnormally")]
    RankPanicked(Rank),

    #[error("The communication runtime is already initialized")]
    AlreadyInitialized,
}

#[derive(Error, Debug)]
pub enum RingError {
    #[error(transparent)]
    Communication(#[from] CommunicationError),

    #[error("Contributed vector of length {len} on a ring of size {size}")]
    PayloadLength { len: usize, size: usize },

    #[error("Gather slot {slot} carries rank tag {found}")]
    TagMismatch { slot: usize, found: i64 },

    #[error("A ring needs at least one rank")]
    EmptyRing,

    #[error("Invalid shift displacement {0}, must be -1 or +1")]
    InvalidDisplacement(i32),

    #[error("Empty value range [{min}, {max}]")]
    EmptyValueRange { min: i32, max: i32 },

    #[error(transparent)]
    Parameters(#[from] ParameterError),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to set up logging: {0}")]
    Logger(#[from] log::SetLoggerError),
}

impl RingError {
    /// Errors that are only a consequence of another rank failing.
    pub fn is_secondary(&self) -> bool {
        matches!(
            self,
            RingError::Communication(CommunicationError::Disconnected(_))
        )
    }
}

pub type Result<T> = std::result::Result<T, RingError>;
