//! Distributed max-plus row evaluation on a ring of ranks.
//!
//! Every rank owns one row of a matrix A and one column of a matrix
//! B. The columns travel around a periodic ring so that each rank
//! sees every column exactly once, and each rank ends up with the
//! maximum of `sum_k(a[k] + b[k])` over all columns. Both matrices
//! are gathered on the main rank for display.

pub mod command_line_options;
pub mod communication;
pub mod error;
pub mod exchange;
pub mod gather;
pub mod logging;
pub mod parameters;
pub mod process;
pub mod rank_log;
pub mod report;
pub mod topology;
pub mod vectors;

pub use error::Result;
pub use error::RingError;

pub mod prelude {
    pub use super::communication::run_local;
    pub use super::communication::CollectiveCommunicator;
    pub use super::communication::LocalCommunicator;
    pub use super::communication::Rank;
    pub use super::communication::SizedCommunicator;
    pub use super::communication::WorldCommunicator;
    pub use super::communication::WorldRank;
    pub use super::exchange::ExchangeOutcome;
    pub use super::exchange::ShiftExchange;
    pub use super::gather::gather_labeled;
    pub use super::gather::GatherBuffer;
    pub use super::parameters::RunParameters;
    pub use super::process::run_process;
    pub use super::process::ProcessOutcome;
    pub use super::topology::Direction;
    pub use super::topology::RingTopology;
    pub use super::vectors::LocalVectorStore;
    pub use super::vectors::Value;
    pub use super::vectors::ValueRange;
}
