use derive_more::Deref;

mod collective_communicator;
mod data_by_rank;
mod local;
mod local_runner;
mod sized_communicator;
mod world_communicator;

pub use collective_communicator::displacements;
pub use collective_communicator::CollectiveCommunicator;
pub use data_by_rank::DataByRank;
pub use local::get_local_communicators;
pub use local::LocalCommunicator;
pub use local_runner::run_local;
pub use sized_communicator::SizedCommunicator;
pub use world_communicator::WorldCommunicator;

#[cfg(feature = "mpi")]
mod mpi_world;

#[cfg(feature = "mpi")]
pub use self::mpi_world::MpiEnvironment;
#[cfg(feature = "mpi")]
pub use self::mpi_world::MpiWorld;

pub type Rank = i32;
pub type Count = i32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deref, Hash)]
pub struct WorldRank(pub Rank);

impl WorldRank {
    pub fn is_main(&self) -> bool {
        self.0 == Self::main()
    }

    pub fn main() -> Rank {
        0
    }
}
