use std::marker::PhantomData;

use mpi::datatype::PartitionMut;
use mpi::environment::Universe;
use mpi::point_to_point::send_receive_replace_into_with_tags;
use mpi::point_to_point::Status;
use mpi::topology::SystemCommunicator;
use mpi::traits::Communicator;
use mpi::traits::Destination;
use mpi::traits::Equivalence;
use mpi::traits::Root;
use mpi::traits::Source;
use mpi::Tag;

use super::collective_communicator::displacements;
use super::CollectiveCommunicator;
use super::Count;
use super::Rank;
use super::SizedCommunicator;
use super::WorldCommunicator;
use super::WorldRank;
use crate::error::CommunicationError;

/// Owns the MPI universe for the lifetime of the program. MPI is
/// finalized when this is dropped, so keep it alive in `main` and
/// let every exit path (including errors) run its destructor.
pub struct MpiEnvironment {
    universe: Universe,
}

impl MpiEnvironment {
    pub fn initialize() -> Result<Self, CommunicationError> {
        mpi::initialize()
            .map(|universe| Self { universe })
            .ok_or(CommunicationError::AlreadyInitialized)
    }

    pub fn world<T>(&self, tag: Tag) -> MpiWorld<T> {
        MpiWorld::new(self.universe.world(), tag)
    }
}

#[derive(Clone)]
pub struct MpiWorld<T> {
    world: SystemCommunicator,
    _marker: PhantomData<T>,
    tag: Tag,
}

impl<T> MpiWorld<T> {
    fn new(world: SystemCommunicator, tag: Tag) -> Self {
        Self {
            world,
            tag,
            _marker: PhantomData::default(),
        }
    }

    pub fn world(&self) -> &SystemCommunicator {
        &self.world
    }
}

impl<T> WorldCommunicator<T> for MpiWorld<T>
where
    T: Equivalence,
{
    fn blocking_send_vec(&mut self, rank: Rank, data: &[T]) -> Result<(), CommunicationError> {
        let num = data.len();
        let process = self.world.process_at_rank(rank);
        process.send_with_tag(&num, self.tag);
        if num > 0 {
            process.send_with_tag(data, self.tag);
        }
        Ok(())
    }

    fn receive_vec(&mut self, rank: Rank) -> Result<Vec<T>, CommunicationError> {
        let process = self.world.process_at_rank(rank);
        let (num_received, _): (usize, Status) = process.receive_with_tag(self.tag);
        if num_received > 0 {
            let (data, _) = process.receive_vec_with_tag(self.tag);
            return Ok(data);
        }
        Ok(vec![])
    }

    fn send_receive_replace(
        &mut self,
        buffer: &mut [T],
        destination: Rank,
        source: Rank,
    ) -> Result<(), CommunicationError>
    where
        T: Clone,
    {
        let destination = self.world.process_at_rank(destination);
        let source = self.world.process_at_rank(source);
        send_receive_replace_into_with_tags(buffer, &destination, self.tag, &source, self.tag);
        Ok(())
    }
}

impl<T> SizedCommunicator for MpiWorld<T> {
    fn rank(&self) -> Rank {
        self.world.rank()
    }

    fn size(&self) -> usize {
        self.world.size() as usize
    }
}

impl<T: Equivalence + Clone + Default> CollectiveCommunicator<T> for MpiWorld<T> {
    fn gather_varcount(
        &mut self,
        send: &[T],
        counts: &[Count],
    ) -> Result<Option<Vec<T>>, CommunicationError> {
        let root = self.world.process_at_rank(WorldRank::main());
        if !self.is_main() {
            root.gather_varcount_into(send);
            return Ok(None);
        }
        let displacements = displacements(counts);
        let total = counts.iter().map(|x| *x as usize).sum();
        let mut result_buffer = vec![T::default(); total];
        {
            let mut partition = PartitionMut::new(&mut result_buffer[..], counts, &displacements[..]);
            root.gather_varcount_into_root(send, &mut partition);
        }
        Ok(Some(result_buffer))
    }
}
