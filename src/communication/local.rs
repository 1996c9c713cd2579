use std::sync::mpsc::channel;
use std::sync::mpsc::Receiver;
use std::sync::mpsc::Sender;

use super::collective_communicator::displacements;
use super::sized_communicator::SizedCommunicator;
use super::world_communicator::WorldCommunicator;
use super::CollectiveCommunicator;
use super::Count;
use super::DataByRank;
use super::Rank;
use crate::error::CommunicationError;

/// Communicator for ranks that live as threads of the same
/// process. Every ordered pair of ranks (including a rank with
/// itself) is connected by its own unbounded channel, so sends never
/// block and messages between two ranks arrive in order.
pub struct LocalCommunicator<T> {
    senders: DataByRank<Sender<Vec<T>>>,
    receivers: DataByRank<Receiver<Vec<T>>>,
    rank: Rank,
    size: usize,
}

impl<T> LocalCommunicator<T> {
    pub fn new(
        rank: Rank,
        size: usize,
        senders: DataByRank<Sender<Vec<T>>>,
        receivers: DataByRank<Receiver<Vec<T>>>,
    ) -> Self {
        Self {
            senders,
            receivers,
            rank,
            size,
        }
    }
}

pub fn get_local_communicators<T>(num_ranks: usize) -> DataByRank<LocalCommunicator<T>> {
    let mut senders_and_receivers: Vec<Vec<_>> = (0..num_ranks)
        .map(|_| {
            (0..num_ranks)
                .map(|_| {
                    let (sender, receiver) = channel();
                    (Some(sender), Some(receiver))
                })
                .collect()
        })
        .collect();
    let mut communicators = DataByRank::empty();
    for rank in 0..num_ranks {
        let mut senders = DataByRank::empty();
        let mut receivers = DataByRank::empty();
        for rank2 in 0..num_ranks {
            // Each slot is taken exactly once: [rank][rank2] holds the
            // channel from rank to rank2.
            if let Some(sender) = senders_and_receivers[rank][rank2].0.take() {
                senders.insert(rank2 as Rank, sender);
            }
            if let Some(receiver) = senders_and_receivers[rank2][rank].1.take() {
                receivers.insert(rank2 as Rank, receiver);
            }
        }
        communicators.insert(
            rank as Rank,
            LocalCommunicator::new(rank as Rank, num_ranks, senders, receivers),
        );
    }
    communicators
}

impl<T: Clone> WorldCommunicator<T> for LocalCommunicator<T> {
    fn blocking_send_vec(&mut self, rank: Rank, data: &[T]) -> Result<(), CommunicationError> {
        self.senders
            .get(&rank)
            .ok_or(CommunicationError::Disconnected(rank))?
            .send(data.to_vec())
            .map_err(|_| CommunicationError::Disconnected(rank))
    }

    fn receive_vec(&mut self, rank: Rank) -> Result<Vec<T>, CommunicationError> {
        self.receivers
            .get(&rank)
            .ok_or(CommunicationError::Disconnected(rank))?
            .recv()
            .map_err(|_| CommunicationError::Disconnected(rank))
    }
}

impl<T> SizedCommunicator for LocalCommunicator<T> {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }
}

impl<T: Clone + Default> CollectiveCommunicator<T> for LocalCommunicator<T> {
    fn gather_varcount(
        &mut self,
        send: &[T],
        counts: &[Count],
    ) -> Result<Option<Vec<T>>, CommunicationError> {
        debug_assert_eq!(counts.len(), self.size);
        if !self.is_main() {
            let main = super::WorldRank::main();
            self.blocking_send_vec(main, send)?;
            return Ok(None);
        }
        let displacements = displacements(counts);
        let total = counts
            .iter()
            .zip(displacements.iter())
            .map(|(count, displacement)| (count + displacement) as usize)
            .max()
            .unwrap_or(0);
        let mut result = vec![T::default(); total];
        for rank in self.all_ranks() {
            let received = if rank == self.rank {
                send.to_vec()
            } else {
                self.receive_vec(rank)?
            };
            let expected = counts[rank as usize] as usize;
            if received.len() != expected {
                return Err(CommunicationError::LengthMismatch {
                    rank,
                    expected,
                    received: received.len(),
                });
            }
            let start = displacements[rank as usize] as usize;
            result[start..start + expected].clone_from_slice(&received);
        }
        Ok(Some(result))
    }
}
