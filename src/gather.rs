//! Labeled collect of one vector per rank on the main rank.
//!
//! Every rank sends its payload prefixed by its own rank, so each
//! contribution is `size + 1` words long and rank `r`'s contribution
//! starts at `r * (size + 1)` in the flat buffer on the main rank.

use crate::communication::displacements;
use crate::communication::CollectiveCommunicator;
use crate::communication::Count;
use crate::communication::Rank;
use crate::communication::SizedCommunicator;
use crate::error::Result;
use crate::error::RingError;
use crate::rank_trace;
use crate::vectors::Value;

/// The payload prefixed by the rank tag.
pub fn tag_contribution(rank: Rank, payload: &[Value]) -> Vec<Value> {
    let mut send = Vec::with_capacity(payload.len() + 1);
    send.push(rank as Value);
    send.extend_from_slice(payload);
    send
}

/// The flat result of a labeled gather, only present on the main
/// rank.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatherBuffer {
    data: Vec<Value>,
    displacements: Vec<Count>,
    stride: usize,
}

impl GatherBuffer {
    pub fn new(data: Vec<Value>, num_ranks: usize) -> Self {
        let stride = num_ranks + 1;
        let counts = vec![stride as Count; num_ranks];
        Self {
            data,
            displacements: displacements(&counts),
            stride,
        }
    }

    pub fn num_ranks(&self) -> usize {
        self.displacements.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[Value] {
        &self.data
    }

    /// Index of the rank tag of the `index`-th contribution.
    pub fn offset(&self, index: usize) -> usize {
        self.displacements[index] as usize
    }

    /// The rank tag and payload of the `index`-th contribution.
    pub fn contribution(&self, index: usize) -> (Rank, &[Value]) {
        let start = self.offset(index);
        let tag = self.data[start] as Rank;
        (tag, &self.data[start + 1..start + self.stride])
    }

    /// All `(rank, payload)` pairs, ordered by contributing rank.
    pub fn contributions(&self) -> impl Iterator<Item = (Rank, &[Value])> + '_ {
        (0..self.num_ranks()).map(|index| self.contribution(index))
    }

    pub fn rank_tags(&self) -> impl Iterator<Item = Rank> + '_ {
        self.contributions().map(|(rank, _)| rank)
    }

    /// Checks that the slot of every rank carries that rank's tag.
    pub fn verify_tags(&self) -> Result<()> {
        for index in 0..self.num_ranks() {
            let slot = self.offset(index);
            let found = self.data[slot];
            if found as usize != index {
                return Err(RingError::TagMismatch {
                    slot,
                    found: found as i64,
                });
            }
        }
        Ok(())
    }
}

/// Collectively gathers `payload` from every rank onto the main rank.
/// All ranks have to call this, and every payload has to be as long
/// as there are ranks. Returns `Some` only on the main rank.
pub fn gather_labeled<C>(communicator: &mut C, payload: &[Value]) -> Result<Option<GatherBuffer>>
where
    C: CollectiveCommunicator<Value> + SizedCommunicator,
{
    let num_ranks = communicator.size();
    if payload.len() != num_ranks {
        return Err(RingError::PayloadLength {
            len: payload.len(),
            size: num_ranks,
        });
    }
    let send = tag_contribution(communicator.rank(), payload);
    let counts = vec![send.len() as Count; num_ranks];
    rank_trace!("Gathering {} values", send.len());
    let received = communicator.gather_varcount(&send, &counts)?;
    match received {
        Some(data) => {
            let buffer = GatherBuffer::new(data, num_ranks);
            buffer.verify_tags()?;
            Ok(Some(buffer))
        }
        None => Ok(None),
    }
}
