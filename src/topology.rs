use crate::communication::Rank;
use crate::communication::SizedCommunicator;
use crate::error::Result;
use crate::error::RingError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn displacement(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }

    pub fn from_displacement(displacement: i32) -> Result<Self> {
        match displacement {
            -1 => Ok(Direction::Left),
            1 => Ok(Direction::Right),
            d => Err(RingError::InvalidDisplacement(d)),
        }
    }
}

/// Source and destination of a shift along the ring: data moves from
/// `source` to this rank and from this rank to `destination`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shift {
    pub source: Rank,
    pub destination: Rank,
}

/// A one-dimensional periodic arrangement of all ranks, one rank per
/// ring position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RingTopology {
    rank: Rank,
    size: usize,
}

impl RingTopology {
    pub fn new(rank: Rank, size: usize) -> Self {
        debug_assert!(size >= 1);
        debug_assert!(0 <= rank && (rank as usize) < size);
        Self { rank, size }
    }

    pub fn from_communicator(communicator: &impl SizedCommunicator) -> Self {
        Self::new(communicator.rank(), communicator.size())
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn coordinate(&self) -> Rank {
        self.rank
    }

    pub fn coordinates(&self) -> [Rank; 1] {
        [self.coordinate()]
    }

    /// The rank `displacement` positions away, wrapping around.
    pub fn neighbor_at(&self, displacement: i32) -> Rank {
        (self.rank + displacement).rem_euclid(self.size as Rank)
    }

    pub fn neighbor(&self, direction: Direction) -> Rank {
        self.neighbor_at(direction.displacement())
    }

    pub fn left_neighbor(&self) -> Rank {
        self.neighbor(Direction::Left)
    }

    pub fn right_neighbor(&self) -> Rank {
        self.neighbor(Direction::Right)
    }

    /// Shifting by `displacement` sends to the rank at `+displacement`
    /// and receives from the rank at `-displacement`, so the value at
    /// position `i` ends up at position `i + displacement`.
    pub fn shift(&self, displacement: i32) -> Shift {
        Shift {
            source: self.neighbor_at(-displacement),
            destination: self.neighbor_at(displacement),
        }
    }
}
