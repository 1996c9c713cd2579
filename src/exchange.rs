use crate::communication::Rank;
use crate::communication::WorldCommunicator;
use crate::error::Result;
use crate::rank_debug;
use crate::rank_trace;
use crate::topology::RingTopology;
use crate::topology::Shift;
use crate::vectors::LocalVectorStore;
use crate::vectors::Score;
use crate::vectors::Value;

/// The largest score seen so far. Starts below every possible score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunningMaximum(Score);

impl Default for RunningMaximum {
    fn default() -> Self {
        Self(Score::MIN)
    }
}

impl RunningMaximum {
    /// Returns whether `score` is the new maximum.
    pub fn update(&mut self, score: Score) -> bool {
        if score > self.0 {
            self.0 = score;
            true
        } else {
            false
        }
    }

    pub fn value(&self) -> Score {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExchangeState {
    Round(usize),
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExchangeOutcome {
    pub coordinate: Rank,
    pub maximum: Score,
    pub rounds: usize,
}

/// Runs one round per ring position. In each round, the score of the
/// local row and the column currently held is folded into the
/// maximum and the column is passed on along the ring. After all
/// rounds every rank has seen every column once and holds its own
/// column again.
pub struct ShiftExchange<'a, C> {
    communicator: &'a mut C,
    topology: RingTopology,
    shift: Shift,
    state: ExchangeState,
    maximum: RunningMaximum,
}

impl<'a, C> ShiftExchange<'a, C>
where
    C: WorldCommunicator<Value>,
{
    pub fn new(communicator: &'a mut C, topology: RingTopology, displacement: i32) -> Self {
        Self {
            communicator,
            shift: topology.shift(displacement),
            topology,
            state: ExchangeState::Round(0),
            maximum: RunningMaximum::default(),
        }
    }

    pub fn state(&self) -> ExchangeState {
        self.state
    }

    pub fn maximum(&self) -> RunningMaximum {
        self.maximum
    }

    /// Performs a single round and returns its score, or `None` once
    /// all rounds are done.
    pub fn step(&mut self, store: &mut LocalVectorStore) -> Result<Option<Score>> {
        let round = match self.state {
            ExchangeState::Round(round) => round,
            ExchangeState::Finished => return Ok(None),
        };
        let score = store.score();
        if self.maximum.update(score) {
            rank_trace!("Round {}: new maximum {}", round, score);
        }
        self.communicator.send_receive_replace(
            store.col_mut(),
            self.shift.destination,
            self.shift.source,
        )?;
        self.state = if round + 1 < self.topology.size() {
            ExchangeState::Round(round + 1)
        } else {
            ExchangeState::Finished
        };
        Ok(Some(score))
    }

    pub fn run(mut self, store: &mut LocalVectorStore) -> Result<ExchangeOutcome> {
        let mut rounds = 0;
        while self.step(store)?.is_some() {
            rounds += 1;
        }
        rank_debug!(
            "Exchange finished after {} rounds with maximum {}",
            rounds,
            self.maximum.value()
        );
        Ok(ExchangeOutcome {
            coordinate: self.topology.coordinate(),
            maximum: self.maximum.value(),
            rounds,
        })
    }
}
