use rand::Rng;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Result;
use crate::error::RingError;

pub type Value = i32;
pub type Score = i64;

/// Inclusive range of generated values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: Value,
    pub max: Value,
}

impl ValueRange {
    pub fn new(min: Value, max: Value) -> Result<Self> {
        if min > max {
            return Err(RingError::EmptyValueRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, value: Value) -> bool {
        self.min <= value && value <= self.max
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        Self { min: 0, max: 9 }
    }
}

/// The part of the matrices owned by one rank: one row of A and one
/// column of B. The column is overwritten whenever it is rotated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalVectorStore {
    row: Vec<Value>,
    col: Vec<Value>,
}

impl LocalVectorStore {
    pub fn new(row: Vec<Value>, col: Vec<Value>) -> Result<Self> {
        if row.len() != col.len() {
            return Err(RingError::PayloadLength {
                len: col.len(),
                size: row.len(),
            });
        }
        Ok(Self { row, col })
    }

    pub fn generate<R: Rng>(size: usize, range: &ValueRange, rng: &mut R) -> Self {
        let mut random_vector =
            || -> Vec<Value> { (0..size).map(|_| rng.gen_range(range.min..=range.max)).collect() };
        let row = random_vector();
        let col = random_vector();
        Self { row, col }
    }

    pub fn len(&self) -> usize {
        self.row.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row.is_empty()
    }

    pub fn row(&self) -> &[Value] {
        &self.row
    }

    pub fn col(&self) -> &[Value] {
        &self.col
    }

    pub fn col_mut(&mut self) -> &mut [Value] {
        &mut self.col
    }

    /// `sum_k(row[k] + col[k])` over the current column.
    pub fn score(&self) -> Score {
        self.row
            .iter()
            .zip(self.col.iter())
            .map(|(a, b)| *a as Score + *b as Score)
            .sum()
    }
}
