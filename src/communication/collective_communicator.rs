use super::Count;
use crate::error::CommunicationError;

pub trait CollectiveCommunicator<T> {
    /// Collects `send` from every rank on the main rank. The
    /// contribution of rank `i` must have length `counts[i]` and is
    /// placed at `displacements(counts)[i]`. Every other rank gets
    /// `None`.
    fn gather_varcount(
        &mut self,
        send: &[T],
        counts: &[Count],
    ) -> Result<Option<Vec<T>>, CommunicationError>;
}

/// Offsets of packed contributions with the given counts.
pub fn displacements(counts: &[Count]) -> Vec<Count> {
    counts
        .iter()
        .scan(0, |acc, &x| {
            let tmp = *acc;
            *acc += x;
            Some(tmp)
        })
        .collect()
}
