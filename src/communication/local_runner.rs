use std::sync::Arc;
use std::thread;

use log::error;

use super::local::get_local_communicators;
use super::local::LocalCommunicator;
use super::DataByRank;
use super::Rank;
use super::WorldRank;
use crate::error::CommunicationError;
use crate::error::RingError;
use crate::error::Result;
use crate::rank_log;

/// Runs `body` once per rank, each on its own thread with a connected
/// [`LocalCommunicator`], and waits for all of them. Fails if any rank
/// fails. When several ranks fail, the error reported is the one that
/// caused the others (ranks that only lost their peers are skipped).
pub fn run_local<T, R, F>(num_ranks: usize, body: F) -> Result<DataByRank<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(LocalCommunicator<T>) -> Result<R> + Send + Sync + 'static,
{
    if num_ranks == 0 {
        return Err(RingError::EmptyRing);
    }
    let body = Arc::new(body);
    let mut handles = vec![];
    for (rank, communicator) in get_local_communicators::<T>(num_ranks).into_sorted() {
        let body = body.clone();
        let handle = thread::Builder::new()
            .name(format!("rank-{}", rank))
            .spawn(move || {
                rank_log::initialize(WorldRank(rank));
                body(communicator)
            })?;
        handles.push((rank, handle));
    }
    let results: Vec<(Rank, Result<R>)> = handles
        .into_iter()
        .map(|(rank, handle)| {
            let result = handle
                .join()
                .unwrap_or_else(|_| Err(CommunicationError::RankPanicked(rank).into()));
            (rank, result)
        })
        .collect();
    collect_results(results)
}

fn collect_results<R>(results: Vec<(Rank, Result<R>)>) -> Result<DataByRank<R>> {
    let mut outcomes = DataByRank::empty();
    let mut primary: Option<RingError> = None;
    let mut secondary: Option<RingError> = None;
    for (rank, result) in results {
        match result {
            Ok(outcome) => outcomes.insert(rank, outcome),
            Err(e) => {
                error!("Rank {} failed: {}", rank, e);
                let slot = if e.is_secondary() {
                    &mut secondary
                } else {
                    &mut primary
                };
                if slot.is_none() {
                    *slot = Some(e);
                }
            }
        }
    }
    match primary.or(secondary) {
        Some(e) => Err(e),
        None => Ok(outcomes),
    }
}
