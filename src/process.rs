use std::io::Write;

use crate::communication::CollectiveCommunicator;
use crate::communication::SizedCommunicator;
use crate::communication::WorldCommunicator;
use crate::error::Result;
use crate::exchange::ExchangeOutcome;
use crate::exchange::ShiftExchange;
use crate::gather::gather_labeled;
use crate::gather::GatherBuffer;
use crate::main_info;
use crate::parameters::RunParameters;
use crate::rank_debug;
use crate::report::format_result;
use crate::report::write_matrices;
use crate::topology::RingTopology;
use crate::vectors::LocalVectorStore;
use crate::vectors::Value;

/// The full matrices, as assembled on the main rank.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssembledMatrices {
    pub a_rows: GatherBuffer,
    pub b_cols: GatherBuffer,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub exchange: ExchangeOutcome,
    pub matrices: Option<AssembledMatrices>,
}

/// Collects the rows of A and then the columns of B on the main rank.
pub fn assemble_matrices<C>(
    communicator: &mut C,
    store: &LocalVectorStore,
) -> Result<Option<AssembledMatrices>>
where
    C: CollectiveCommunicator<Value> + SizedCommunicator,
{
    let a_rows = gather_labeled(communicator, store.row())?;
    let b_cols = gather_labeled(communicator, store.col())?;
    Ok(a_rows
        .zip(b_cols)
        .map(|(a_rows, b_cols)| AssembledMatrices { a_rows, b_cols }))
}

/// Runs the whole program for one rank on an existing store: the main
/// rank prints both matrices, then every rank takes part in the ring
/// exchange and prints its maximum.
pub fn run_with_store<C, W>(
    communicator: &mut C,
    parameters: &RunParameters,
    mut store: LocalVectorStore,
    out: &mut W,
) -> Result<ProcessOutcome>
where
    C: CollectiveCommunicator<Value> + WorldCommunicator<Value> + SizedCommunicator,
    W: Write,
{
    let matrices = assemble_matrices(communicator, &store)?;
    if let Some(matrices) = &matrices {
        main_info!("Assembled {}x{} matrices", store.len(), store.len());
        if parameters.print_matrices {
            write_matrices(out, &matrices.a_rows, &matrices.b_cols)?;
            out.flush()?;
        }
    }
    let topology = RingTopology::from_communicator(communicator);
    let direction = parameters.direction()?;
    rank_debug!(
        "Ring neighbors: left {}, right {}",
        topology.left_neighbor(),
        topology.right_neighbor()
    );
    let exchange = ShiftExchange::new(communicator, topology, direction.displacement())
        .run(&mut store)?;
    writeln!(out, "{}", format_result(&exchange, parameters.result_format))?;
    Ok(ProcessOutcome { exchange, matrices })
}

/// Generates this rank's row and column and runs the program.
pub fn run_process<C, W>(
    communicator: &mut C,
    parameters: &RunParameters,
    out: &mut W,
) -> Result<ProcessOutcome>
where
    C: CollectiveCommunicator<Value> + WorldCommunicator<Value> + SizedCommunicator,
    W: Write,
{
    let range = parameters.value_range()?;
    let mut rng = parameters.rng_for_rank(communicator.rank());
    let store = LocalVectorStore::generate(communicator.size(), &range, &mut rng);
    rank_debug!("Row {:?}, column {:?}", store.row(), store.col());
    run_with_store(communicator, parameters, store, out)
}

#[cfg(test)]
mod tests {
    use super::run_process;
    use super::run_with_store;
    use crate::communication::run_local;
    use crate::communication::LocalCommunicator;
    use crate::communication::SizedCommunicator;
    use crate::parameters::RunParameters;
    use crate::report::ResultFormat;
    use crate::vectors::LocalVectorStore;

    /// Row r of A is all r, column r of B is all 10 * r.
    fn store_for(rank: i32, size: usize) -> LocalVectorStore {
        LocalVectorStore::new(vec![rank; size], vec![10 * rank; size]).unwrap()
    }

    #[test]
    fn three_ranks_end_to_end() {
        let size = 3;
        let results = run_local(size, move |mut communicator: LocalCommunicator<i32>| {
            let store = store_for(communicator.rank(), size);
            let mut out = vec![];
            let outcome =
                run_with_store(&mut communicator, &RunParameters::default(), store, &mut out)?;
            Ok((outcome, String::from_utf8(out).unwrap()))
        })
        .unwrap();
        for (rank, (outcome, text)) in results.into_sorted() {
            // Best column is the one of rank 2: 3 * (rank + 20)
            assert_eq!(outcome.exchange.maximum, 3 * (rank as i64 + 20));
            assert_eq!(outcome.exchange.rounds, size);
            assert_eq!(outcome.exchange.coordinate, rank);
            let result_line = format!("proc {}: {}\n", rank, 3 * (rank + 20));
            if rank == 0 {
                let matrices = outcome.matrices.unwrap();
                assert_eq!(matrices.a_rows.len(), 12);
                assert_eq!(matrices.b_cols.len(), 12);
                let expected = "Matrix A\n\
                                0 [0, 0, 0]\n\
                                1 [1, 1, 1]\n\
                                2 [2, 2, 2]\n\
                                Matrix B\n \
                                0  1  2 \n\
                                [0, 10, 20]\n\
                                [0, 10, 20]\n\
                                [0, 10, 20]\n";
                assert_eq!(text, format!("{}{}", expected, result_line));
            } else {
                assert!(outcome.matrices.is_none());
                assert_eq!(text, result_line);
            }
        }
    }

    #[test]
    fn single_rank_is_its_own_ring() {
        let results = run_local(1, |mut communicator: LocalCommunicator<i32>| {
            let parameters = RunParameters {
                print_matrices: false,
                result_format: ResultFormat::Coordinates,
                ..Default::default()
            };
            let store = LocalVectorStore::new(vec![4], vec![5])?;
            let mut out = vec![];
            let outcome = run_with_store(&mut communicator, &parameters, store, &mut out)?;
            Ok((outcome, String::from_utf8(out).unwrap()))
        })
        .unwrap();
        let (outcome, text) = results.into_sorted().next().unwrap().1;
        assert_eq!(outcome.exchange.maximum, 9);
        assert_eq!(outcome.exchange.rounds, 1);
        assert_eq!(text, "Process [0]: 9\n");
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let run = || {
            run_local(4, |mut communicator: LocalCommunicator<i32>| {
                let parameters = RunParameters {
                    seed: Some(5),
                    print_matrices: false,
                    ..Default::default()
                };
                run_process(&mut communicator, &parameters, &mut std::io::sink())
            })
            .unwrap()
            .into_sorted()
            .map(|(_, outcome)| outcome)
            .collect::<Vec<_>>()
        };
        let first = run();
        assert_eq!(first, run());
        let matrices = first[0].matrices.as_ref().unwrap();
        for (rank, row) in matrices.a_rows.contributions() {
            assert_eq!(row.len(), 4);
            assert!(row.iter().all(|v| (0..=9).contains(v)));
            assert_eq!(rank, matrices.b_cols.contribution(rank as usize).0);
        }
    }

    #[test]
    fn maximum_matches_direct_computation() {
        let size = 6;
        let results = run_local(size, move |mut communicator: LocalCommunicator<i32>| {
            let parameters = RunParameters {
                seed: Some(99),
                print_matrices: false,
                ..Default::default()
            };
            run_process(&mut communicator, &parameters, &mut std::io::sink())
        })
        .unwrap();
        let outcomes: Vec<_> = results.into_sorted().map(|(_, o)| o).collect();
        let matrices = outcomes[0].matrices.as_ref().unwrap();
        let col_sums: Vec<i64> = matrices
            .b_cols
            .contributions()
            .map(|(_, col)| col.iter().map(|v| *v as i64).sum())
            .collect();
        let best_col = *col_sums.iter().max().unwrap();
        for (rank, row) in matrices.a_rows.contributions() {
            let row_sum: i64 = row.iter().map(|v| *v as i64).sum();
            assert_eq!(outcomes[rank as usize].exchange.maximum, row_sum + best_col);
        }
    }
}
