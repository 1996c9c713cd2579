use ringmax::communication::MpiEnvironment;
use ringmax::communication::MpiWorld;
use ringmax::communication::SizedCommunicator;
use ringmax::communication::WorldCommunicator;
use ringmax::communication::WorldRank;
use ringmax::exchange::ShiftExchange;
use ringmax::gather::gather_labeled;
use ringmax::rank_log;
use ringmax::topology::RingTopology;
use ringmax::vectors::LocalVectorStore;
use ringmax::vectors::Score;
use ringmax::vectors::Value;

// An MPI test written as an example, since cargo test cannot be run
// under mpirun. Run with e.g.
// mpirun -n 4 cargo run --example mpi_test --features mpi_test

fn main() {
    let environment = MpiEnvironment::initialize().unwrap();
    let mut world = environment.world::<Value>(0);
    rank_log::initialize(WorldRank(world.rank()));
    test_send_receive_replace(&mut world);
    test_gather_labeled(&mut world);
    test_exchange(&mut world);
    if world.is_main() {
        println!("mpi_test passed on {} ranks", world.size());
    }
}

fn test_send_receive_replace(world: &mut MpiWorld<Value>) {
    let topology = RingTopology::from_communicator(&*world);
    let shift = topology.shift(-1);
    let mut buffer = vec![world.rank(); 3];
    world
        .send_receive_replace(&mut buffer, shift.destination, shift.source)
        .unwrap();
    assert_eq!(buffer, vec![shift.source; 3]);
}

fn test_gather_labeled(world: &mut MpiWorld<Value>) {
    let size = world.size();
    let payload: Vec<Value> = (0..size as Value).map(|i| i * world.rank()).collect();
    let gathered = gather_labeled(world, &payload).unwrap();
    if world.is_main() {
        let gathered = gathered.unwrap();
        assert_eq!(gathered.len(), size * (size + 1));
        for (rank, contribution) in gathered.contributions() {
            let expected: Vec<Value> = (0..size as Value).map(|i| i * rank).collect();
            assert_eq!(contribution, expected.as_slice());
        }
    } else {
        assert!(gathered.is_none());
    }
}

fn test_exchange(world: &mut MpiWorld<Value>) {
    let size = world.size();
    let rank = world.rank();
    let row = vec![rank; size];
    let col: Vec<Value> = (0..size).map(|_| rank * 10).collect();
    let mut store = LocalVectorStore::new(row, col.clone()).unwrap();
    let topology = RingTopology::from_communicator(&*world);
    let outcome = ShiftExchange::new(world, topology, -1)
        .run(&mut store)
        .unwrap();
    let best_col = (size as Score - 1) * 10 * size as Score;
    assert_eq!(outcome.maximum, rank as Score * size as Score + best_col);
    assert_eq!(outcome.rounds, size);
    assert_eq!(store.col(), col.as_slice());
}
