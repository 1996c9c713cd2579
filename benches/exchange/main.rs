use criterion::criterion_group;
use criterion::criterion_main;
use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::Throughput;
use ringmax::communication::run_local;
use ringmax::communication::LocalCommunicator;
use ringmax::communication::SizedCommunicator;
use ringmax::exchange::ShiftExchange;
use ringmax::parameters::RunParameters;
use ringmax::process::run_process;
use ringmax::topology::RingTopology;
use ringmax::vectors::LocalVectorStore;
use ringmax::vectors::Value;

const RING_SIZES: [usize; 3] = [2, 8, 32];

fn exchange(num_ranks: usize) {
    run_local(num_ranks, |mut communicator: LocalCommunicator<Value>| {
        let size = communicator.size();
        let rank = communicator.rank();
        let mut store = LocalVectorStore::new(vec![rank; size], vec![rank; size])?;
        let topology = RingTopology::from_communicator(&communicator);
        ShiftExchange::new(&mut communicator, topology, -1).run(&mut store)
    })
    .unwrap();
}

fn full_process(num_ranks: usize) {
    let parameters = RunParameters {
        seed: Some(0),
        print_matrices: false,
        ..Default::default()
    };
    run_local(num_ranks, move |mut communicator: LocalCommunicator<Value>| {
        run_process(&mut communicator, &parameters, &mut std::io::sink())
    })
    .unwrap();
}

pub fn exchange_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("exchange");
    group.noise_threshold(0.05);
    for num_ranks in RING_SIZES {
        group.throughput(Throughput::Elements((num_ranks * num_ranks) as u64));
        group.bench_with_input(
            BenchmarkId::new("shift_exchange", num_ranks),
            &num_ranks,
            |b, num_ranks| b.iter(|| exchange(*num_ranks)),
        );
        group.bench_with_input(
            BenchmarkId::new("run_process", num_ranks),
            &num_ranks,
            |b, num_ranks| b.iter(|| full_process(*num_ranks)),
        );
    }
    group.finish();
}

criterion_group!(benches, exchange_benchmark);
criterion_main!(benches);
