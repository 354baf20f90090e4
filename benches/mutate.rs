use criterion::Criterion;
use ladder::{
    random::{default_rng, MutationRate, Span},
    Network, Topology,
};

fn bench_mutate(bench: &mut Criterion) {
    let mut rng = default_rng();
    let span = Span::unit();
    let topology = Topology::new(2, 64, 64, 8).unwrap();
    let rate = topology.scaled_rate(0.05).unwrap();
    let mut network = Network::random(topology, &span, &mut rng);

    bench.bench_function("mutate-connect4", |b| {
        b.iter(|| network.mutate(&rate, &span, &mut rng))
    });

    let never = MutationRate::new(0.).unwrap();
    bench.bench_function("mutate-visit-only", |b| {
        b.iter(|| network.mutate(&never, &span, &mut rng))
    });

    bench.bench_function("randomize-connect4", |b| {
        b.iter(|| network.randomize(&span, &mut rng))
    });
}

pub fn benches() {
    #[cfg(not(feature = "smol_bench"))]
    let mut criterion: criterion::Criterion<_> = Criterion::default()
        .sample_size(2000)
        .significance_level(0.1);
    #[cfg(feature = "smol_bench")]
    let mut criterion: criterion::Criterion<_> = {
        use core::time::Duration;
        Criterion::default()
            .measurement_time(Duration::from_millis(1))
            .sample_size(10)
            .nresamples(1)
            .without_plots()
            .configure_from_args()
    };
    bench_mutate(&mut criterion);
}

fn main() {
    benches();
    criterion::Criterion::default()
        .configure_from_args()
        .final_summary();
}
