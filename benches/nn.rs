#![allow(mixed_script_confusables)]
#![allow(confusable_idents)]

use criterion::Criterion;
use ladder::{activate::sigmoid, random::default_rng, Network, Span, Topology};

fn bench_nn(bench: &mut Criterion) {
    let mut rng = default_rng();
    let connect4 = Network::random(Topology::new(2, 64, 64, 8).unwrap(), &Span::unit(), &mut rng);
    let board: Vec<f64> = (0..64).map(|i| (i % 3) as f64).collect();
    bench.bench_function("forward-connect4", |b| {
        b.iter(|| connect4.forward(&board, sigmoid))
    });

    let battle = Network::random(Topology::new(1, 6, 6, 9).unwrap(), &Span::unit(), &mut rng);
    let fighters = [1., 1., 0., 0.75, 0.5, 5.];
    bench.bench_function("forward-battle", |b| {
        b.iter(|| battle.forward(&fighters, sigmoid))
    });
}

pub fn benches() {
    #[cfg(not(feature = "smol_bench"))]
    let mut criterion: criterion::Criterion<_> = Criterion::default()
        .sample_size(1000)
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
    bench_nn(&mut criterion);
}

fn main() {
    benches();
    criterion::Criterion::default()
        .configure_from_args()
        .final_summary();
}
