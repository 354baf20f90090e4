use criterion::Criterion;
use ladder::random::{seed_urandom, Draw, WyRng};
use rand::{
    rngs::{StdRng, ThreadRng},
    RngCore, SeedableRng,
};

fn bench_threadrng(bench: &mut Criterion) {
    let mut rng = ThreadRng::default();

    bench.bench_function("random-threadrng", |b| {
        b.iter(|| rng.next_u64());
    });
}

fn bench_stdrng(bench: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(seed_urandom().unwrap());

    bench.bench_function("random-stdrng", |b| {
        b.iter(|| rng.next_u64());
    });
}

fn bench_wyhash(bench: &mut Criterion) {
    let mut rng = WyRng::seeded(seed_urandom().unwrap());

    bench.bench_function("random-wyhash", |b| {
        b.iter(|| rng.next_u64());
    });

    bench.bench_function("random-wyhash-uniform-in", |b| {
        b.iter(|| rng.uniform_in(-1., 1.));
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
    bench_threadrng(&mut criterion);
    bench_stdrng(&mut criterion);
    bench_wyhash(&mut criterion);
}

fn main() {
    benches();
    criterion::Criterion::default()
        .configure_from_args()
        .final_summary();
}
