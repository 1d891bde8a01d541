use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pprof::criterion::{Output, PProfProfiler};

use ember::ai::{BackpropKind, RolloutKind, Search, SearchParams, StopMode};
use ember::core::{DecisionTimer, GameConfig, GameState};
use ember::heuristics::EvaluatorKind;

fn search_position(config: &GameConfig, state: &GameState, iterations: u32) {
    let params = SearchParams {
        k: 1.4,
        bias: 0.5,
        rollout_depth: 12,
        discount: 0.98,
        eps: 1e-6,
        stop: StopMode::Iterations { limit: iterations },
        rollout: RolloutKind::SafeRandom,
        backprop: BackpropKind::Plain,
        evaluator: EvaluatorKind::Advanced,
        seed: 63,
    };
    let mut search = Search::new(config, state.clone(), params).unwrap();
    let timer = DecisionTimer::start(60_000.0);
    // prevent the result from being optimized away
    black_box(search.run(&timer));
}

fn search_benchmark(c: &mut Criterion) {
    let config = GameConfig::default();
    let state = GameState::new(&config);
    let iterations = 100;

    c.bench_function(&format!("search_{}_iterations", iterations), |b| {
        b.iter(|| {
            search_position(
                black_box(&config),
                black_box(&state),
                black_box(iterations),
            )
        })
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = search_benchmark
}
criterion_main!(benches);
