use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use games::{NimGame, TicTacToe, XorRollout};
use mcts::{Game, Manager, SearchConfig, SearchMode, UniformRollout};
use rand::Rng;

pub fn criterion_benchmark(criterion: &mut Criterion) {
    let mut rng = rand::thread_rng();
    for mode in [SearchMode::Incremental, SearchMode::Recompute] {
        criterion.bench_function(&format!("nim search {mode:?}"), |b| {
            b.iter(|| {
                let state = NimGame::new([3, 4, 5]).unwrap().with_seed(rng.gen()).start();
                let config = SearchConfig::default().with_mode(mode);
                let mut manager = Manager::new(state, config, XorRollout);
                black_box(manager.search())
            });
        });
    }
    criterion.bench_function("tictactoe search", |b| {
        b.iter(|| {
            let state = TicTacToe::new(rng.gen()).start();
            let mut manager = Manager::new(state, SearchConfig::default(), UniformRollout);
            black_box(manager.search())
        });
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(50).warm_up_time(Duration::from_secs(5));
    targets = criterion_benchmark
}
criterion_main!(benches);
