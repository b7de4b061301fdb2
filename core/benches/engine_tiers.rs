use criterion::{Criterion, criterion_group, criterion_main};
use rowswap_core::*;
use std::hint::black_box;

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for mode in Mode::ALL {
        for size in BoardSize::ALL {
            group.bench_function(format!("{mode}-{size}"), |b| {
                let mut seed = 0u64;
                b.iter(|| {
                    seed += 1;
                    black_box(generate(mode, size, None, black_box(seed)))
                })
            });
        }
    }
    group.finish();
}

fn bench_presses(c: &mut Criterion) {
    let board = generate(Mode::Pattern, BoardSize::SIX, None, 42);
    let config = RoundConfig::new(Mode::Pattern, BoardSize::SIX);

    c.bench_function("press/select-swap-6x6", |b| {
        b.iter_batched(
            || PlayEngine::new(config, board.clone(), 42),
            |mut engine| {
                for index in 0..BoardSize::SIX.tile_count() - 1 {
                    engine.press(black_box(index));
                    engine.press(black_box(index + 1));
                }
                engine
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_completion(c: &mut Criterion) {
    let board = Board::solved(Mode::Pattern, BoardSize::SIX);
    c.bench_function("board_complete/pattern-6x6", |b| {
        b.iter(|| board_complete(black_box(&board), Mode::Pattern))
    });
}

criterion_group!(benches, bench_generate, bench_presses, bench_completion);
criterion_main!(benches);
