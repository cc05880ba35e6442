//! Combinator Benchmarks
//!
//! These benchmarks track the cost of the hot paths:
//! - Handler lookup and state update in a single reducer
//! - Combining many slices when one or none of them change
//! - Normalizing plain JSON input
//!
//! Run with: `cargo bench -p redux-kit-core`

#![allow(missing_docs)] // Benchmarks don't need extensive docs
#![allow(clippy::unwrap_used)] // Benchmarks can unwrap during setup

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use redux_kit_core::{ActionCreator, CombinedReducer, HandlerReducer, Reducer, Value, create_action, normalize};
use serde_json::json;

fn counter(increment: &ActionCreator) -> HandlerReducer {
    HandlerReducer::new(Value::map([("count", 0)])).on(increment, |state, _| {
        state.update("count", |c| Value::Int(c.and_then(Value::as_i64).unwrap_or(0) + 1))
    })
}

fn wide_root(width: usize, increment: &ActionCreator) -> CombinedReducer {
    let root = (0..width).fold(CombinedReducer::new(), |root, i| {
        root.with(format!("idle_{i}"), HandlerReducer::new(json!({ "items": [1, 2, 3] })))
    });
    root.with("active", counter(increment))
}

fn benchmark_reducer_execution(c: &mut Criterion) {
    let mut group = c.benchmark_group("reducer");
    group.throughput(Throughput::Elements(1));

    let increment = create_action("increment");
    let reducer = counter(&increment);
    let state = reducer.initial_state().unwrap();
    let matched = increment.create(1);
    let unmatched = create_action("other").create(1);

    group.bench_function("matched", |b| {
        b.iter(|| reducer.reduce(Some(black_box(state.clone())), black_box(&matched)));
    });

    group.bench_function("unmatched", |b| {
        b.iter(|| reducer.reduce(Some(black_box(state.clone())), black_box(&unmatched)));
    });

    group.finish();
}

fn benchmark_combine(c: &mut Criterion) {
    let mut group = c.benchmark_group("combine");
    let increment = create_action("increment");
    let unmatched = create_action("other").create(1);
    let matched = increment.create(1);

    for width in [4_usize, 32, 256] {
        let root = wide_root(width, &increment);
        let state = root.initial_state().unwrap();
        group.throughput(Throughput::Elements(width as u64 + 1));

        group.bench_with_input(BenchmarkId::new("one_changed", width), &state, |b, state| {
            b.iter(|| root.reduce(Some(state.clone()), black_box(&matched)));
        });

        group.bench_with_input(BenchmarkId::new("none_changed", width), &state, |b, state| {
            b.iter(|| root.reduce(Some(state.clone()), black_box(&unmatched)));
        });
    }

    group.finish();
}

fn benchmark_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    let plain = json!({
        "todos": (0..100).map(|i| json!({ "id": i, "done": i % 2 == 0, "text": "write benchmarks" })).collect::<Vec<_>>(),
        "filter": "all",
    });

    group.bench_function("plain_json", |b| {
        b.iter(|| normalize(black_box(plain.clone())));
    });

    let value = normalize(plain);
    group.bench_function("already_immutable", |b| {
        b.iter(|| normalize(black_box(value.clone())));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_reducer_execution,
    benchmark_combine,
    benchmark_normalize
);
criterion_main!(benches);
