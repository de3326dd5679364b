use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use posterflow_core::{Field, HistoryStore, PosterState};

fn edited_state(i: usize) -> PosterState {
    let mut state = PosterState::default();
    state.set_field(Field::Title, &format!("Sunday Service #{i}"));
    state
}

fn bench_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("History Store");
    group.throughput(Throughput::Elements(1));

    group.bench_function("set_distinct", |b| {
        // Grows the past stack across iterations; measures push + clear cost.
        let mut store = HistoryStore::new(PosterState::default());
        let mut i = 0usize;
        b.iter(|| {
            i += 1;
            store.set(black_box(edited_state(i)));
        })
    });

    group.bench_function("set_noop_equal", |b| {
        let mut store = HistoryStore::new(edited_state(1));
        let same = edited_state(1);
        b.iter(|| {
            store.set(black_box(same.clone()));
        })
    });

    group.finish();
}

fn bench_undo_redo(c: &mut Criterion) {
    let mut group = c.benchmark_group("History Store");
    group.throughput(Throughput::Elements(2));

    group.bench_function("undo_redo_pair", |b| {
        let mut store = HistoryStore::new(PosterState::default());
        for i in 0..1000 {
            store.set(edited_state(i));
        }
        b.iter(|| {
            store.undo();
            store.redo();
        })
    });

    group.finish();
}

fn bench_apply_remote(c: &mut Criterion) {
    let mut group = c.benchmark_group("History Store");
    group.throughput(Throughput::Elements(1));

    group.bench_function("apply_remote", |b| {
        let mut store = HistoryStore::new(PosterState::default());
        let mut i = 0usize;
        b.iter(|| {
            i += 1;
            store.apply_remote(black_box(edited_state(i)));
        })
    });

    group.finish();
}

criterion_group!(benches, bench_set, bench_undo_redo, bench_apply_remote);
criterion_main!(benches);
