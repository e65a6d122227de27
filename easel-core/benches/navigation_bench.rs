use criterion::{criterion_group, criterion_main, Criterion};
use easel_core::navigation::{NavigationRule, NavigationTable, BACK, NEXT};
use std::hint::black_box;

fn make_table(screens: usize) -> NavigationTable {
    let rules = (0..screens).flat_map(|i| {
        [
            NavigationRule { from: format!("screen{i}"), action: NEXT.into(), to: format!("screen{}", i + 1) },
            NavigationRule { from: format!("screen{i}"), action: BACK.into(), to: format!("screen{}", i.saturating_sub(1)) },
        ]
    });
    NavigationTable::from_rules(rules)
}

fn bench_navigation(c: &mut Criterion) {
    const SCREENS: usize = 1_000;
    let table = make_table(SCREENS);
    let keys: Vec<String> = (0..SCREENS).map(|i| format!("screen{i}")).collect();

    let mut group = c.benchmark_group("navigation");
    group.bench_function("resolve 1k screens", |b| {
        b.iter(|| {
            for key in &keys {
                black_box(table.resolve(key, NEXT));
                black_box(table.resolve(key, "unknown"));
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_navigation);
criterion_main!(benches);
