use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlfluent::{Chain, ConditionGroup, StatementBuilder, ValueMap};

/// SELECT col0, col1, ... FROM t WHERE (col0=:c0p0 AND col1=:c0p1 ...)
fn build_select(n: usize) -> StatementBuilder {
    let mut group = ConditionGroup::new();
    for i in 0..n {
        group.eq(format!("col{i}"), i as i64);
    }

    let mut b = StatementBuilder::new();
    b.select((0..n).map(|i| format!("col{i}")));
    b.from("t")
        .expect("select accepts a table")
        .add_condition(group, Chain::And)
        .expect("select accepts conditions");
    b
}

fn bench_render_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/select");

    for n in [1, 5, 10, 50, 100] {
        let b = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &b, |bench, b| {
            bench.iter(|| black_box(b.render()));
        });
    }

    group.finish();
}

fn bench_build_and_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/build_and_render");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bench, &n| {
            bench.iter(|| {
                let b = build_select(n);
                black_box(b.render())
            });
        });
    }

    group.finish();
}

fn bench_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/in_list");

    for n in [5, 20, 100, 500] {
        let ids: Vec<i64> = (0..n).collect();
        let mut cond = ConditionGroup::new();
        cond.in_list("id", ids);
        group.bench_with_input(BenchmarkId::from_parameter(n), &cond, |bench, cond| {
            bench.iter(|| black_box(cond.render("c0")));
        });
    }

    group.finish();
}

fn bench_multiple_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/multiple_insert");

    for rows in [1, 10, 100, 1000] {
        let data: Vec<ValueMap> = (0..rows)
            .map(|i| {
                sqlfluent::values! {
                    "name" => format!("user{i}"),
                    "age" => i as i64,
                    "active" => i % 2 == 0,
                }
            })
            .collect();

        let mut b = StatementBuilder::new();
        b.multiple_insert(data);
        b.insert_into("users").expect("insert accepts a table");

        group.bench_with_input(BenchmarkId::from_parameter(rows), &b, |bench, b| {
            bench.iter(|| black_box(b.render()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_render_select,
    bench_build_and_render,
    bench_in_list,
    bench_multiple_insert
);
criterion_main!(benches);
