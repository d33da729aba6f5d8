use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use squad_core::models::RecurrenceRule;
use squad_core::recurrence::{RecurrenceExpander, RecurrenceParams};
use chrono::NaiveDate;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
}

fn bench_expansion_by_rule(c: &mut Criterion) {
    let mut group = c.benchmark_group("expansion_by_rule");

    for rule in [RecurrenceRule::Daily, RecurrenceRule::Weekly, RecurrenceRule::Monthly] {
        let expander = RecurrenceExpander::new(start(), RecurrenceParams::new(rule, Some(1), None));
        group.bench_with_input(BenchmarkId::from_parameter(rule), &expander, |b, expander| {
            b.iter(|| black_box(expander).expand())
        });
    }

    group.finish();
}

fn bench_expansion_by_interval(c: &mut Criterion) {
    let mut group = c.benchmark_group("weekly_expansion_by_interval");

    for interval in [1, 2, 4, 8] {
        let params = RecurrenceParams::new(RecurrenceRule::Weekly, Some(interval), None);
        group.bench_with_input(BenchmarkId::from_parameter(interval), &params, |b, params| {
            b.iter(|| RecurrenceExpander::new(black_box(start()), *params).expand())
        });
    }

    group.finish();
}

fn bench_preview(c: &mut Criterion) {
    let expander = RecurrenceExpander::new(
        start(),
        RecurrenceParams::new(RecurrenceRule::Daily, Some(3), None),
    );

    c.bench_function("preview_ten", |b| b.iter(|| black_box(&expander).preview(black_box(10))));
}

criterion_group!(
    benches,
    bench_expansion_by_rule,
    bench_expansion_by_interval,
    bench_preview
);
criterion_main!(benches);
