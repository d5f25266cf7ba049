use budgetu_core::{
    calendar::MonthWindow,
    debt::calculate_payoff,
    recurring::{occurrences_in_month, project_month, FlowKind, Frequency, RecurringRule},
};
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_payoff(c: &mut Criterion) {
    let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();

    c.bench_function("payoff_student_loan", |b| {
        b.iter(|| calculate_payoff(black_box(38_750.55), black_box(5.5), black_box(420.0), today))
    });

    c.bench_function("payoff_horizon_guard", |b| {
        b.iter(|| calculate_payoff(black_box(1_000_000.0), black_box(0.01), black_box(8.34), today))
    });
}

fn bench_recurrence(c: &mut Criterion) {
    let window = MonthWindow::new(2024, 6).unwrap();
    let distant = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();

    c.bench_function("weekly_distant_start", |b| {
        b.iter(|| occurrences_in_month(Frequency::Weekly, black_box(distant), window))
    });

    let rules: Vec<RecurringRule> = (0..500)
        .map(|idx| {
            let frequency = Frequency::ALL[idx % Frequency::ALL.len()];
            let kind = if idx % 4 == 0 {
                FlowKind::Income
            } else {
                FlowKind::Expense
            };
            RecurringRule::new(kind, 10.0 + idx as f64, frequency, distant)
        })
        .collect();

    c.bench_function("project_month_500_rules", |b| {
        b.iter(|| project_month(black_box(&rules), window))
    });
}

criterion_group!(benches, bench_payoff, bench_recurrence);
criterion_main!(benches);
