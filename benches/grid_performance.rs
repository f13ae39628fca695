use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use saisie_core::{
    core::{group_transactions, FixedClock, GridSession, SessionContext},
    domain::{
        Account, AccountType, ChartOfAccounts, Column, FiscalYear, FiscalYearStatus, Journal,
        JournalType, Period, PeriodStatus,
    },
};

fn chart() -> ChartOfAccounts {
    let mut accounts = Vec::new();
    for idx in 0..2_000 {
        let kind = if idx % 2 == 0 {
            AccountType::Charge
        } else {
            AccountType::Passif
        };
        accounts.push(Account::new(
            idx,
            format!("{}{:05}", 4 + idx % 3, idx),
            format!("Compte {idx}"),
            kind,
        ));
    }
    ChartOfAccounts::new(accounts)
}

fn context() -> SessionContext {
    let june = Period {
        id: 6,
        number: 6,
        start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        status: PeriodStatus::Open,
    };
    let year = FiscalYear {
        id: 1,
        code: "2024".into(),
        label: "Exercice 2024".into(),
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        status: FiscalYearStatus::Open,
        periods: vec![june],
    };
    let mut context = SessionContext::new(Some(year));
    context.select_journal(Journal::new(1, "OD", "Operations diverses", JournalType::Miscellaneous));
    context.select_period(6).expect("open period");
    context
}

/// `txn_count` transactions of three lines each, all balanced.
fn build_grid(txn_count: usize, chart: &ChartOfAccounts) -> GridSession {
    let mut grid = GridSession::new(FixedClock(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()));
    for idx in 0..txn_count {
        let header = if idx == 0 { 0 } else { grid.start_transaction() };
        let amount = format!("{}.50", 10 + idx % 90);
        grid.set_cell(header, Column::Account, "6", chart).expect("header");
        grid.set_cell(header, Column::Description, "Bench", chart)
            .expect("header");
        grid.set_cell(header + 1, Column::Account, "4", chart).expect("debit");
        grid.set_cell(header + 1, Column::Debit, &amount, chart).expect("debit");
        let credit = grid.append_line(header + 1).expect("append");
        grid.set_cell(credit, Column::Account, "5", chart).expect("credit");
        grid.set_cell(credit, Column::Credit, &amount, chart).expect("credit");
    }
    grid
}

fn bench_totals(c: &mut Criterion) {
    let chart = chart();
    let grid = build_grid(black_box(2_000), &chart);

    c.bench_function("grid_totals_2k", |b| {
        b.iter(|| black_box(grid.totals()))
    });

    c.bench_function("prefix_lookup_2k_accounts", |b| {
        b.iter(|| black_box(chart.find_by_prefix("601999")))
    });
}

fn bench_grouping(c: &mut Criterion) {
    let chart = chart();
    let grid = build_grid(black_box(2_000), &chart);
    let context = context();

    c.bench_function("group_transactions_2k", |b| {
        b.iter(|| {
            let payloads = group_transactions(grid.transactions(), &context).expect("group");
            black_box(payloads);
        })
    });

    c.bench_function("auto_balance_after_edit", |b| {
        b.iter_batched(
            || {
                let mut grid = build_grid(200, &chart);
                let last = grid.row_count() - 1;
                grid.set_cell(last, Column::Credit, "1", &chart).expect("edit");
                grid
            },
            |mut grid| black_box(grid.auto_balance()),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_totals, bench_grouping);
criterion_main!(benches);
