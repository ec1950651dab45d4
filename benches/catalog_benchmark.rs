use chrono::{Duration as ChronoDuration, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use parish_console::domain::catalog::{catalog_view, EventFilter, EventSort, SortDirection, SortField};
use parish_console::domain::event::{Event, EventCategory};
use parish_console::domain::family::{group_by_family, filter_groups, FamilyRef, Parishioner};
use parish_console::domain::table::TableState;
use parish_console::domain::transaction::{
    number_rows, transaction_columns, Transaction, TransactionCategory, TransactionType,
};
use rand::Rng;
use std::time::Duration;

const TITLES: [&str; 6] = [
    "Sunday Mass",
    "Youth Retreat",
    "Feast Day Procession",
    "Council Meeting",
    "Choir Practice",
    "Marriage Preparation",
];

fn create_event(id: i64) -> Event {
    let mut rng = rand::thread_rng();
    let now = Utc::now();

    let mut event = Event::new(id, format!("{} #{}", TITLES[rng.gen_range(0..TITLES.len())], id));
    event.category = EventCategory::ALL[rng.gen_range(0..EventCategory::ALL.len())];
    event.start_time = if rng.gen_bool(0.95) {
        Some(now + ChronoDuration::hours(rng.gen_range(-2000..2000)))
    } else {
        None
    };
    event.registration_fees = if rng.gen_bool(0.4) { 0.0 } else { rng.gen_range(50..1000) as f64 };
    event.total_registered = rng.gen_range(0..500);
    event.description = rng.gen_bool(0.5).then(|| "Bring your family and friends".to_string());
    event
}

fn create_parishioner(id: i64, families: i64) -> Parishioner {
    let mut rng = rand::thread_rng();
    let family_id = rng.gen_range(1..=families);
    Parishioner {
        id,
        name: format!("Parishioner {}", id),
        gender: None,
        family_id,
        family: Some(FamilyRef {
            head_of_family: format!("Head {}", family_id),
            phone_number: Some(format!("98450{:05}", family_id)),
            bcc_group: None,
        }),
    }
}

fn create_transaction(id: i64) -> Transaction {
    let mut rng = rand::thread_rng();
    let expense = rng.gen_bool(0.3);
    Transaction {
        id,
        amount: rng.gen_range(10.0..10_000.0),
        description: Some(format!("Entry {}", id)),
        created_at: Some(Utc::now() - ChronoDuration::hours(rng.gen_range(0..8760))),
        event_id: None,
        kind: if expense { TransactionType::Expense } else { TransactionType::Income },
        category: TransactionCategory::ALL[rng.gen_range(0..TransactionCategory::ALL.len())],
        custom_category: None,
    }
}

fn bench_catalog_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog_view");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(5));

    let filter = EventFilter {
        text: "mass".to_string(),
        fee_max: "500".to_string(),
        ..Default::default()
    };
    let sort = EventSort {
        field: SortField::TotalRegistered,
        direction: SortDirection::Descending,
    };

    for count in [100, 1000, 5000].iter() {
        let events: Vec<Event> = (0..*count).map(create_event).collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &events, |b, events| {
            b.iter(|| black_box(catalog_view(events, &filter, &sort, Utc::now())));
        });
    }
    group.finish();
}

fn bench_candidate_grouping(c: &mut Criterion) {
    let mut group = c.benchmark_group("candidate_grouping");
    group.sample_size(20);

    for (people, families) in [(200, 60), (1000, 300), (3000, 900)].iter() {
        let pool: Vec<Parishioner> = (0..*people)
            .map(|id| create_parishioner(id, *families))
            .collect();
        let test_name = format!("people_{}_families_{}", people, families);

        group.bench_function(&test_name, |b| {
            b.iter(|| {
                let groups = group_by_family(&pool);
                black_box(filter_groups(&groups, "head 1"))
            });
        });
    }
    group.finish();
}

fn bench_table_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_search");
    group.sample_size(20);

    let columns = transaction_columns();
    for count in [500, 5000].iter() {
        let rows = number_rows((0..*count).map(create_transaction).collect());
        group.bench_with_input(BenchmarkId::from_parameter(count), &rows, |b, rows| {
            b.iter(|| {
                let mut state = TableState::new(10);
                state.set_filter("donation");
                let filtered = state.filtered(rows, &columns);
                state.go_to(3, filtered.len());
                black_box(state.page_rows(&filtered).len())
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_catalog_view,
    bench_candidate_grouping,
    bench_table_search
);

criterion_main!(benches);
