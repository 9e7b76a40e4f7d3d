//! Aggregation engine behavior over in-memory stores: inclusive range
//! arithmetic, fail-fast validation, ranking and comparison conventions.

#[path = "../helpers/mock_repositories.rs"]
mod mock_repositories;

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use mock_repositories::{
    date, engine_with, InMemoryStructureStore, InMemoryTransactionStore, InMemoryUserStore,
    TransactionRecord,
};
use structura::core::AppError;

/// Store from the reference scenario: 100.00 on 2023-06-01 and 200.00 on
/// 2023-08-15, both for structure 1.
fn scenario_store() -> InMemoryTransactionStore {
    InMemoryTransactionStore::new(vec![
        TransactionRecord::new(1, dec!(100), date(2023, 6, 1)),
        TransactionRecord::new(1, dec!(200), date(2023, 8, 15)),
    ])
}

#[tokio::test]
async fn global_stats_aggregates_all_counters() {
    let transactions = Arc::new(scenario_store());
    let structures = Arc::new(InMemoryStructureStore::with_count(3));
    let users = Arc::new(InMemoryUserStore::new(12));
    let engine = engine_with(transactions, structures, users);

    let stats = engine.global_stats().await.unwrap();

    assert_eq!(stats.total_transactions, 2);
    assert_eq!(stats.total_revenue, dec!(300.00));
    assert_eq!(stats.total_structures, 3);
    assert_eq!(stats.total_users, 12);
}

#[tokio::test]
async fn global_stats_on_empty_store_returns_zeros() {
    let engine = engine_with(
        Arc::new(InMemoryTransactionStore::empty()),
        Arc::new(InMemoryStructureStore::empty()),
        Arc::new(InMemoryUserStore::new(0)),
    );

    let stats = engine.global_stats().await.unwrap();

    assert_eq!(stats.total_transactions, 0);
    assert_eq!(stats.total_revenue, Decimal::ZERO);
    assert_eq!(stats.total_structures, 0);
    assert_eq!(stats.total_users, 0);
}

#[tokio::test]
async fn date_range_stats_include_both_endpoints() {
    let transactions = Arc::new(scenario_store());
    let engine = engine_with(
        transactions,
        Arc::new(InMemoryStructureStore::with_count(1)),
        Arc::new(InMemoryUserStore::new(0)),
    );

    let stats = engine
        .stats_by_date_range(date(2023, 1, 1), date(2023, 12, 31))
        .await
        .unwrap();

    assert_eq!(stats.transactions_in_period, 2);
    assert_eq!(stats.revenue_in_period, dec!(300.00));

    // Endpoint days themselves count
    let june_only = engine
        .stats_by_date_range(date(2023, 6, 1), date(2023, 6, 1))
        .await
        .unwrap();
    assert_eq!(june_only.transactions_in_period, 1);
    assert_eq!(june_only.revenue_in_period, dec!(100.00));
}

#[tokio::test]
async fn empty_window_yields_zero_counts_not_error() {
    let transactions = Arc::new(scenario_store());
    let engine = engine_with(
        transactions,
        Arc::new(InMemoryStructureStore::with_count(1)),
        Arc::new(InMemoryUserStore::new(0)),
    );

    let stats = engine
        .stats_by_date_range(date(2020, 1, 1), date(2020, 12, 31))
        .await
        .unwrap();

    assert_eq!(stats.transactions_in_period, 0);
    assert_eq!(stats.revenue_in_period, Decimal::ZERO);
}

#[tokio::test]
async fn inverted_ranges_fail_without_touching_accessors() {
    let transactions = Arc::new(scenario_store());
    let structures = Arc::new(InMemoryStructureStore::with_count(1));
    let users = Arc::new(InMemoryUserStore::new(0));
    let engine = engine_with(transactions.clone(), structures.clone(), users.clone());

    let start = date(2023, 12, 31);
    let end = date(2023, 1, 1);

    let range_err = engine.stats_by_date_range(start, end).await.unwrap_err();
    assert!(matches!(range_err, AppError::Validation(_)));

    let trend_err = engine
        .revenue_trend(start, end, "daily".parse().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(trend_err, AppError::Validation(_)));

    let category_err = engine.revenue_by_category(start, end).await.unwrap_err();
    assert!(matches!(category_err, AppError::Validation(_)));

    // Either inverted range rejects the whole comparison
    let compare_err = engine
        .compare_periods(date(2023, 1, 1), date(2023, 1, 31), start, end)
        .await
        .unwrap_err();
    assert!(matches!(compare_err, AppError::Validation(_)));

    assert_eq!(transactions.call_count(), 0);
    assert_eq!(structures.call_count(), 0);
    assert_eq!(users.call_count(), 0);
}

#[tokio::test]
async fn stats_by_structure_returns_identity_and_totals() {
    let transactions = Arc::new(scenario_store());
    let engine = engine_with(
        transactions,
        Arc::new(InMemoryStructureStore::with_count(2)),
        Arc::new(InMemoryUserStore::new(0)),
    );

    let stats = engine.stats_by_structure(1).await.unwrap();

    assert_eq!(stats.structure_id, 1);
    assert_eq!(stats.structure_name, "Structure 1");
    assert_eq!(stats.total_transactions, 2);
    assert_eq!(stats.total_revenue, dec!(300.00));

    // Structure 2 exists but has no transactions
    let quiet = engine.stats_by_structure(2).await.unwrap();
    assert_eq!(quiet.total_transactions, 0);
    assert_eq!(quiet.total_revenue, Decimal::ZERO);
}

#[tokio::test]
async fn stats_by_unknown_structure_is_not_found() {
    let transactions = Arc::new(scenario_store());
    let engine = engine_with(
        transactions.clone(),
        Arc::new(InMemoryStructureStore::with_count(2)),
        Arc::new(InMemoryUserStore::new(0)),
    );

    let err = engine.stats_by_structure(99).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // Existence is checked before any sum query
    assert_eq!(transactions.call_count(), 0);
}

#[tokio::test]
async fn compare_periods_reports_percentage_deltas() {
    let transactions = Arc::new(InMemoryTransactionStore::new(vec![
        TransactionRecord::new(1, dec!(100), date(2023, 1, 10)),
        TransactionRecord::new(1, dec!(150), date(2023, 2, 10)),
    ]));
    let engine = engine_with(
        transactions,
        Arc::new(InMemoryStructureStore::with_count(1)),
        Arc::new(InMemoryUserStore::new(0)),
    );

    let comparison = engine
        .compare_periods(
            date(2023, 1, 1),
            date(2023, 1, 31),
            date(2023, 2, 1),
            date(2023, 2, 28),
        )
        .await
        .unwrap();

    assert_eq!(comparison.first_period.revenue_in_period, dec!(100.00));
    assert_eq!(comparison.second_period.revenue_in_period, dec!(150.00));
    assert_eq!(comparison.revenue_change_pct, dec!(50.00));
    // 1 transaction -> 1 transaction
    assert_eq!(comparison.transaction_change_pct, dec!(0.00));
}

#[tokio::test]
async fn compare_identical_periods_yields_zero_change() {
    let transactions = Arc::new(scenario_store());
    let engine = engine_with(
        transactions,
        Arc::new(InMemoryStructureStore::with_count(1)),
        Arc::new(InMemoryUserStore::new(0)),
    );

    let comparison = engine
        .compare_periods(
            date(2023, 1, 1),
            date(2023, 12, 31),
            date(2023, 1, 1),
            date(2023, 12, 31),
        )
        .await
        .unwrap();

    assert_eq!(comparison.revenue_change_pct, Decimal::ZERO);
    assert_eq!(comparison.transaction_change_pct, Decimal::ZERO);
}

#[tokio::test]
async fn compare_periods_zero_baseline_conventions() {
    let transactions = Arc::new(InMemoryTransactionStore::new(vec![
        TransactionRecord::new(1, dec!(80), date(2023, 2, 5)),
    ]));
    let engine = engine_with(
        transactions,
        Arc::new(InMemoryStructureStore::with_count(1)),
        Arc::new(InMemoryUserStore::new(0)),
    );

    // Nothing -> something is pinned at 100%
    let growth = engine
        .compare_periods(
            date(2023, 1, 1),
            date(2023, 1, 31),
            date(2023, 2, 1),
            date(2023, 2, 28),
        )
        .await
        .unwrap();
    assert_eq!(growth.revenue_change_pct, dec!(100));
    assert_eq!(growth.transaction_change_pct, dec!(100));

    // Nothing -> nothing is 0%
    let flat = engine
        .compare_periods(
            date(2022, 1, 1),
            date(2022, 1, 31),
            date(2022, 2, 1),
            date(2022, 2, 28),
        )
        .await
        .unwrap();
    assert_eq!(flat.revenue_change_pct, Decimal::ZERO);
    assert_eq!(flat.transaction_change_pct, Decimal::ZERO);
}

#[tokio::test]
async fn top_structures_rank_filter_and_truncate() {
    // Five structures with revenues 50, 0, 30, 10, 40
    let transactions = Arc::new(InMemoryTransactionStore::new(vec![
        TransactionRecord::new(1, dec!(50), date(2023, 3, 1)),
        TransactionRecord::new(3, dec!(30), date(2023, 3, 2)),
        TransactionRecord::new(4, dec!(10), date(2023, 3, 3)),
        TransactionRecord::new(5, dec!(40), date(2023, 3, 4)),
    ]));
    let engine = engine_with(
        transactions,
        Arc::new(InMemoryStructureStore::with_count(5)),
        Arc::new(InMemoryUserStore::new(0)),
    );

    let top = engine.top_performing_structures(3).await.unwrap();

    let revenues: Vec<Decimal> = top.iter().map(|p| p.revenue).collect();
    assert_eq!(revenues, vec![dec!(50), dec!(40), dec!(30)]);
    assert_eq!(top[0].id, 1);
    assert_eq!(top[1].id, 5);
    assert_eq!(top[2].id, 3);

    // Without truncation the zero-revenue structure is still excluded
    let all = engine.top_performing_structures(10).await.unwrap();
    assert_eq!(all.len(), 4);
    assert!(all.iter().all(|p| p.id != 2));
}

#[tokio::test]
async fn top_structures_ties_keep_ascending_id_order() {
    let transactions = Arc::new(InMemoryTransactionStore::new(vec![
        TransactionRecord::new(2, dec!(25), date(2023, 3, 1)),
        TransactionRecord::new(1, dec!(25), date(2023, 3, 2)),
    ]));
    let engine = engine_with(
        transactions,
        Arc::new(InMemoryStructureStore::with_count(2)),
        Arc::new(InMemoryUserStore::new(0)),
    );

    let top = engine.top_performing_structures(5).await.unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].id, 1);
    assert_eq!(top[1].id, 2);
}

#[tokio::test]
async fn top_structures_normalizes_non_positive_limit() {
    let transactions = Arc::new(InMemoryTransactionStore::new(
        (1..=8)
            .map(|id| TransactionRecord::new(id, Decimal::from(id * 10), date(2023, 3, 1)))
            .collect(),
    ));
    let engine = engine_with(
        transactions,
        Arc::new(InMemoryStructureStore::with_count(8)),
        Arc::new(InMemoryUserStore::new(0)),
    );

    let top = engine.top_performing_structures(0).await.unwrap();
    assert_eq!(top.len(), 5);

    let top_negative = engine.top_performing_structures(-3).await.unwrap();
    assert_eq!(top_negative.len(), 5);
}

#[tokio::test]
async fn revenue_by_category_groups_and_omits_zeros() {
    let transactions = Arc::new(InMemoryTransactionStore::new(vec![
        TransactionRecord::new(1, dec!(120), date(2023, 5, 1)).with_category("Hebergement"),
        TransactionRecord::new(1, dec!(80), date(2023, 5, 2)).with_category("Hebergement"),
        TransactionRecord::new(2, dec!(60), date(2023, 5, 3)).with_category("Restauration"),
        // Zero-amount activity must not surface a category entry
        TransactionRecord::new(2, dec!(0), date(2023, 5, 4)).with_category("Divertissement"),
        // Outside the queried range
        TransactionRecord::new(1, dec!(500), date(2023, 9, 1)).with_category("Restauration"),
    ]));
    let engine = engine_with(
        transactions,
        Arc::new(InMemoryStructureStore::with_count(2)),
        Arc::new(InMemoryUserStore::new(0)),
    );

    let breakdown = engine
        .revenue_by_category(date(2023, 5, 1), date(2023, 5, 31))
        .await
        .unwrap();

    assert_eq!(breakdown.len(), 2);
    assert_eq!(breakdown["Hebergement"], dec!(200.00));
    assert_eq!(breakdown["Restauration"], dec!(60.00));
    assert!(!breakdown.contains_key("Divertissement"));
}
