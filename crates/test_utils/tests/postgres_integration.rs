//! PostgreSQL integration tests
//!
//! These start a container through testcontainers and need a Docker daemon.
//! Run with `cargo test -p test_utils -- --ignored`.

use std::sync::Arc;

use domain_claims::{ClaimError, ClaimService, ClaimsStore, CLAIM_PROCESSED_EVENT};
use infra_db::repositories::{ClaimLineRepository, ClaimRepository, OutboxRepository};
use infra_db::PgClaimsStore;
use test_utils::*;

async fn setup() -> (TestDatabase, PgClaimsStore) {
    let db = create_isolated_test_database()
        .await
        .expect("Failed to create test database");
    let store = PgClaimsStore::new(db.pool().clone());
    (db, store)
}

mod claim_persistence_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_sample_claim_round_trip() {
        let (db, store) = setup().await;
        let service = ClaimService::new();

        let claim = service
            .submit(&store, ClaimFixtures::sample_claim())
            .await
            .unwrap();

        let mut conn = db.pool().acquire().await.unwrap();
        let header = ClaimRepository::get_by_id(&mut conn, claim.id).await.unwrap();
        assert_eq!(header.claim_reference.as_deref(), Some(StringFixtures::claim_reference()));

        let lines: Vec<_> = ClaimLineRepository::find_by_claim(&mut conn, claim.id)
            .await
            .unwrap()
            .into_iter()
            .map(Into::into)
            .collect();
        assert_eq!(lines.len(), 2);
        assert_net_fees_consistent(&lines);

        let aggregate = store
            .provider_aggregate(ClaimFixtures::PROVIDER_NPI)
            .await
            .unwrap();
        assert_provider_total(
            aggregate.as_ref(),
            ClaimFixtures::PROVIDER_NPI,
            ClaimFixtures::SAMPLE_NET_FEE_CENTS,
        );

        let events = OutboxRepository::find_by_aggregate(&mut conn, *claim.id.as_uuid())
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, CLAIM_PROCESSED_EVENT);
        assert_eq!(events[0].status, "pending");
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_invalid_line_persists_nothing() {
        let (db, store) = setup().await;

        let result = ClaimService::new()
            .submit(&store, ClaimFixtures::invalid_procedure_claim())
            .await;
        assert!(matches!(result, Err(ClaimError::ValidationFailed { .. })));

        let mut conn = db.pool().acquire().await.unwrap();
        let count = ClaimRepository::count_by_reference(&mut conn, StringFixtures::claim_reference())
            .await
            .unwrap();
        assert_eq!(count, 0);
        assert!(store
            .provider_aggregate(ClaimFixtures::PROVIDER_NPI)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_dropped_unit_of_work_rolls_back() {
        let (db, store) = setup().await;
        let service = ClaimService::new();

        {
            let mut uow = store.begin().await.unwrap();
            service
                .process(uow.as_mut(), ClaimFixtures::sample_claim())
                .await
                .unwrap();
        }

        let mut conn = db.pool().acquire().await.unwrap();
        let total = ClaimLineRepository::sum_net_fee_for_provider(&mut conn, ClaimFixtures::PROVIDER_NPI)
            .await
            .unwrap();
        assert_eq!(total, 0);
        assert!(store.top_providers(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_bulk_insert_spans_chunks() {
        let (db, store) = setup().await;

        let mut builder = ClaimSubmissionBuilder::new();
        for _ in 0..2_500 {
            builder = builder.with_net_fee("1234567890", 1);
        }

        let claim = ClaimService::new().submit(&store, builder.build()).await.unwrap();

        let mut conn = db.pool().acquire().await.unwrap();
        let lines = ClaimLineRepository::find_by_claim(&mut conn, claim.id).await.unwrap();
        assert_eq!(lines.len(), 2_500);
        assert!(lines.windows(2).all(|w| w[0].id < w[1].id));

        let aggregate = store.provider_aggregate("1234567890").await.unwrap();
        assert_provider_total(aggregate.as_ref(), "1234567890", 2_500);
    }
}

mod aggregate_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[ignore = "requires docker"]
    async fn test_concurrent_claims_lose_no_updates() {
        let (db, store) = setup().await;
        let store = Arc::new(store);
        let claims = 50;
        let delta = 1234;

        let handles: Vec<_> = (0..claims)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    let submission = ClaimSubmissionBuilder::new()
                        .with_net_fee("5555555555", delta)
                        .build();
                    ClaimService::new().submit(store.as_ref(), submission).await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let aggregate = store.provider_aggregate("5555555555").await.unwrap();
        assert_provider_total(aggregate.as_ref(), "5555555555", claims * delta);

        let mut conn = db.pool().acquire().await.unwrap();
        let from_lines = ClaimLineRepository::sum_net_fee_for_provider(&mut conn, "5555555555")
            .await
            .unwrap();
        assert_eq!(from_lines, claims * delta);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[ignore = "requires docker"]
    async fn test_overlapping_providers_do_not_deadlock() {
        let (_db, store) = setup().await;
        let store = Arc::new(store);

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    // Alternate line order so providers are listed in both orders
                    let (first, second) = if i % 2 == 0 {
                        ("1000000001", "1000000002")
                    } else {
                        ("1000000002", "1000000001")
                    };
                    let submission = ClaimSubmissionBuilder::new()
                        .with_net_fee(first, 100)
                        .with_net_fee(second, 100)
                        .build();
                    ClaimService::new().submit(store.as_ref(), submission).await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let top = store.top_providers(10).await.unwrap();
        assert_eq!(top.len(), 2);
        assert!(top.iter().all(|p| p.total_net_fee_cents == 2_000));
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_top_providers_ranking_and_limit() {
        let (db, store) = setup().await;
        let service = ClaimService::new();

        for i in 0..12i64 {
            let submission = ClaimSubmissionBuilder::new()
                .with_net_fee(&format!("20000000{:02}", i), (i + 1) * 100)
                .build();
            service.submit(&store, submission).await.unwrap();
        }

        let top = store.top_providers(10).await.unwrap();
        assert_eq!(top.len(), 10);
        assert_ranked_descending(&top);
        assert_eq!(top[0].provider_npi, "2000000011");

        let mut conn = db.pool().acquire().await.unwrap();
        for provider in &top {
            let from_lines =
                ClaimLineRepository::sum_net_fee_for_provider(&mut conn, &provider.provider_npi)
                    .await
                    .unwrap();
            assert_eq!(from_lines, provider.total_net_fee_cents);
        }
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_ping() {
        let (_db, store) = setup().await;
        store.ping().await.unwrap();
    }
}
