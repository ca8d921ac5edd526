//! Unit tests for Strategy crate

#[cfg(test)]
mod fixtures {
    use crate::application::provider::StrategiesProvider;
    use crate::domain::entities::Strategy;
    use crate::infra::memory::MemoryStrategyStore;
    use chrono::{DateTime, TimeZone, Utc};
    use platform::clock::FixedClock;
    use std::sync::Arc;

    pub fn deck() -> Vec<Strategy> {
        vec![
            Strategy::new(1, "Abandon normal instruments"),
            Strategy::new(2, "Accept advice"),
        ]
    }

    pub fn march_first() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    pub fn provider_with(
        store: &MemoryStrategyStore,
        clock: &FixedClock,
    ) -> Arc<StrategiesProvider<MemoryStrategyStore>> {
        Arc::new(StrategiesProvider::new(
            Arc::new(store.clone()),
            Arc::new(clock.clone()),
        ))
    }
}

#[cfg(test)]
mod provider_tests {
    use super::fixtures::*;
    use crate::domain::entities::Strategy;
    use crate::domain::repository::FavoritesRepository;
    use crate::error::StrategyError;
    use crate::infra::memory::MemoryStrategyStore;
    use kernel::id::{StrategyId, UserId};
    use kernel::identity::Identity;
    use platform::clock::FixedClock;
    use std::time::Duration;

    #[tokio::test]
    async fn test_get_by_id_member_and_non_member() {
        let store = MemoryStrategyStore::new(deck());
        let provider = provider_with(&store, &FixedClock::new(march_first()));
        provider.load().await;

        for strategy in deck() {
            assert_eq!(provider.get_by_id(strategy.id), Some(strategy));
        }
        assert_eq!(provider.get_by_id(StrategyId::new(3)), None);
        assert_eq!(provider.get_by_id(StrategyId::new(-1)), None);
    }

    #[tokio::test]
    async fn test_get_random_is_member() {
        let store = MemoryStrategyStore::new(deck());
        let provider = provider_with(&store, &FixedClock::new(march_first()));
        provider.load().await;

        for _ in 0..50 {
            let picked = provider.get_random().unwrap();
            assert!(deck().contains(&picked));
        }
    }

    #[tokio::test]
    async fn test_get_random_empty_is_none() {
        let store = MemoryStrategyStore::new(Vec::new());
        let provider = provider_with(&store, &FixedClock::new(march_first()));
        let status = provider.load().await;

        assert!(status.error.is_none());
        assert_eq!(status.strategy_count, 0);
        assert!(provider.get_random().is_none());
    }

    #[tokio::test]
    async fn test_toggle_scenario() {
        let store = MemoryStrategyStore::new(deck());
        let provider = provider_with(&store, &FixedClock::new(march_first()));
        provider.load().await;
        provider.set_identity(Some(Identity::new("brian"))).await;
        assert!(provider.favorites().is_empty());

        let id = StrategyId::new(2);
        assert!(provider.toggle_favorite(id).await.unwrap());
        assert_eq!(provider.favorites(), vec![id]);
        assert!(provider.is_favorite(id));

        assert!(!provider.toggle_favorite(id).await.unwrap());
        assert!(provider.favorites().is_empty());
        assert!(store.list(&UserId::new("brian")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_without_identity_fails_before_network() {
        let store = MemoryStrategyStore::new(deck());
        let provider = provider_with(&store, &FixedClock::new(march_first()));
        store.set_unavailable(true);

        let err = provider.toggle_favorite(StrategyId::new(1)).await.unwrap_err();
        assert!(matches!(err, StrategyError::Unauthenticated(_)));
        assert_eq!(err.to_string(), "Must be logged in to manage favorites");
    }

    #[tokio::test]
    async fn test_toggle_failure_leaves_state_unchanged() {
        let store = MemoryStrategyStore::new(deck());
        let provider = provider_with(&store, &FixedClock::new(march_first()));
        provider.load().await;
        provider.set_identity(Some(Identity::new("peter"))).await;
        provider.toggle_favorite(StrategyId::new(1)).await.unwrap();

        store.set_unavailable(true);
        let err = provider.toggle_favorite(StrategyId::new(1)).await.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(provider.favorites(), vec![StrategyId::new(1)]);

        let err = provider.toggle_favorite(StrategyId::new(2)).await.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(provider.favorites(), vec![StrategyId::new(1)]);
    }

    #[tokio::test]
    async fn test_concurrent_toggles_same_id_are_serialized() {
        let store = MemoryStrategyStore::new(deck());
        let provider = provider_with(&store, &FixedClock::new(march_first()));
        provider.load().await;
        provider.set_identity(Some(Identity::new("brian"))).await;
        store.set_latency(Duration::from_millis(20));

        let id = StrategyId::new(1);
        let (first, second) = tokio::join!(provider.toggle_favorite(id), provider.toggle_favorite(id));

        let mut outcomes = vec![first.unwrap(), second.unwrap()];
        outcomes.sort();
        assert_eq!(outcomes, vec![false, true]);
        assert!(provider.favorites().is_empty());
        assert!(store.list(&UserId::new("brian")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_loads_join() {
        let store = MemoryStrategyStore::new(deck());
        let provider = provider_with(&store, &FixedClock::new(march_first()));
        store.set_latency(Duration::from_millis(30));

        let (a, b) = tokio::join!(provider.load(), provider.load());

        assert_eq!(store.fetch_count(), 1);
        assert_eq!(a.strategy_count, 2);
        assert_eq!(b.strategy_count, 2);
        assert_eq!(provider.generation(), 1);
    }

    #[tokio::test]
    async fn test_load_error_is_state_not_panic() {
        let store = MemoryStrategyStore::new(deck());
        let provider = provider_with(&store, &FixedClock::new(march_first()));
        store.set_unavailable(true);

        let status = provider.load().await;
        assert!(!status.loading);
        assert_eq!(
            status.error.as_deref(),
            Some("Strategy store unavailable: memory store offline")
        );
        assert_eq!(status.strategy_count, 0);
    }

    #[tokio::test]
    async fn test_refresh_favorites_failure_clears_and_records() {
        let store = MemoryStrategyStore::new(deck());
        let provider = provider_with(&store, &FixedClock::new(march_first()));
        provider.load().await;
        provider.set_identity(Some(Identity::new("brian"))).await;
        provider.toggle_favorite(StrategyId::new(2)).await.unwrap();

        store.set_unavailable(true);
        let status = provider.refresh_favorites().await;

        assert!(provider.favorites().is_empty());
        assert!(status.error.is_some());

        store.set_unavailable(false);
        let status = provider.refresh_favorites().await;
        assert!(status.error.is_none());
        assert_eq!(provider.favorites(), vec![StrategyId::new(2)]);
    }

    #[tokio::test]
    async fn test_favorites_for_previous_identity_discarded() {
        let store = MemoryStrategyStore::new(deck());
        store.add(&UserId::new("a"), StrategyId::new(1)).await.unwrap();
        let provider = provider_with(&store, &FixedClock::new(march_first()));
        provider.load().await;
        provider.set_identity(Some(Identity::new("a"))).await;
        assert_eq!(provider.favorites(), vec![StrategyId::new(1)]);

        store.set_latency(Duration::from_millis(40));
        tokio::join!(provider.refresh_favorites(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            provider.set_identity(Some(Identity::new("b"))).await;
        });

        assert!(provider.favorites().is_empty());
        assert_eq!(provider.identity().map(|i| i.uid), Some(UserId::new("b")));
    }

    #[tokio::test]
    async fn test_set_daily_strategy_requires_identity() {
        let store = MemoryStrategyStore::new(deck());
        let provider = provider_with(&store, &FixedClock::new(march_first()));
        provider.load().await;

        let err = provider.set_daily_strategy(StrategyId::new(1)).await.unwrap_err();
        assert!(matches!(err, StrategyError::Unauthenticated("set daily strategy")));

        provider.set_identity(Some(Identity::new("brian"))).await;
        let record = provider.set_daily_strategy(StrategyId::new(1)).await.unwrap();
        assert_eq!(record.date.to_string(), "2024-03-01");
        assert_eq!(provider.today_strategy(), Some(Strategy::new(1, "Abandon normal instruments")));
    }

    #[tokio::test]
    async fn test_refresh_today_strategy_follows_identity() {
        let store = MemoryStrategyStore::new(deck());
        let clock = FixedClock::new(march_first());
        let provider = provider_with(&store, &clock);
        provider.load().await;
        provider.set_identity(Some(Identity::new("brian"))).await;
        provider.set_daily_strategy(StrategyId::new(2)).await.unwrap();

        provider.set_identity(None).await;
        assert!(provider.today_record().is_none());

        provider.set_identity(Some(Identity::new("brian"))).await;
        assert_eq!(
            provider.today_record().map(|r| r.strategy_id),
            Some(StrategyId::new(2))
        );

        clock.set(march_first() + chrono::Duration::days(1));
        assert!(provider.today_record().is_none());
        assert!(provider.refresh_today_strategy().await.is_none());
    }
}

#[cfg(test)]
mod daily_tests {
    use super::fixtures::*;
    use crate::application::config::StrategyConfig;
    use crate::application::daily_selection::{DailySelection, DailyState};
    use crate::domain::entities::{DailyRecord, Strategy};
    use crate::domain::repository::DailyRecordRepository;
    use crate::domain::value_objects::CalendarDay;
    use crate::infra::memory::MemoryStrategyStore;
    use kernel::id::{StrategyId, UserId};
    use kernel::identity::Identity;
    use platform::clock::FixedClock;
    use platform::storage::{KeyValueStore, MemoryStore};
    use std::sync::Arc;
    use std::time::Duration;

    const KEY: &str = "daily-strategy";

    fn today() -> CalendarDay {
        CalendarDay::from_utc(march_first())
    }

    async fn stored_record(storage: &MemoryStore) -> DailyRecord {
        let raw = storage.get(KEY).await.unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    async fn seed(storage: &MemoryStore, raw: &str) {
        storage.set(KEY, raw).await.unwrap();
    }

    #[tokio::test]
    async fn test_fresh_pick_writes_once() {
        let store = MemoryStrategyStore::new(deck());
        let provider = provider_with(&store, &FixedClock::new(march_first()));
        provider.load().await;
        let storage = Arc::new(MemoryStore::new());
        let daily = DailySelection::new(provider, storage.clone(), &StrategyConfig::default());

        let DailyState::Resolved(strategy) = daily.resolve().await else {
            panic!("expected a resolved strategy");
        };
        assert_eq!(storage.write_count(), 1);

        let record = stored_record(&storage).await;
        assert_eq!(record.strategy_id, strategy.id);
        assert_eq!(record.date, today());

        daily.resolve().await;
        assert_eq!(storage.write_count(), 1);
    }

    #[tokio::test]
    async fn test_todays_record_reused_without_write() {
        let store = MemoryStrategyStore::new(deck());
        let provider = provider_with(&store, &FixedClock::new(march_first()));
        provider.load().await;
        let storage = Arc::new(MemoryStore::new());
        seed(&storage, r#"{"strategyId":2,"date":"2024-03-01"}"#).await;
        let writes_before = storage.write_count();

        let daily = DailySelection::new(provider, storage.clone(), &StrategyConfig::default());
        assert_eq!(
            daily.resolve().await,
            DailyState::Resolved(Strategy::new(2, "Accept advice"))
        );
        assert_eq!(storage.write_count(), writes_before);
    }

    #[tokio::test]
    async fn test_legacy_record_shape_reused() {
        let store = MemoryStrategyStore::new(deck());
        let provider = provider_with(&store, &FixedClock::new(march_first()));
        provider.load().await;
        let storage = Arc::new(MemoryStore::new());
        seed(&storage, r#"{"id":1,"date":"2024-03-01"}"#).await;

        let daily = DailySelection::new(provider, storage.clone(), &StrategyConfig::default());
        let state = daily.resolve().await;
        assert_eq!(state.strategy().map(|s| s.id), Some(StrategyId::new(1)));
        assert_eq!(storage.write_count(), 1);
    }

    #[tokio::test]
    async fn test_yesterdays_record_replaced() {
        let store = MemoryStrategyStore::new(deck());
        let provider = provider_with(&store, &FixedClock::new(march_first()));
        provider.load().await;
        let storage = Arc::new(MemoryStore::new());
        seed(&storage, r#"{"strategyId":2,"date":"2024-02-29"}"#).await;

        let daily = DailySelection::new(provider, storage.clone(), &StrategyConfig::default());
        let state = daily.resolve().await;

        assert_eq!(storage.write_count(), 2);
        let record = stored_record(&storage).await;
        assert_eq!(record.date, today());
        assert_eq!(Some(record.strategy_id), state.strategy().map(|s| s.id));
    }

    #[tokio::test]
    async fn test_deleted_strategy_falls_back_to_fresh_pick() {
        let store = MemoryStrategyStore::new(deck());
        let provider = provider_with(&store, &FixedClock::new(march_first()));
        provider.load().await;
        let storage = Arc::new(MemoryStore::new());
        seed(&storage, r#"{"strategyId":42,"date":"2024-03-01"}"#).await;

        let daily = DailySelection::new(provider, storage.clone(), &StrategyConfig::default());
        let state = daily.resolve().await;

        let picked = state.strategy().unwrap().id;
        assert!(picked == StrategyId::new(1) || picked == StrategyId::new(2));
        assert_eq!(stored_record(&storage).await.strategy_id, picked);
    }

    #[tokio::test]
    async fn test_malformed_record_treated_as_absent() {
        let store = MemoryStrategyStore::new(deck());
        let provider = provider_with(&store, &FixedClock::new(march_first()));
        provider.load().await;

        for junk in ["not json", r#"{"strategyId":"two"}"#, r#"{"date":"2024-03-01"}"#, "null"] {
            let storage = Arc::new(MemoryStore::new());
            seed(&storage, junk).await;
            let daily = DailySelection::new(provider.clone(), storage.clone(), &StrategyConfig::default());

            assert!(matches!(daily.resolve().await, DailyState::Resolved(_)), "junk: {junk}");
            assert_eq!(stored_record(&storage).await.date, today());
        }
    }

    #[tokio::test]
    async fn test_empty_cache_stays_uninitialized() {
        let store = MemoryStrategyStore::new(deck());
        let provider = provider_with(&store, &FixedClock::new(march_first()));
        let storage = Arc::new(MemoryStore::new());
        let daily = DailySelection::new(provider.clone(), storage.clone(), &StrategyConfig::default());

        assert_eq!(daily.resolve().await, DailyState::Uninitialized);
        assert_eq!(storage.write_count(), 0);

        provider.load().await;
        assert!(matches!(daily.resolve().await, DailyState::Resolved(_)));
        assert_eq!(storage.write_count(), 1);
    }

    #[tokio::test]
    async fn test_resolve_when_ready_waits_for_load() {
        let store = MemoryStrategyStore::new(deck());
        let provider = provider_with(&store, &FixedClock::new(march_first()));
        let storage = Arc::new(MemoryStore::new());
        let daily = DailySelection::new(provider.clone(), storage.clone(), &StrategyConfig::default());

        let (resolved, _) = tokio::join!(daily.resolve_when_ready(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            provider.load().await
        });

        let strategy = resolved.unwrap();
        assert_eq!(stored_record(&storage).await.strategy_id, strategy.id);
    }

    #[tokio::test]
    async fn test_resolve_when_ready_keeps_waiting_through_failed_loads() {
        let store = MemoryStrategyStore::new(deck());
        store.set_unavailable(true);
        let provider = provider_with(&store, &FixedClock::new(march_first()));
        let storage = Arc::new(MemoryStore::new());
        let daily = DailySelection::new(provider.clone(), storage.clone(), &StrategyConfig::default());

        let waited = tokio::time::timeout(Duration::from_millis(50), async {
            tokio::join!(daily.resolve_when_ready(), provider.load()).0
        })
        .await;
        assert!(waited.is_err());
        assert_eq!(storage.write_count(), 0);

        store.set_unavailable(false);
        let (resolved, _) = tokio::join!(daily.resolve_when_ready(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            provider.load().await
        });
        assert_eq!(stored_record(&storage).await.strategy_id, resolved.unwrap().id);
    }

    #[tokio::test]
    async fn test_resolved_value_fixed_for_session() {
        let store = MemoryStrategyStore::new(deck());
        let clock = FixedClock::new(march_first());
        let provider = provider_with(&store, &clock);
        provider.load().await;
        let storage = Arc::new(MemoryStore::new());
        let daily = DailySelection::new(provider.clone(), storage.clone(), &StrategyConfig::default());

        let first = daily.resolve().await;
        clock.set(march_first() + chrono::Duration::days(1));
        assert_eq!(daily.resolve().await, first);
        assert_eq!(storage.write_count(), 1);

        // a new session re-evaluates the date
        let next_session = DailySelection::new(provider, storage.clone(), &StrategyConfig::default());
        next_session.resolve().await;
        assert_eq!(storage.write_count(), 2);
        assert_eq!(stored_record(&storage).await.date.to_string(), "2024-03-02");
    }

    #[tokio::test]
    async fn test_fresh_pick_mirrored_for_signed_in_user() {
        let store = MemoryStrategyStore::new(deck());
        let provider = provider_with(&store, &FixedClock::new(march_first()));
        provider.load().await;
        provider.set_identity(Some(Identity::new("brian"))).await;
        let storage = Arc::new(MemoryStore::new());
        let daily = DailySelection::new(provider.clone(), storage, &StrategyConfig::default());

        let picked = daily.resolve().await.strategy().unwrap().id;

        let mirrored = store.find(&UserId::new("brian"), today()).await.unwrap();
        assert_eq!(mirrored.map(|r| r.strategy_id), Some(picked));
        assert_eq!(provider.today_record().map(|r| r.strategy_id), Some(picked));
    }

    #[tokio::test]
    async fn test_mirror_failure_does_not_block_resolution() {
        let store = MemoryStrategyStore::new(deck());
        let provider = provider_with(&store, &FixedClock::new(march_first()));
        provider.load().await;
        provider.set_identity(Some(Identity::new("brian"))).await;
        store.set_unavailable(true);

        let storage = Arc::new(MemoryStore::new());
        let daily = DailySelection::new(provider, storage.clone(), &StrategyConfig::default());

        assert!(matches!(daily.resolve().await, DailyState::Resolved(_)));
        assert_eq!(storage.write_count(), 1);
    }

    #[tokio::test]
    async fn test_second_device_adopts_servers_record() {
        let big_deck: Vec<Strategy> = (1..=50)
            .map(|id| Strategy::new(id, format!("Strategy {id}")))
            .collect();
        let clock = FixedClock::new(march_first());

        for _ in 0..20 {
            let store = MemoryStrategyStore::new(big_deck.clone());

            let first_device = provider_with(&store, &clock);
            first_device.load().await;
            first_device.set_identity(Some(Identity::new("brian"))).await;
            let first = DailySelection::new(
                first_device,
                Arc::new(MemoryStore::new()),
                &StrategyConfig::default(),
            );
            let picked = first.resolve().await.strategy().unwrap().id;

            let second_device = provider_with(&store, &clock);
            second_device.load().await;
            second_device.set_identity(Some(Identity::new("brian"))).await;
            let storage = Arc::new(MemoryStore::new());
            let second = DailySelection::new(second_device, storage.clone(), &StrategyConfig::default());

            assert_eq!(second.resolve().await.strategy().map(|s| s.id), Some(picked));
            assert_eq!(stored_record(&storage).await.strategy_id, picked);
            let server = store.find(&UserId::new("brian"), today()).await.unwrap();
            assert_eq!(server.map(|r| r.strategy_id), Some(picked));
        }
    }

    #[tokio::test]
    async fn test_local_record_wins_over_server_record() {
        let store = MemoryStrategyStore::new(deck());
        store
            .save(&UserId::new("brian"), &DailyRecord::new(StrategyId::new(1), today()))
            .await
            .unwrap();
        let provider = provider_with(&store, &FixedClock::new(march_first()));
        provider.load().await;
        provider.set_identity(Some(Identity::new("brian"))).await;
        let storage = Arc::new(MemoryStore::new());
        seed(&storage, r#"{"strategyId":2,"date":"2024-03-01"}"#).await;

        let daily = DailySelection::new(provider, storage, &StrategyConfig::default());
        assert_eq!(daily.resolve().await.strategy().map(|s| s.id), Some(StrategyId::new(2)));
    }
}

#[cfg(test)]
mod router_tests {
    use super::fixtures::*;
    use crate::infra::memory::MemoryStrategyStore;
    use crate::presentation::handlers::StrategyAppState;
    use crate::presentation::router::{daily_router, favorites_router, strategies_router};
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use axum::{Extension, Router};
    use kernel::identity::Identity;
    use platform::clock::FixedClock;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(store: MemoryStrategyStore, identity: Option<Identity>) -> Router {
        let state = StrategyAppState::new(store, Arc::new(FixedClock::new(march_first())));
        let protected = Router::new()
            .nest("/api/favorites", favorites_router(state.clone()))
            .nest("/api/daily", daily_router(state.clone()));
        let protected = match identity {
            Some(identity) => protected.layer(Extension(identity)),
            None => protected,
        };

        Router::new()
            .nest("/api/strategies", strategies_router(state))
            .merge(protected)
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_list_strategies() {
        let app = app(MemoryStrategyStore::new(deck()), None);
        let (status, body) = call(&app, Method::GET, "/api/strategies", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                {"id": 1, "text": "Abandon normal instruments"},
                {"id": 2, "text": "Accept advice"}
            ])
        );
    }

    #[tokio::test]
    async fn test_get_strategy_by_id() {
        let app = app(MemoryStrategyStore::new(deck()), None);

        let (status, body) = call(&app, Method::GET, "/api/strategies/2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"id": 2, "text": "Accept advice"}));

        for uri in ["/api/strategies/99", "/api/strategies/abc"] {
            let (status, body) = call(&app, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body["error"], "Strategy not found");
        }
    }

    #[tokio::test]
    async fn test_random_strategy() {
        let app = app(MemoryStrategyStore::new(deck()), None);
        let (status, body) = call(&app, Method::GET, "/api/strategies/random", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["id"] == 1 || body["id"] == 2);

        let empty = self::app(MemoryStrategyStore::new(Vec::new()), None);
        let (status, body) = call(&empty, Method::GET, "/api/strategies/random", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Strategy not found");
    }

    #[tokio::test]
    async fn test_store_outage_is_503_with_retry_action() {
        let store = MemoryStrategyStore::new(deck());
        store.set_unavailable(true);
        let app = app(store, None);

        let (status, body) = call(&app, Method::GET, "/api/strategies", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Strategy store unavailable");
        assert_eq!(body["action"], "Retry in a moment");
    }

    #[tokio::test]
    async fn test_protected_routes_need_identity() {
        let app = app(MemoryStrategyStore::new(deck()), None);

        let (status, body) = call(&app, Method::GET, "/api/favorites", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].as_str().unwrap().starts_with("Must be logged in"));

        let (status, _) = call(&app, Method::GET, "/api/daily", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_favorites_flow() {
        let app = app(MemoryStrategyStore::new(deck()), Some(Identity::new("brian")));

        let (status, body) = call(&app, Method::GET, "/api/favorites", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let (status, _) = call(&app, Method::PUT, "/api/favorites/2", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = call(&app, Method::PUT, "/api/favorites/2", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, body) = call(&app, Method::GET, "/api/favorites", None).await;
        assert_eq!(body, json!([2]));

        let (status, body) = call(&app, Method::PUT, "/api/favorites/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Strategy not found");

        let (status, _) = call(&app, Method::DELETE, "/api/favorites/2", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = call(&app, Method::DELETE, "/api/favorites/2", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, body) = call(&app, Method::GET, "/api/favorites", None).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_daily_flow() {
        let app = app(MemoryStrategyStore::new(deck()), Some(Identity::new("brian")));

        let (status, body) = call(&app, Method::GET, "/api/daily", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No strategy recorded for today");

        let (status, body) =
            call(&app, Method::PUT, "/api/daily", Some(json!({"strategyId": 1}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"strategyId": 1, "date": "2024-03-01"}));

        let (status, body) = call(&app, Method::GET, "/api/daily", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["strategyId"], 1);

        let (status, _) =
            call(&app, Method::PUT, "/api/daily", Some(json!({"strategyId": 77}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[cfg(test)]
mod error_tests {
    use crate::error::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use kernel::error::kind::ErrorKind;
    use kernel::id::StrategyId;

    #[test]
    fn test_error_status_codes() {
        let cases = vec![
            (StrategyError::NotFound(Some(StrategyId::new(1))), StatusCode::NOT_FOUND),
            (StrategyError::NotFound(None), StatusCode::NOT_FOUND),
            (StrategyError::DailyNotFound, StatusCode::NOT_FOUND),
            (StrategyError::Unauthenticated("manage favorites"), StatusCode::UNAUTHORIZED),
            (StrategyError::Unavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (StrategyError::Upstream("x".into()), StatusCode::BAD_GATEWAY),
            (StrategyError::InvalidCatalog("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                StrategyError::ImportMismatch { expected: 3, stored: 2 },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (StrategyError::Database(sqlx::Error::PoolTimedOut), StatusCode::SERVICE_UNAVAILABLE),
            (StrategyError::Database(sqlx::Error::RowNotFound), StatusCode::INTERNAL_SERVER_ERROR),
            (StrategyError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status_code(), expected, "{error}");
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = StrategyError::Internal("connection string leaked".into());
        assert_eq!(err.to_app_error().message(), "Internal server error");
        assert_eq!(err.kind(), ErrorKind::InternalServerError);
        assert!(!err.is_transient());
    }
}
