//! Integration tests for the analytics endpoints.

mod common;

use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::PgPool;
use soundwave_api::state::AppState;

async fn record_song_1_purchase(state: &AppState) {
    let (status, _) = common::post_json(
        common::build_test_app(state),
        "/analytics/content-view",
        &json!({ "contentId": "song-1" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::post_json(
        common::build_test_app(state),
        "/analytics/transaction",
        &json!({
            "userId": "u1",
            "contentId": "song-1",
            "transactionType": "purchase",
            "amount": 10
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

async fn assert_song_1_dashboard(state: &AppState) {
    let (status, overview) =
        common::get_json(common::build_test_app(state), "/analytics/overview").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(overview["totalViews"], 1);
    assert_eq!(overview["totalRevenue"].as_f64(), Some(10.0));
    assert_eq!(overview["totalEngagements"], 0);
    // The view was anonymous.
    assert_eq!(overview["activeUsers"], 0);

    let (status, top) =
        common::get_json(common::build_test_app(state), "/analytics/top-content?limit=5").await;
    assert_eq!(status, StatusCode::OK);
    let top = top.as_array().unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0]["contentId"], "song-1");
    assert_eq!(top[0]["title"], "song-1");
    assert_eq!(top[0]["views"], 1);
    assert_eq!(top[0]["revenue"].as_f64(), Some(10.0));
    assert_eq!(top[0]["engagements"], 0);
}

// --- in-memory store ---

#[tokio::test]
async fn test_view_then_purchase_shows_on_dashboard() {
    // Arrange
    let state = common::in_memory_state();

    // Act
    record_song_1_purchase(&state).await;

    // Assert
    assert_song_1_dashboard(&state).await;
}

#[tokio::test]
async fn test_empty_store_returns_zeros_and_empty_lists() {
    let state = common::in_memory_state();

    let (status, overview) =
        common::get_json(common::build_test_app(&state), "/analytics/overview").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(overview["totalViews"], 0);
    assert_eq!(overview["totalRevenue"].as_f64(), Some(0.0));
    assert_eq!(overview["totalEngagements"], 0);
    assert_eq!(overview["activeUsers"], 0);

    for uri in [
        "/analytics/daily-views",
        "/analytics/daily-revenue",
        "/analytics/top-content",
        "/analytics/engagement-by-type",
        "/analytics/views-by-platform",
        "/analytics/daily-metrics",
    ] {
        let (status, json) = common::get_json(common::build_test_app(&state), uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(json, json!([]), "{uri}");
    }
}

#[tokio::test]
async fn test_engagement_without_user_id_returns_400_and_writes_nothing() {
    // Arrange
    let state = common::in_memory_state();

    // Act
    let (status, json) = common::post_json(
        common::build_test_app(&state),
        "/analytics/engagement",
        &json!({ "eventType": "like" }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "validation_error");
    assert_eq!(json["message"], "validation error: userId is required");

    let (_, overview) =
        common::get_json(common::build_test_app(&state), "/analytics/overview").await;
    assert_eq!(overview["totalEngagements"], 0);
}

#[tokio::test]
async fn test_transaction_without_amount_returns_400() {
    let state = common::in_memory_state();

    let (status, json) = common::post_json(
        common::build_test_app(&state),
        "/analytics/transaction",
        &json!({ "userId": "u1", "transactionType": "purchase" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn test_transaction_fee_is_rounded_to_cents() {
    let state = common::in_memory_state();

    let (status, json) = common::post_json(
        common::build_test_app(&state),
        "/analytics/transaction",
        &json!({ "userId": "u1", "transactionType": "purchase", "amount": 0.5 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["platformFee"].as_f64(), Some(0.03));
    assert_eq!(json["creatorRevenue"].as_f64(), Some(0.47));
}

#[tokio::test]
async fn test_top_content_respects_limit_and_ranking() {
    // Arrange
    let state = common::in_memory_state();
    for content_id in ["song-b", "song-a", "song-c", "song-a", "song-b", "song-a"] {
        common::post_json(
            common::build_test_app(&state),
            "/analytics/content-view",
            &json!({ "contentId": content_id }),
        )
        .await;
    }

    // Act
    let (status, top) =
        common::get_json(common::build_test_app(&state), "/analytics/top-content?limit=2").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = top
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["contentId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["song-a", "song-b"]);
}

#[tokio::test]
async fn test_breakdowns_and_daily_views() {
    // Arrange
    let state = common::in_memory_state();
    for platform in ["ios", "web", "ios"] {
        common::post_json(
            common::build_test_app(&state),
            "/analytics/content-view",
            &json!({ "contentId": "song-1", "userId": "u1", "platform": platform }),
        )
        .await;
    }
    for event_type in ["like", "comment", "like"] {
        common::post_json(
            common::build_test_app(&state),
            "/analytics/engagement",
            &json!({ "userId": "u1", "eventType": event_type, "contentId": "song-1" }),
        )
        .await;
    }

    // Act
    let (_, platforms) =
        common::get_json(common::build_test_app(&state), "/analytics/views-by-platform").await;
    let (_, engagements) =
        common::get_json(common::build_test_app(&state), "/analytics/engagement-by-type").await;
    let (_, daily) =
        common::get_json(common::build_test_app(&state), "/analytics/daily-views").await;
    let (_, overview) =
        common::get_json(common::build_test_app(&state), "/analytics/overview").await;

    // Assert
    assert_eq!(
        platforms,
        json!([{ "platform": "ios", "count": 2 }, { "platform": "web", "count": 1 }])
    );
    assert_eq!(
        engagements,
        json!([{ "type": "like", "count": 2 }, { "type": "comment", "count": 1 }])
    );
    assert_eq!(daily, json!([{ "date": "2026-01-15", "value": 3 }]));
    assert_eq!(overview["activeUsers"], 1);
}

#[tokio::test]
async fn test_refresh_then_read_daily_metrics() {
    // Arrange
    let state = common::in_memory_state();
    record_song_1_purchase(&state).await;

    // Act
    let (status, refreshed) = common::post_empty(
        common::build_test_app(&state),
        "/analytics/daily-metrics/refresh?date=2026-01-15",
    )
    .await;
    let (_, stored) =
        common::get_json(common::build_test_app(&state), "/analytics/daily-metrics").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(refreshed["date"], "2026-01-15");
    assert_eq!(refreshed["totalViews"], 1);
    assert_eq!(refreshed["totalTransactions"], 1);
    assert_eq!(refreshed["totalRevenue"].as_f64(), Some(10.0));
    assert_eq!(stored, json!([refreshed]));
}

#[tokio::test]
async fn test_refresh_with_malformed_date_returns_400() {
    let state = common::in_memory_state();

    let (status, json) = common::post_empty(
        common::build_test_app(&state),
        "/analytics/daily-metrics/refresh?date=yesterday",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}

// --- PostgreSQL store ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_pg_view_then_purchase_shows_on_dashboard(pool: PgPool) {
    // Arrange
    let state = common::pg_state(pool);

    // Act
    record_song_1_purchase(&state).await;

    // Assert
    assert_song_1_dashboard(&state).await;
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_pg_top_content_uses_catalog_title(pool: PgPool) {
    // Arrange
    sqlx::query("INSERT INTO content (id, title) VALUES ($1, $2)")
        .bind("song-1")
        .bind("First Light")
        .execute(&pool)
        .await
        .unwrap();
    let state = common::pg_state(pool);
    record_song_1_purchase(&state).await;

    // Act
    let (status, top) =
        common::get_json(common::build_test_app(&state), "/analytics/top-content").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(top[0]["title"], "First Light");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_pg_refresh_is_idempotent(pool: PgPool) {
    let state = common::pg_state(pool);
    record_song_1_purchase(&state).await;

    for _ in 0..2 {
        let (status, _) = common::post_empty(
            common::build_test_app(&state),
            "/analytics/daily-metrics/refresh",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, stored) =
        common::get_json(common::build_test_app(&state), "/analytics/daily-metrics").await;

    let rows = stored.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["totalViews"], 1);
    assert_eq!(rows[0]["totalRevenue"].as_f64(), Some(10.0));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_pg_amount_at_the_cap_returns_400_and_writes_nothing(pool: PgPool) {
    // Arrange
    let state = common::pg_state(pool.clone());

    // Act
    let (status, json) = common::post_json(
        common::build_test_app(&state),
        "/analytics/transaction",
        &json!({ "userId": "u1", "transactionType": "purchase", "amount": 5_000_000_000_000.0 }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_pg_amount_with_nine_decimal_places_returns_400(pool: PgPool) {
    let state = common::pg_state(pool.clone());

    let (status, json) = common::post_json(
        common::build_test_app(&state),
        "/analytics/transaction",
        &json!({ "userId": "u1", "transactionType": "purchase", "amount": "0.123456789" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_pg_stored_split_matches_the_response(pool: PgPool) {
    // Arrange
    let state = common::pg_state(pool.clone());

    // Act
    let (status, json) = common::post_json(
        common::build_test_app(&state),
        "/analytics/transaction",
        &json!({ "userId": "u1", "transactionType": "purchase", "amount": "0.12345678" }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let stored: (Decimal, Decimal, Decimal) =
        sqlx::query_as("SELECT amount, platform_fee, creator_revenue FROM transactions")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(
        stored,
        (
            Decimal::new(12_345_678, 8),
            Decimal::new(1, 2),
            Decimal::new(11_345_678, 8)
        )
    );
    assert_eq!(
        json["creatorRevenue"].as_f64(),
        rust_decimal::prelude::ToPrimitive::to_f64(&stored.2)
    );
}
