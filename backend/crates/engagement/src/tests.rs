//! Router-level tests against the in-memory store

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::application::config::EngagementConfig;
use crate::infra::memory::InMemoryEngagementRepository;
use crate::presentation::router::engagement_router_generic;

fn app() -> Router {
    engagement_router_generic(
        InMemoryEngagementRepository::new(),
        EngagementConfig::default(),
    )
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn raw_post(app: &Router, uri: &str, body: &'static str) -> StatusCode {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    app.clone().oneshot(request).await.unwrap().status()
}

mod user_tests {
    use super::*;

    #[tokio::test]
    async fn test_first_request_creates_demo_user() {
        let app = app();

        let (status, user) = call(&app, Method::GET, "/user", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user["username"], "demo_user");
        assert_eq!(user["points"], 0);
        assert!(user["lastCheckin"].is_null());
        assert!(user.get("password").is_none());

        let (_, again) = call(&app, Method::GET, "/user", None).await;
        assert_eq!(again["id"], user["id"]);
    }

    #[tokio::test]
    async fn test_newest_user_becomes_caller() {
        let app = app();
        let (_, demo) = call(&app, Method::GET, "/user", None).await;

        let (status, created) = call(
            &app,
            Method::POST,
            "/users",
            Some(json!({"username": "alice", "password": "secret"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_ne!(created["id"], demo["id"]);

        let (_, current) = call(&app, Method::GET, "/user", None).await;
        assert_eq!(current["username"], "alice");
    }

    #[tokio::test]
    async fn test_create_user_rejects_empty_password() {
        let app = app();
        let (status, body) = call(
            &app,
            Method::POST,
            "/users",
            Some(json!({"username": "bob", "password": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid data");
    }
}

mod message_tests {
    use super::*;

    #[tokio::test]
    async fn test_send_message_awards_point() {
        let app = app();
        let (_, before) = call(&app, Method::GET, "/user", None).await;

        let (status, message) = call(
            &app,
            Method::POST,
            "/messages",
            Some(json!({"content": "hello"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(message["content"], "hello");
        assert_eq!(message["userId"], before["id"]);

        let (_, after) = call(&app, Method::GET, "/user", None).await;
        assert_eq!(after["points"], before["points"].as_i64().unwrap() + 1);

        let (_, messages) = call(&app, Method::GET, "/messages", None).await;
        let messages = messages.as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["id"], message["id"]);
    }

    #[tokio::test]
    async fn test_send_message_invalid_body() {
        let app = app();

        let (status, body) = call(&app, Method::POST, "/messages", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid data");

        assert_eq!(
            raw_post(&app, "/messages", "{not json").await,
            StatusCode::BAD_REQUEST
        );

        let (_, user) = call(&app, Method::GET, "/user", None).await;
        assert_eq!(user["points"], 0);
    }
}

mod check_in_tests {
    use super::*;

    #[tokio::test]
    async fn test_check_in_once_per_day() {
        let app = app();

        let (status, user) = call(&app, Method::POST, "/checkin", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user["points"], 10);
        assert!(!user["lastCheckin"].is_null());

        let (status, body) = call(&app, Method::POST, "/checkin", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Already checked in today");

        let (_, user) = call(&app, Method::GET, "/user", None).await;
        assert_eq!(user["points"], 10);
    }

    #[tokio::test]
    async fn test_check_in_creates_notification() {
        let app = app();
        call(&app, Method::POST, "/checkin", None).await;

        let (_, notifications) = call(&app, Method::GET, "/notifications", None).await;
        let notifications = notifications.as_array().unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0]["title"], "Daily Check-in Complete!");
        assert_eq!(notifications[0]["read"], false);

        // a rejected second attempt adds nothing
        call(&app, Method::POST, "/checkin", None).await;
        let (_, notifications) = call(&app, Method::GET, "/notifications", None).await;
        assert_eq!(notifications.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_check_in_next_local_day() {
        use crate::application::CheckInUseCase;
        use chrono::{FixedOffset, TimeZone};
        use std::sync::Arc;

        let repo = Arc::new(InMemoryEngagementRepository::new());
        let config = Arc::new(EngagementConfig::default());
        let use_case = CheckInUseCase::new(repo.clone(), repo.clone(), config);
        let tz = FixedOffset::east_opt(9 * 3600).unwrap();

        let late = tz.with_ymd_and_hms(2025, 3, 1, 23, 59, 0).unwrap().to_utc();
        let early = tz.with_ymd_and_hms(2025, 3, 2, 0, 1, 0).unwrap().to_utc();
        let later = tz.with_ymd_and_hms(2025, 3, 2, 18, 0, 0).unwrap().to_utc();

        let user = tokio_test::assert_ok!(use_case.execute_at(late, &tz).await);
        assert_eq!(user.points, 10);

        let user = tokio_test::assert_ok!(use_case.execute_at(early, &tz).await);
        assert_eq!(user.points, 20);

        tokio_test::assert_err!(use_case.execute_at(later, &tz).await);
    }
}

mod leaderboard_tests {
    use super::*;

    #[tokio::test]
    async fn test_leaderboard_orders_and_pages() {
        let app = app();
        for i in 0..12 {
            call(
                &app,
                Method::POST,
                "/users",
                Some(json!({"username": format!("user{i}"), "password": "pw"})),
            )
            .await;
        }
        // newest user (user11) sends two messages
        call(&app, Method::POST, "/messages", Some(json!({"content": "a"}))).await;
        call(&app, Method::POST, "/messages", Some(json!({"content": "b"}))).await;

        let (status, first) = call(&app, Method::GET, "/leaderboard", None).await;
        assert_eq!(status, StatusCode::OK);
        let first = first.as_array().unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(first[0]["username"], "user11");
        assert_eq!(first[0]["points"], 2);
        assert_eq!(first[1]["username"], "user0");

        let (_, second) = call(&app, Method::GET, "/leaderboard?page=1", None).await;
        assert_eq!(second.as_array().unwrap().len(), 2);

        let (_, beyond) = call(&app, Method::GET, "/leaderboard?page=5", None).await;
        assert!(beyond.as_array().unwrap().is_empty());

        let (status, fallback) = call(&app, Method::GET, "/leaderboard?page=abc", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fallback.as_array().unwrap()[0]["username"], "user11");
    }
}

mod notification_tests {
    use super::*;

    async fn create(app: &Router, title: &str) -> Value {
        let (status, body) = call(
            app,
            Method::POST,
            "/notifications",
            Some(json!({"title": title, "message": "body"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    #[tokio::test]
    async fn test_mark_read() {
        let app = app();
        let created = create(&app, "hi").await;
        assert_eq!(created["read"], false);

        let uri = format!("/notifications/{}/read", created["id"]);
        let (status, updated) = call(&app, Method::PATCH, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["read"], true);
        assert_eq!(updated["id"], created["id"]);
    }

    #[tokio::test]
    async fn test_mark_read_unknown() {
        let app = app();

        let (status, body) = call(&app, Method::PATCH, "/notifications/999/read", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Notification not found");

        let (status, _) = call(&app, Method::PATCH, "/notifications/abc/read", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_mark_all_read() {
        let app = app();
        create(&app, "one").await;
        create(&app, "two").await;

        let (status, body) = call(&app, Method::POST, "/notifications/mark-all-read", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));

        let (_, list) = call(&app, Method::GET, "/notifications", None).await;
        assert!(list.as_array().unwrap().iter().all(|n| n["read"] == true));
    }

    #[tokio::test]
    async fn test_delete() {
        let app = app();
        let keep = create(&app, "keep").await;
        let gone = create(&app, "gone").await;

        let (status, _) = call(&app, Method::DELETE, "/notifications/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (_, list) = call(&app, Method::GET, "/notifications", None).await;
        assert_eq!(list.as_array().unwrap().len(), 2);

        let uri = format!("/notifications/{}", gone["id"]);
        let (status, body) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (_, list) = call(&app, Method::GET, "/notifications", None).await;
        let list = list.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["id"], keep["id"]);
    }
}

mod settings_tests {
    use super::*;

    #[tokio::test]
    async fn test_get_creates_defaults_once() {
        let app = app();

        let (status, first) = call(&app, Method::GET, "/settings", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["theme"], "light");
        assert_eq!(first["notifications"], true);
        assert_eq!(first["emailNotifications"], false);

        let (_, second) = call(&app, Method::GET, "/settings", None).await;
        assert_eq!(second["id"], first["id"]);
    }

    #[tokio::test]
    async fn test_patch_without_existing_settings() {
        let app = app();

        let (status, body) = call(
            &app,
            Method::PATCH,
            "/settings",
            Some(json!({"theme": "dark"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["theme"], "dark");
        assert_eq!(body["notifications"], true);
        assert_eq!(body["emailNotifications"], false);
    }

    #[tokio::test]
    async fn test_patch_existing_settings() {
        let app = app();
        call(
            &app,
            Method::PATCH,
            "/settings",
            Some(json!({"emailNotifications": true})),
        )
        .await;

        let (status, body) = call(
            &app,
            Method::PATCH,
            "/settings",
            Some(json!({"theme": "dark"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["theme"], "dark");
        assert_eq!(body["emailNotifications"], true);
    }

    #[tokio::test]
    async fn test_patch_wrong_type() {
        let app = app();
        let (status, body) = call(
            &app,
            Method::PATCH,
            "/settings",
            Some(json!({"notifications": "yes"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid data");
    }
}

mod referral_tests {
    use super::*;

    #[tokio::test]
    async fn test_stats_start_empty() {
        let app = app();
        let (status, stats) = call(&app, Method::GET, "/referral", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["referralCode"].as_str().unwrap().len(), 8);
        assert_eq!(stats["completedReferrals"], 0);
        assert_eq!(stats["pointsEarned"], 0);

        let (_, again) = call(&app, Method::GET, "/referral", None).await;
        assert_eq!(again["referralCode"], stats["referralCode"]);
    }

    #[tokio::test]
    async fn test_complete_awards_referrer() {
        let app = app();
        let (_, referrer) = call(&app, Method::GET, "/user", None).await;
        let (_, stats) = call(&app, Method::GET, "/referral", None).await;
        let code = stats["referralCode"].clone();

        let (_, friend) = call(
            &app,
            Method::POST,
            "/users",
            Some(json!({"username": "friend", "password": "pw"})),
        )
        .await;

        let body = json!({"referralCode": code, "userId": friend["id"]});
        let (status, result) =
            call(&app, Method::POST, "/referral/complete", Some(body.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(result["success"], true);

        // repeat completion does not pay twice
        let (status, _) = call(&app, Method::POST, "/referral/complete", Some(body)).await;
        assert_eq!(status, StatusCode::OK);

        let (_, board) = call(&app, Method::GET, "/leaderboard", None).await;
        let referrer_row = board
            .as_array()
            .unwrap()
            .iter()
            .find(|u| u["id"] == referrer["id"])
            .cloned()
            .unwrap();
        assert_eq!(referrer_row["points"], 50);
    }

    #[tokio::test]
    async fn test_complete_requires_fields() {
        let app = app();

        let (status, body) = call(
            &app,
            Method::POST,
            "/referral/complete",
            Some(json!({"referralCode": "ABCDEFGH"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Referral code and user ID are required");

        let (status, _) = call(
            &app,
            Method::POST,
            "/referral/complete",
            Some(json!({"userId": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_complete_unknown_code_or_user() {
        let app = app();
        let (_, user) = call(&app, Method::GET, "/user", None).await;

        let (status, body) = call(
            &app,
            Method::POST,
            "/referral/complete",
            Some(json!({"referralCode": "NOPE0000", "userId": user["id"]})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Invalid referral code");

        let (status, body) = call(
            &app,
            Method::POST,
            "/referral/complete",
            Some(json!({"referralCode": "NOPE0000", "userId": 4242})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "User not found");
    }
}
