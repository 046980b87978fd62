// ABOUTME: HTTP-level tests for the assembled router
// ABOUTME: Status codes, response shapes, actor header handling and request id propagation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::Arc;

use axum::Router;
use coachline_server::{database::Database, models::UserRole, server};
use common::RecordingQueue;
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};
use uuid::Uuid;

const MONDAY: &str = "2025-01-06";

async fn setup() -> (Database, Router) {
    let database = common::create_test_database().await;
    let resources = common::create_test_resources(database.clone(), Arc::new(RecordingQueue::default()));
    let router = server::build_router(&resources);
    (database, router)
}

#[tokio::test]
async fn test_health_and_ready() {
    let (_, router) = setup().await;

    let health = AxumTestRequest::get("/health").send(router.clone()).await;
    assert_eq!(health.status(), 200);
    let body: Value = health.json();
    assert_eq!(body["status"], "healthy");

    let ready = AxumTestRequest::get("/ready").send(router).await;
    assert_eq!(ready.status(), 200);
    let body: Value = ready.json();
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn test_request_id_is_generated_and_echoed() {
    let (_, router) = setup().await;

    let generated = AxumTestRequest::get("/health").send(router.clone()).await;
    assert!(generated.header("x-request-id").is_some());

    let echoed = AxumTestRequest::get("/health")
        .header("x-request-id", "req-123")
        .send(router)
        .await;
    assert_eq!(echoed.header("x-request-id"), Some("req-123"));
}

#[tokio::test]
async fn test_available_slots_response_shape() {
    let (database, router) = setup().await;
    let coach = common::create_user(&database, "Coach", UserRole::Coach).await;
    common::create_weekly_block(&database, coach.id, 1, "09:00", "10:00").await;

    let response = AxumTestRequest::get(&format!(
        "/coaches/{}/available-slots?date={MONDAY}&duration=30",
        coach.id
    ))
    .send(router)
    .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({
            "date": MONDAY,
            "slots": [
                {"time": "09:00", "datetime": "2025-01-06T09:00:00", "available": true},
                {"time": "09:30", "datetime": "2025-01-06T09:30:00", "available": true}
            ]
        })
    );
}

#[tokio::test]
async fn test_available_slots_validation_errors() {
    let (database, router) = setup().await;
    let coach = common::create_user(&database, "Coach", UserRole::Coach).await;

    let missing_date = AxumTestRequest::get(&format!("/coaches/{}/available-slots", coach.id))
        .send(router.clone())
        .await;
    assert_eq!(missing_date.status(), 422);
    let body: Value = missing_date.json();
    assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
    assert!(body["error"]["details"]["fields"]["date"].is_array());

    let bad_duration = AxumTestRequest::get(&format!(
        "/coaches/{}/available-slots?date={MONDAY}&duration=5",
        coach.id
    ))
    .send(router)
    .await;
    assert_eq!(bad_duration.status(), 422);
    let body: Value = bad_duration.json();
    assert!(body["error"]["details"]["fields"]["duration"].is_array());
}

#[tokio::test]
async fn test_dates_beyond_four_digit_years_are_rejected() {
    let (database, router) = setup().await;
    let coach = common::create_user(&database, "Coach", UserRole::Coach).await;
    let client = common::create_user(&database, "Client", UserRole::Client).await;

    let far_date = AxumTestRequest::get(&format!(
        "/coaches/{}/available-slots?date=%2B262142-12-31&duration=30",
        coach.id
    ))
    .send(router.clone())
    .await;
    assert_eq!(far_date.status(), 422);
    let body: Value = far_date.json();
    assert!(body["error"]["details"]["fields"]["date"].is_array());

    for (scheduled_at, minutes) in [("+262142-12-31T23:00:00", 30), ("9999-12-31T23:00:00", 120)] {
        let response = AxumTestRequest::post("/appointments")
            .actor(client.id)
            .json(&json!({
                "coachId": coach.id.to_string(),
                "clientId": client.id.to_string(),
                "scheduledAt": scheduled_at,
                "durationMinutes": minutes
            }))
            .send(router.clone())
            .await;
        assert_eq!(response.status(), 422, "{scheduled_at}");
        let body: Value = response.json();
        assert!(body["error"]["details"]["fields"]["scheduledAt"].is_array());
    }

    // 9999-12-31 is a Friday
    common::create_weekly_block(&database, coach.id, 5, "22:00", "23:00").await;
    let booked = AxumTestRequest::post("/appointments")
        .actor(client.id)
        .json(&json!({
            "coachId": coach.id.to_string(),
            "clientId": client.id.to_string(),
            "scheduledAt": "9999-12-31T22:00:00",
            "durationMinutes": 60
        }))
        .send(router.clone())
        .await;
    assert_eq!(booked.status(), 201);

    let last_day = AxumTestRequest::get(&format!(
        "/coaches/{}/available-slots?date=9999-12-31&duration=60",
        coach.id
    ))
    .send(router)
    .await;
    assert_eq!(last_day.status(), 200);
    let body: Value = last_day.json();
    assert_eq!(
        body["slots"],
        json!([{"time": "22:00", "datetime": "9999-12-31T22:00:00", "available": false}])
    );
}

#[tokio::test]
async fn test_available_slots_unknown_coach() {
    let (database, router) = setup().await;
    let client = common::create_user(&database, "Client", UserRole::Client).await;

    for coach in [Uuid::new_v4().to_string(), client.id.to_string(), "not-a-uuid".to_owned()] {
        let response = AxumTestRequest::get(&format!(
            "/coaches/{coach}/available-slots?date={MONDAY}"
        ))
        .send(router.clone())
        .await;
        assert_eq!(response.status(), 404, "coach {coach}");
    }
}

#[tokio::test]
async fn test_writes_require_actor() {
    let (_, router) = setup().await;
    let body = json!({"title": "t", "message": "m", "type": "info", "priority": "low", "targetType": "all"});

    let missing = AxumTestRequest::post("/notifications/send")
        .json(&body)
        .send(router.clone())
        .await;
    assert_eq!(missing.status(), 401);
    let error: Value = missing.json();
    assert_eq!(error["error"]["code"], "AUTH_REQUIRED");

    let malformed = AxumTestRequest::post("/notifications/send")
        .header("x-actor-id", "admin")
        .json(&body)
        .send(router)
        .await;
    assert_eq!(malformed.status(), 401);
    let error: Value = malformed.json();
    assert_eq!(error["error"]["code"], "AUTH_INVALID");
}

#[tokio::test]
async fn test_send_reports_every_invalid_field() {
    let (_, router) = setup().await;

    let response = AxumTestRequest::post("/notifications/send")
        .actor(Uuid::new_v4())
        .json(&json!({
            "title": "",
            "message": "Hello",
            "type": "shout",
            "priority": "high",
            "targetType": "specific",
            "actionUrl": "not a url"
        }))
        .send(router)
        .await;

    assert_eq!(response.status(), 422);
    let body: Value = response.json();
    let fields = &body["error"]["details"]["fields"];
    assert!(fields["title"].is_array());
    assert!(fields["type"].is_array());
    assert!(fields["targetIds"].is_array());
    assert!(fields["actionUrl"].is_array());
    assert!(fields["message"].is_null());
}

#[tokio::test]
async fn test_send_with_malformed_json_is_unprocessable() {
    let (_, router) = setup().await;

    let response = AxumTestRequest::post("/notifications/send")
        .actor(Uuid::new_v4())
        .raw_json("{\"title\": ")
        .send(router)
        .await;

    assert_eq!(response.status(), 422);
}

#[tokio::test]
async fn test_send_to_empty_audience_is_bad_request() {
    let (_, router) = setup().await;

    let response = AxumTestRequest::post("/notifications/send")
        .actor(Uuid::new_v4())
        .json(&json!({
            "title": "Hi",
            "message": "Nobody is here",
            "type": "info",
            "priority": "low",
            "targetType": "all"
        }))
        .send(router)
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "EMPTY_AUDIENCE");
}

#[tokio::test]
async fn test_send_and_list_user_notifications() {
    let (database, router) = setup().await;
    let user = common::create_user(&database, "Ana", UserRole::Client).await;

    let response = AxumTestRequest::post("/notifications/send")
        .actor(Uuid::new_v4())
        .json(&json!({
            "title": "Welcome",
            "message": "Your first session is booked.",
            "type": "success",
            "priority": "medium",
            "targetType": "specific",
            "targetIds": [user.id.to_string()],
            "sendEmail": true
        }))
        .send(router.clone())
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["summary"]["totalRecipients"], 1);
    assert_eq!(body["summary"]["emailsSent"], 1);
    assert_eq!(body["summary"]["smsSent"], 0);

    let listed = AxumTestRequest::get(&format!("/users/{}/notifications?limit=10", user.id))
        .send(router.clone())
        .await;
    assert_eq!(listed.status(), 200);
    let body: Value = listed.json();
    let notifications = body["notifications"].as_array().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["title"], "Welcome");
    assert_eq!(notifications[0]["isRead"], false);

    let bad_limit = AxumTestRequest::get(&format!("/users/{}/notifications?limit=zero", user.id))
        .send(router.clone())
        .await;
    assert_eq!(bad_limit.status(), 422);

    let unknown = AxumTestRequest::get(&format!("/users/{}/notifications", Uuid::new_v4()))
        .send(router)
        .await;
    assert_eq!(unknown.status(), 404);
}

#[tokio::test]
async fn test_availability_block_lifecycle() {
    let (database, router) = setup().await;
    let coach = common::create_user(&database, "Coach", UserRole::Coach).await;
    let actor = Uuid::new_v4();

    let created = AxumTestRequest::post(&format!("/coaches/{}/availability", coach.id))
        .actor(actor)
        .json(&json!({"startTime": "09:00", "endTime": "11:00", "dayOfWeek": 1, "isRecurring": true}))
        .send(router.clone())
        .await;
    assert_eq!(created.status(), 201);
    let block: Value = created.json();
    let block_id = block["id"].as_str().unwrap().to_owned();

    let updated = AxumTestRequest::put(&format!("/availability/{block_id}"))
        .actor(actor)
        .json(&json!({"startTime": "09:00", "endTime": "10:00", "dayOfWeek": 1, "isRecurring": true}))
        .send(router.clone())
        .await;
    assert_eq!(updated.status(), 200);

    let slots = AxumTestRequest::get(&format!(
        "/coaches/{}/available-slots?date={MONDAY}&duration=60",
        coach.id
    ))
    .send(router.clone())
    .await;
    let body: Value = slots.json();
    assert_eq!(body["slots"].as_array().unwrap().len(), 1);

    let listed = AxumTestRequest::get(&format!("/coaches/{}/availability", coach.id))
        .send(router.clone())
        .await;
    let body: Value = listed.json();
    assert_eq!(body["availability"].as_array().unwrap().len(), 1);

    let deleted = AxumTestRequest::delete(&format!("/availability/{block_id}"))
        .actor(actor)
        .send(router.clone())
        .await;
    assert_eq!(deleted.status(), 204);
    assert!(deleted.is_empty());

    let missing = AxumTestRequest::delete(&format!("/availability/{block_id}"))
        .actor(actor)
        .send(router)
        .await;
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn test_invalid_availability_block_is_rejected() {
    let (database, router) = setup().await;
    let coach = common::create_user(&database, "Coach", UserRole::Coach).await;

    let response = AxumTestRequest::post(&format!("/coaches/{}/availability", coach.id))
        .actor(Uuid::new_v4())
        .json(&json!({"startTime": "11:00", "endTime": "09:00", "isRecurring": true}))
        .send(router)
        .await;

    assert_eq!(response.status(), 422);
    let body: Value = response.json();
    let fields = &body["error"]["details"]["fields"];
    assert!(fields["endTime"].is_array());
    assert!(fields["dayOfWeek"].is_array());
}

#[tokio::test]
async fn test_appointment_lifecycle_over_http() {
    let (database, router) = setup().await;
    let coach = common::create_user(&database, "Coach", UserRole::Coach).await;
    let client = common::create_user(&database, "Client", UserRole::Client).await;
    common::create_weekly_block(&database, coach.id, 1, "09:00", "10:00").await;
    let actor = client.id;

    let booked = AxumTestRequest::post("/appointments")
        .actor(actor)
        .json(&json!({
            "coachId": coach.id.to_string(),
            "clientId": client.id.to_string(),
            "scheduledAt": "2025-01-06 09:00:00",
            "durationMinutes": 30
        }))
        .send(router.clone())
        .await;
    assert_eq!(booked.status(), 201);
    let appointment: Value = booked.json();
    assert_eq!(appointment["status"], "scheduled");
    let id = appointment["id"].as_str().unwrap().to_owned();

    let clash = AxumTestRequest::post("/appointments")
        .actor(actor)
        .json(&json!({
            "coachId": coach.id.to_string(),
            "clientId": client.id.to_string(),
            "scheduledAt": "2025-01-06 09:15:00",
            "durationMinutes": 30
        }))
        .send(router.clone())
        .await;
    assert_eq!(clash.status(), 409);

    let slots = AxumTestRequest::get(&format!(
        "/coaches/{}/available-slots?date={MONDAY}&duration=30",
        coach.id
    ))
    .send(router.clone())
    .await;
    let body: Value = slots.json();
    assert_eq!(body["slots"][0]["available"], false);
    assert_eq!(body["slots"][1]["available"], true);

    let moved = AxumTestRequest::post(&format!("/appointments/{id}/reschedule"))
        .actor(actor)
        .json(&json!({"scheduledAt": "2025-01-06 09:30:00"}))
        .send(router.clone())
        .await;
    assert_eq!(moved.status(), 200);
    let body: Value = moved.json();
    assert_eq!(body["status"], "rescheduled");
    assert_eq!(body["id"], id.as_str());

    let cancelled = AxumTestRequest::post(&format!("/appointments/{id}/cancel"))
        .actor(actor)
        .json(&json!({"reason": "Travelling"}))
        .send(router.clone())
        .await;
    assert_eq!(cancelled.status(), 200);
    let body: Value = cancelled.json();
    assert_eq!(body["status"], "cancelled");
    assert_eq!(body["cancellationReason"], "Travelling");

    let terminal = AxumTestRequest::put(&format!("/appointments/{id}/status"))
        .actor(actor)
        .json(&json!({"status": "completed"}))
        .send(router.clone())
        .await;
    assert_eq!(terminal.status(), 409);

    let fetched = AxumTestRequest::get(&format!("/appointments/{id}"))
        .send(router)
        .await;
    assert_eq!(fetched.status(), 200);
}

#[tokio::test]
async fn test_cancel_without_body_and_unknown_appointment() {
    let (database, router) = setup().await;
    let coach = common::create_user(&database, "Coach", UserRole::Coach).await;
    let client = common::create_user(&database, "Client", UserRole::Client).await;

    let booked = AxumTestRequest::post("/appointments")
        .actor(client.id)
        .json(&json!({
            "coachId": coach.id.to_string(),
            "clientId": client.id.to_string(),
            "scheduledAt": "2025-01-07T14:00:00",
            "durationMinutes": 45
        }))
        .send(router.clone())
        .await;
    let appointment: Value = booked.json();
    let id = appointment["id"].as_str().unwrap().to_owned();

    let cancelled = AxumTestRequest::post(&format!("/appointments/{id}/cancel"))
        .actor(client.id)
        .send(router.clone())
        .await;
    assert_eq!(cancelled.status(), 200);

    let unknown = AxumTestRequest::get(&format!("/appointments/{}", Uuid::new_v4()))
        .send(router.clone())
        .await;
    assert_eq!(unknown.status(), 404);

    let malformed = AxumTestRequest::get("/appointments/not-a-uuid").send(router).await;
    assert_eq!(malformed.status(), 404);
}
