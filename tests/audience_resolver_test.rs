// ABOUTME: Integration tests for notification audience resolution
// ABOUTME: Target selectors, role filters, login recency windows and status restriction
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::collections::HashSet;

use chrono::{Duration, Utc};
use coachline_server::{
    config::AudienceConfig,
    database::Database,
    errors::ErrorCode,
    models::{AudienceSpec, TargetType, UserRole, UserStatus},
    services::AudienceResolver,
};
use uuid::Uuid;

fn resolver(database: &Database) -> AudienceResolver {
    AudienceResolver::new(database.clone(), AudienceConfig::default())
}

fn spec(target_type: TargetType, target_ids: Vec<Uuid>, role_filter: Option<UserRole>) -> AudienceSpec {
    AudienceSpec {
        target_type,
        target_ids,
        role_filter,
    }
}

fn ids(recipients: &[coachline_server::models::Recipient]) -> HashSet<Uuid> {
    recipients.iter().map(|recipient| recipient.id).collect()
}

#[tokio::test]
async fn test_specific_returns_active_listed_users_once() {
    let database = common::create_test_database().await;
    let ana = common::create_user(&database, "Ana", UserRole::Client).await;
    let ben = common::create_user(&database, "Ben", UserRole::Client).await;
    let suspended = common::create_suspended_user(&database, "Sus").await;
    common::create_user(&database, "Unlisted", UserRole::Client).await;

    let recipients = resolver(&database)
        .resolve(
            &spec(
                TargetType::Specific,
                vec![ana.id, ben.id, ana.id, suspended.id, Uuid::new_v4()],
                None,
            ),
            Utc::now(),
        )
        .await
        .unwrap();

    assert_eq!(recipients.len(), 2);
    assert_eq!(ids(&recipients), HashSet::from([ana.id, ben.id]));
}

#[tokio::test]
async fn test_all_excludes_non_active_statuses() {
    let database = common::create_test_database().await;
    let active = common::create_user(&database, "Active", UserRole::Client).await;
    common::create_suspended_user(&database, "Suspended").await;
    common::create_user_with(&database, "Dormant", UserRole::Client, |user| {
        user.status = UserStatus::Inactive;
    })
    .await;

    let recipients = resolver(&database)
        .resolve(&spec(TargetType::All, Vec::new(), None), Utc::now())
        .await
        .unwrap();

    assert_eq!(ids(&recipients), HashSet::from([active.id]));
}

#[tokio::test]
async fn test_all_with_no_active_users_is_empty_audience() {
    let database = common::create_test_database().await;
    common::create_suspended_user(&database, "Suspended").await;

    let error = resolver(&database)
        .resolve(&spec(TargetType::All, Vec::new(), None), Utc::now())
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::EmptyAudience);
    assert_eq!(error.http_status(), 400);
}

#[tokio::test]
async fn test_inactive_includes_never_logged_in_and_excludes_recent_logins() {
    let database = common::create_test_database().await;
    let now = Utc::now();
    let never = common::create_user_last_seen(&database, "Never", None).await;
    let long_ago = common::create_user_last_seen(&database, "LongAgo", Some(now - Duration::days(45))).await;
    common::create_user_last_seen(&database, "TenDays", Some(now - Duration::days(10))).await;
    common::create_user_last_seen(&database, "Yesterday", Some(now - Duration::days(1))).await;

    let recipients = resolver(&database)
        .resolve(&spec(TargetType::Inactive, Vec::new(), None), now)
        .await
        .unwrap();

    assert_eq!(ids(&recipients), HashSet::from([never.id, long_ago.id]));
}

#[tokio::test]
async fn test_active_uses_seven_day_window() {
    let database = common::create_test_database().await;
    let now = Utc::now();
    let recent = common::create_user_last_seen(&database, "Recent", Some(now - Duration::days(2))).await;
    common::create_user_last_seen(&database, "TenDays", Some(now - Duration::days(10))).await;
    common::create_user_last_seen(&database, "Never", None).await;

    let recipients = resolver(&database)
        .resolve(&spec(TargetType::Active, Vec::new(), None), now)
        .await
        .unwrap();

    assert_eq!(ids(&recipients), HashSet::from([recent.id]));
}

#[tokio::test]
async fn test_role_target_selects_by_role_filter() {
    let database = common::create_test_database().await;
    let coach = common::create_user(&database, "Coach", UserRole::Coach).await;
    common::create_user(&database, "Client", UserRole::Client).await;

    let recipients = resolver(&database)
        .resolve(&spec(TargetType::Role, Vec::new(), Some(UserRole::Coach)), Utc::now())
        .await
        .unwrap();

    assert_eq!(ids(&recipients), HashSet::from([coach.id]));
}

#[tokio::test]
async fn test_role_filter_narrows_other_targets() {
    let database = common::create_test_database().await;
    let organization = Uuid::new_v4();
    let coach = common::create_user_with(&database, "Coach", UserRole::Coach, |user| {
        user.organization_id = Some(organization);
    })
    .await;
    common::create_user_with(&database, "Client", UserRole::Client, |user| {
        user.organization_id = Some(organization);
    })
    .await;

    let recipients = resolver(&database)
        .resolve(
            &spec(TargetType::Organization, vec![organization], Some(UserRole::Coach)),
            Utc::now(),
        )
        .await
        .unwrap();

    assert_eq!(ids(&recipients), HashSet::from([coach.id]));
}

#[tokio::test]
async fn test_department_target_matches_department_ids() {
    let database = common::create_test_database().await;
    let department = Uuid::new_v4();
    let member = common::create_user_with(&database, "Member", UserRole::Client, |user| {
        user.department_id = Some(department);
    })
    .await;
    common::create_user_with(&database, "Elsewhere", UserRole::Client, |user| {
        user.department_id = Some(Uuid::new_v4());
    })
    .await;

    let recipients = resolver(&database)
        .resolve(&spec(TargetType::Department, vec![department], None), Utc::now())
        .await
        .unwrap();

    assert_eq!(ids(&recipients), HashSet::from([member.id]));
}

#[tokio::test]
async fn test_out_of_range_window_is_an_error_not_a_panic() {
    let database = common::create_test_database().await;
    common::create_user(&database, "Ana", UserRole::Client).await;
    let windows = AudienceConfig {
        active_window_days: i64::MAX,
        ..AudienceConfig::default()
    };

    let error = AudienceResolver::new(database, windows)
        .resolve(&spec(TargetType::Active, Vec::new(), None), Utc::now())
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::InternalError);
}
