//! Bulk send through `/api/assign` with a recording transport.

mod common;

use axum::http::StatusCode;
use common::{RecordingMailer, spawn_app, spawn_app_with_mailer, test_config, user, user_with};
use email_engine::config::MailConfig;
use email_engine::db::Gender;
use email_engine::state::SharedState;
use serde_json::json;

#[tokio::test]
async fn test_assign_sends_personalized_mail() {
    let app = spawn_app().await;
    let ids = app
        .add_users(vec![
            user_with(
                "Sahil",
                "mailidhaisahil@gmail.com",
                Some("Delhi"),
                None,
                Some(Gender::Male),
            ),
            user("User 2", "user2@example.com"),
        ])
        .await;
    let template_id = app
        .create_template("Hello there", "<p>Hi {{name}} from {{city}}. {{pronoun}} rocks.</p>")
        .await;

    let (status, body) = app
        .authed(
            "POST",
            "/api/assign",
            Some(json!({ "template_id": template_id, "user_ids": ids })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    assert_eq!(body["message"], "Email process completed");
    assert_eq!(body["template"], "Hello there");
    assert_eq!(body["success_count"], 2);
    assert_eq!(body["failed_count"], 0);
    assert!(body["id"].as_i64().unwrap() > 0);
    assert!(body["sent_at"].is_string());

    let success = body["details"]["success"].as_array().unwrap();
    assert_eq!(success[0]["user_id"], ids[0]);
    assert_eq!(success[0]["email"], "mailidhaisahil@gmail.com");
    assert_eq!(success[0]["name"], "Sahil");
    assert!(body["details"]["failed"].as_array().unwrap().is_empty());

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].to, "mailidhaisahil@gmail.com");
    assert_eq!(sent[0].from, "noreply@emailengine.com");
    assert_eq!(sent[0].subject, "Hello there");
    assert_eq!(sent[0].html, "<p>Hi Sahil from Delhi. He rocks.</p>");
    assert!(sent[0].text.contains("Hi Sahil from Delhi. He rocks."));
    assert_eq!(sent[1].html, "<p>Hi User 2 from . She rocks.</p>");
}

#[tokio::test]
async fn test_unknown_user_fails_without_stopping_batch() {
    let app = spawn_app().await;
    let ids = app
        .add_users(vec![
            user("Sahil", "mailidhaisahil@gmail.com"),
            user("User 2", "user2@example.com"),
        ])
        .await;
    let template_id = app.create_template("Welcome", "Hello {{name}}").await;

    let (status, body) = app
        .authed(
            "POST",
            "/api/assign",
            Some(json!({ "template_id": template_id, "user_ids": [ids[0], 9999, ids[1]] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success_count"], 2);
    assert_eq!(body["failed_count"], 1);

    let failed = body["details"]["failed"].as_array().unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0]["user_id"], 9999);
    assert_eq!(failed[0]["reason"], "User not found");

    let success: Vec<i64> = body["details"]["success"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["user_id"].as_i64().unwrap())
        .collect();
    assert_eq!(success, vec![i64::from(ids[0]), i64::from(ids[1])]);
}

#[tokio::test]
async fn test_transport_failures_are_collected() {
    let app = spawn_app_with_mailer(RecordingMailer::rejecting(&["user3@example.com"])).await;
    let ids = app
        .add_users(vec![
            user("User 2", "user2@example.com"),
            user("User 3", "user3@example.com"),
            user("Broken", "not-an-address"),
        ])
        .await;
    let template_id = app.create_template("Welcome", "Hello {{name}}").await;

    let (status, body) = app
        .authed(
            "POST",
            "/api/assign",
            Some(json!({ "template_id": template_id, "user_ids": ids })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success_count"], 1);
    assert_eq!(body["failed_count"], 2);

    let failed = body["details"]["failed"].as_array().unwrap();
    assert_eq!(failed[0]["user_id"], ids[1]);
    assert_eq!(failed[0]["reason"], "Connection refused");
    assert_eq!(failed[1]["user_id"], ids[2]);
    assert!(failed[1]["reason"].as_str().unwrap().contains("not-an-address"));

    let (_, history) = app.authed("GET", "/api/emails/history", None).await;
    assert_eq!(history[0]["recipients_count"], 3);
    assert_eq!(history[0]["success_count"], 1);
    assert_eq!(history[0]["failed_count"], 2);
}

#[tokio::test]
async fn test_missing_template_sends_nothing() {
    let app = spawn_app().await;
    let ids = app.add_users(vec![user("User 2", "user2@example.com")]).await;

    let (status, body) = app
        .authed(
            "POST",
            "/api/assign",
            Some(json!({ "template_id": 404, "user_ids": ids })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Template not found");

    assert!(app.mailer.sent().is_empty());
    let (_, history) = app.authed("GET", "/api/emails/history", None).await;
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_non_positive_template_id_is_not_found() {
    let app = spawn_app().await;
    let ids = app.add_users(vec![user("User 2", "user2@example.com")]).await;

    for template_id in [0, -1] {
        let (status, body) = app
            .authed(
                "POST",
                "/api/assign",
                Some(json!({ "template_id": template_id, "user_ids": ids })),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");
    }
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn test_default_mail_settings_fail_at_startup() {
    let mut config = test_config();
    config.mail = MailConfig::default();

    assert!(config.validate().is_err());
    assert!(SharedState::new(config).await.is_err());
}

#[tokio::test]
async fn test_history_records_one_row_per_send() {
    let app = spawn_app().await;
    let ids = app.add_users(vec![user("User 2", "user2@example.com")]).await;
    let template_id = app.create_template("Digest", "Hi {{name}}").await;

    let (_, report) = app
        .authed(
            "POST",
            "/api/assign",
            Some(json!({ "template_id": template_id, "user_ids": [ids[0], 77] })),
        )
        .await;

    let (_, history) = app.authed("GET", "/api/emails/history", None).await;
    let rows = history.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["email_id"], report["id"]);
    assert_eq!(rows[0]["template_id"], template_id);
    assert_eq!(rows[0]["template_name"], "Digest");
    assert_eq!(rows[0]["sent_at"], report["sent_at"]);
    assert_eq!(rows[0]["recipients_count"], 2);
    assert_eq!(
        rows[0]["success_count"].as_i64().unwrap() + rows[0]["failed_count"].as_i64().unwrap(),
        2
    );
    assert!(rows[0]["completed_at"].as_str() >= rows[0]["sent_at"].as_str());
}

#[tokio::test]
async fn test_resend_keeps_single_delivery_row() {
    let app = spawn_app().await;
    let ids = app.add_users(vec![user("User 2", "user2@example.com")]).await;
    let template_id = app.create_template("Reminder", "Hi {{name}}").await;
    let request = json!({ "template_id": template_id, "user_ids": ids });

    app.authed("POST", "/api/assign", Some(request.clone())).await;
    let store = app.state.store();
    let first = store.get_delivery(ids[0], template_id).await.unwrap().unwrap();

    let (status, _) = app.authed("POST", "/api/assign", Some(request)).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(store.count_deliveries_for_template(template_id).await.unwrap(), 1);
    let second = store.get_delivery(ids[0], template_id).await.unwrap().unwrap();
    assert_eq!(second.user_template_id, first.user_template_id);
    assert_eq!(second.first_sent_at, first.first_sent_at);
    assert!(second.last_sent_at >= first.last_sent_at);

    assert_eq!(app.mailer.sent().len(), 2);
    let (_, history) = app.authed("GET", "/api/emails/history", None).await;
    assert_eq!(history.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_template_keeps_history() {
    let app = spawn_app().await;
    let ids = app.add_users(vec![user("User 2", "user2@example.com")]).await;
    let template_id = app.create_template("Short lived", "Hi {{name}}").await;

    app.authed(
        "POST",
        "/api/assign",
        Some(json!({ "template_id": template_id, "user_ids": ids })),
    )
    .await;

    let (status, _) = app
        .authed("DELETE", &format!("/api/templates/{template_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let store = app.state.store();
    assert_eq!(store.count_deliveries_for_template(template_id).await.unwrap(), 0);

    let (_, history) = app.authed("GET", "/api/emails/history", None).await;
    assert_eq!(history[0]["template_name"], "Short lived");
}

#[tokio::test]
async fn test_interpolated_values_are_escaped() {
    let app = spawn_app().await;
    let ids = app
        .add_users(vec![user("<script>alert(1)</script>", "user2@example.com")])
        .await;
    let template_id = app
        .create_template("Escaping", "<h1>Hello {{name}}</h1>")
        .await;

    let (_, body) = app
        .authed(
            "POST",
            "/api/assign",
            Some(json!({ "template_id": template_id, "user_ids": ids })),
        )
        .await;
    assert_eq!(body["success_count"], 1);
    assert_eq!(body["details"]["success"][0]["name"], "<script>alert(1)</script>");

    let sent = app.mailer.sent();
    assert!(sent[0].html.starts_with("<h1>Hello &lt;script&gt;alert(1)&lt;"));
    assert!(!sent[0].html.contains("<script>"));
}

#[tokio::test]
async fn test_empty_recipient_list() {
    let app = spawn_app().await;
    let template_id = app.create_template("Nobody", "Hi").await;

    let (status, body) = app
        .authed(
            "POST",
            "/api/assign",
            Some(json!({ "template_id": template_id, "user_ids": [] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success_count"], 0);
    assert_eq!(body["failed_count"], 0);

    let (_, history) = app.authed("GET", "/api/emails/history", None).await;
    assert_eq!(history[0]["recipients_count"], 0);
}
