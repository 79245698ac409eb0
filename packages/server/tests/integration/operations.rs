use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use import_server::utils::jwt::AccountType;

use crate::common::{TestApp, routes, token_for};

fn timestamp(value: &serde_json::Value) -> DateTime<Utc> {
    value
        .as_str()
        .expect("timestamp should be a string")
        .parse()
        .expect("timestamp should be RFC 3339")
}

mod create_and_get {
    use super::*;

    #[tokio::test]
    async fn new_operation_is_pending_for_24_hours() {
        let app = TestApp::spawn().await;
        let token = token_for("admin", AccountType::Admin);

        let res = app.post_empty_with_token(routes::IMPORTS, &token).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["status"], "pending");

        let created_at = timestamp(&res.body["created_at"]);
        let expires_at = timestamp(&res.body["expires_at"]);
        assert_eq!(expires_at - created_at, Duration::hours(24));
        assert!(created_at <= Utc::now());

        let id = res.uuid();
        assert_eq!(Uuid::parse_str(&id).unwrap().get_version_num(), 4);

        let fetched = app.get_with_token(&routes::operation(&id), &token).await;
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.body, res.body);
    }

    #[tokio::test]
    async fn list_returns_own_operations_oldest_first() {
        let app = TestApp::spawn().await;
        let admin = token_for("admin", AccountType::Admin);
        let other = token_for("team-a", AccountType::Service);

        let first = app.create_operation(&admin).await;
        let second = app.create_operation(&admin).await;
        let foreign = app.create_operation(&other).await;

        let res = app.get_with_token(routes::IMPORTS, &admin).await;
        assert_eq!(res.status, 200);
        let ids: Vec<&str> = res
            .body
            .as_array()
            .expect("list should be an array")
            .iter()
            .map(|op| op["uuid"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec![first.as_str(), second.as_str()]);

        let res = app.get_with_token(routes::IMPORTS, &other).await;
        assert_eq!(res.body.as_array().unwrap().len(), 1);
        assert_eq!(res.body[0]["uuid"], foreign.as_str());
    }

    #[tokio::test]
    async fn foreign_and_missing_operations_are_indistinguishable() {
        let app = TestApp::spawn().await;
        let admin = token_for("admin", AccountType::Admin);
        let other = token_for("team-a", AccountType::Service);

        let foreign = app.create_operation(&other).await;

        let res = app.get_with_token(&routes::operation(&foreign), &admin).await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");

        let missing = Uuid::new_v4().to_string();
        let res = app.get_with_token(&routes::operation(&missing), &admin).await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");

        let res = app.get_with_token(&routes::operation("not-a-uuid"), &admin).await;
        assert_eq!(res.status, 404);
    }
}

mod invalidate {
    use super::*;

    #[tokio::test]
    async fn invalidate_is_idempotent() {
        let app = TestApp::spawn().await;
        let token = token_for("admin", AccountType::Admin);
        let id = app.create_operation(&token).await;

        let first = app.delete_with_token(&routes::operation(&id), &token).await;
        assert_eq!(first.status, 200);
        assert_eq!(first.body["status"], "invalidated");

        let second = app.delete_with_token(&routes::operation(&id), &token).await;
        assert_eq!(second.status, 200);
        assert_eq!(second.body, first.body);
    }

    #[tokio::test]
    async fn completed_operation_is_not_invalidated() {
        let app = TestApp::spawn().await;
        let token = token_for("admin", AccountType::Admin);
        let id = app.create_operation(&token).await;

        let res = app
            .put_with_token(&routes::operation(&id), &json!({"status": "complete"}), &token)
            .await;
        assert_eq!(res.body["status"], "complete");

        let res = app.delete_with_token(&routes::operation(&id), &token).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"], "complete");
    }

    #[tokio::test]
    async fn invalidate_foreign_operation_is_not_found() {
        let app = TestApp::spawn().await;
        let other = token_for("team-a", AccountType::Service);
        let id = app.create_operation(&other).await;

        let admin = token_for("admin", AccountType::Admin);
        let res = app.delete_with_token(&routes::operation(&id), &admin).await;
        assert_eq!(res.status, 404);

        let res = app.get_with_token(&routes::operation(&id), &other).await;
        assert_eq!(res.body["status"], "pending");
    }
}

mod update_status {
    use super::*;

    #[tokio::test]
    async fn walks_the_happy_path() {
        let app = TestApp::spawn().await;
        let token = token_for("admin", AccountType::Admin);
        let id = app.create_operation(&token).await;

        let res = app
            .put_with_token(&routes::operation(&id), &json!({"status": "active"}), &token)
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"], "active");
        assert!(timestamp(&res.body["last_updated"]) >= timestamp(&res.body["created_at"]));

        let res = app
            .put_with_token(&routes::operation(&id), &json!({"status": "complete"}), &token)
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"], "complete");
    }

    #[tokio::test]
    async fn invalidated_operation_ignores_updates() {
        let app = TestApp::spawn().await;
        let token = token_for("admin", AccountType::Admin);
        let id = app.create_operation(&token).await;

        let invalidated = app.delete_with_token(&routes::operation(&id), &token).await;

        let res = app
            .put_with_token(&routes::operation(&id), &json!({"status": "active"}), &token)
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body, invalidated.body);
    }

    #[tokio::test]
    async fn completed_operation_ignores_updates() {
        let app = TestApp::spawn().await;
        let token = token_for("admin", AccountType::Admin);
        let id = app.create_operation(&token).await;

        let completed = app
            .put_with_token(&routes::operation(&id), &json!({"status": "complete"}), &token)
            .await;
        assert_eq!(completed.body["status"], "complete");

        for status in ["active", "pending", "invalidated"] {
            let res = app
                .put_with_token(&routes::operation(&id), &json!({"status": status}), &token)
                .await;
            assert_eq!(res.status, 200);
            assert_eq!(res.body, completed.body, "update to {status} was applied");
        }

        let res = app.get_with_token(&routes::operation(&id), &token).await;
        assert_eq!(res.body["status"], "complete");
    }

    #[tokio::test]
    async fn missing_status_is_rejected() {
        let app = TestApp::spawn().await;
        let token = token_for("admin", AccountType::Admin);
        let id = app.create_operation(&token).await;

        let res = app
            .put_with_token(&routes::operation(&id), &json!({}), &token)
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "BAD_REQUEST");
        assert_eq!(res.body["message"], "status field required");
    }

    #[tokio::test]
    async fn unknown_status_is_rejected() {
        let app = TestApp::spawn().await;
        let token = token_for("admin", AccountType::Admin);
        let id = app.create_operation(&token).await;

        let res = app
            .put_with_token(&routes::operation(&id), &json!({"status": "finished"}), &token)
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "BAD_REQUEST");

        let res = app.get_with_token(&routes::operation(&id), &token).await;
        assert_eq!(res.body["status"], "pending");
    }

    #[tokio::test]
    async fn update_unknown_operation_is_not_found() {
        let app = TestApp::spawn().await;
        let token = token_for("admin", AccountType::Admin);

        let res = app
            .put_with_token(
                &routes::operation(&Uuid::new_v4().to_string()),
                &json!({"status": "active"}),
                &token,
            )
            .await;
        assert_eq!(res.status, 404);
    }
}
