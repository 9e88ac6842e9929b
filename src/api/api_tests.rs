#[cfg(test)]
mod router_tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::api::{app_state::AppState, create_router};
    use crate::clients::completion::{ChatMessage, CompletionClient};
    use crate::clients::payment_gateway::{GatewayOrder, PaymentGateway, sign, verify_signature};
    use crate::error::{AppError, Result};
    use crate::models::catalog::{ModelCatalog, default_catalog_entries};
    use crate::observability::AppMetrics;
    use crate::security::access_gate::AccessGate;
    use crate::security::auth::{JwtAuth, JwtTokenGenerator};
    use crate::security::password::PasswordHasher;
    use crate::security::rate_limit::{RateLimitConfig, RateLimiter};
    use crate::services::{create_account_service, create_chat_service, create_payment_service};
    use crate::storage::memory::in_memory_repositories;

    const JWT_SECRET: &str = "test-secret-with-at-least-32-characters";
    const GATEWAY_SECRET: &str = "rzp_test_secret";
    const STARTER_MODEL: &str = "x-ai/grok-4-fast:free";
    const ENTERPRISE_MODEL: &str = "enterprise/model-1";

    #[derive(Default)]
    struct StubCompletion {
        calls: AtomicUsize,
        fail: AtomicBool,
    }

    #[async_trait]
    impl CompletionClient for StubCompletion {
        async fn complete(&self, _model: &str, messages: &[ChatMessage]) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(AppError::UpstreamFault("upstream returned 503".into()));
            }
            Ok(format!("answer to {} messages", messages.len()))
        }
    }

    struct StubGateway;

    #[async_trait]
    impl PaymentGateway for StubGateway {
        async fn create_order(&self, amount: u64, currency: &str, receipt: &str) -> Result<GatewayOrder> {
            Ok(GatewayOrder {
                id: "order_api".into(),
                amount,
                currency: currency.into(),
                receipt: Some(receipt.into()),
            })
        }

        fn key_id(&self) -> &str {
            "rzp_test_key"
        }

        fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
            verify_signature(GATEWAY_SECRET, order_id, payment_id, signature)
        }
    }

    struct TestApp {
        router: Router,
        completion: Arc<StubCompletion>,
    }

    fn app() -> TestApp {
        app_with_limiter(RateLimiter::new(RateLimitConfig::default(), false))
    }

    fn app_with_limiter(rate_limiter: RateLimiter) -> TestApp {
        let repos = in_memory_repositories();
        let metrics = Arc::new(AppMetrics::default());
        let gate = Arc::new(AccessGate::new(Arc::new(
            ModelCatalog::new(default_catalog_entries()).unwrap(),
        )));
        let completion = Arc::new(StubCompletion::default());

        let state = AppState::new(
            create_account_service(
                repos.accounts.clone(),
                PasswordHasher::new(4),
                JwtTokenGenerator::new(JWT_SECRET, "ziora", "ziora-api", 3600),
            ),
            create_chat_service(
                repos.conversations.clone(),
                repos.accounts.clone(),
                gate.clone(),
                completion.clone(),
                metrics.clone(),
            ),
            create_payment_service(
                repos.payments.clone(),
                repos.orders.clone(),
                repos.accounts.clone(),
                Arc::new(StubGateway),
                metrics.clone(),
            ),
            gate,
            Box::new(JwtAuth::new(JWT_SECRET, "ziora", "ziora-api")),
            rate_limiter,
            metrics,
        );

        TestApp {
            router: create_router(state, &[]),
            completion,
        }
    }

    async fn call(
        router: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let body = body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty);

        let response = router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn register(router: &Router, username: &str) -> (String, String) {
        let (status, body) = call(
            router,
            "POST",
            "/api/users/register",
            None,
            Some(json!({
                "name": "Test User",
                "username": username,
                "email": format!("{}@example.com", username),
                "password": "Sup3r$ecret",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        (
            body["id"].as_str().unwrap().to_string(),
            body["token"].as_str().unwrap().to_string(),
        )
    }

    async fn new_chat(router: &Router, token: &str) -> String {
        let (status, body) = call(router, "POST", "/api/chat", Some(token), Some(json!({}))).await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_register_returns_starter_account_with_token() {
        let app = app();
        let (status, body) = call(
            &app.router,
            "POST",
            "/api/users/register",
            None,
            Some(json!({
                "name": "Jane",
                "username": "jane",
                "email": "jane@example.com",
                "password": "Sup3r$ecret",
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["role"], "starter");
        assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert!(body.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_is_rejected() {
        let app = app();
        register(&app.router, "jane").await;

        let (status, body) = call(
            &app.router,
            "POST",
            "/api/users/login",
            None,
            Some(json!({"email": "jane@example.com", "password": "Wr0ng$pass"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("Invalid credentials"));
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        let app = app();
        let (status, body) = call(&app.router, "GET", "/api/users/profile", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");

        let (status, _) = call(&app.router, "GET", "/api/chat", Some("not-a-jwt"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_model_catalog_is_public_and_grouped() {
        let app = app();
        let (status, body) = call(&app.router, "GET", "/api/models", None, None).await;

        assert_eq!(status, StatusCode::OK);
        let tiers = body["tiers"].as_array().unwrap();
        assert_eq!(tiers.len(), 3);
        assert_eq!(tiers[0]["tier"], "starter");
        assert!(
            tiers[0]["models"]
                .as_array()
                .unwrap()
                .iter()
                .any(|m| m["model_id"] == STARTER_MODEL)
        );
    }

    #[tokio::test]
    async fn test_available_models_follow_caller_tier() {
        let app = app();
        let (_, token) = register(&app.router, "jane").await;

        let (status, body) = call(&app.router, "GET", "/api/models/available", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tier"], "starter");
        let models = body["models"].as_array().unwrap();
        assert!(models.iter().all(|m| m["minimum_tier"] == "starter"));
        assert!(!models.is_empty());
    }

    #[tokio::test]
    async fn test_send_message_appends_exchange_and_titles_chat() {
        let app = app();
        let (_, token) = register(&app.router, "jane").await;
        let chat_id = new_chat(&app.router, &token).await;

        let (status, body) = call(
            &app.router,
            "POST",
            "/api/chat/message",
            Some(&token),
            Some(json!({
                "chat_id": chat_id,
                "content": "Explain the borrow checker in one paragraph please",
                "model": STARTER_MODEL,
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["chat_title"], "Explain the borrow checker in ...");
        assert_eq!(body["ai_response"]["content"], "answer to 1 messages");
        assert_eq!(body["ai_response"]["model"], STARTER_MODEL);

        let uri = format!("/api/chat/{}/messages", chat_id);
        let (status, body) = call(&app.router, "GET", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_insufficient_tier_is_denied_without_upstream_call() {
        let app = app();
        let (_, token) = register(&app.router, "jane").await;
        let chat_id = new_chat(&app.router, &token).await;

        let (status, body) = call(
            &app.router,
            "POST",
            "/api/chat/message",
            Some(&token),
            Some(json!({"chat_id": chat_id, "content": "hi", "model": ENTERPRISE_MODEL})),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "ACCESS_DENIED");
        assert!(body["message"].as_str().unwrap().contains("Enterprise"));
        assert_eq!(app.completion.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_chat_is_not_found() {
        let app = app();
        let (_, token) = register(&app.router, "jane").await;

        let (status, body) = call(
            &app.router,
            "POST",
            "/api/chat/message",
            Some(&token),
            Some(json!({"chat_id": "missing", "content": "hi", "model": STARTER_MODEL})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_upstream_fault_maps_to_bad_gateway_and_keeps_history() {
        let app = app();
        let (_, token) = register(&app.router, "jane").await;
        let chat_id = new_chat(&app.router, &token).await;
        app.completion.fail.store(true, Ordering::SeqCst);

        let (status, body) = call(
            &app.router,
            "POST",
            "/api/chat/message",
            Some(&token),
            Some(json!({"chat_id": chat_id, "content": "hi", "model": STARTER_MODEL})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "UPSTREAM_FAULT");

        let uri = format!("/api/chat/{}/messages", chat_id);
        let (_, body) = call(&app.router, "GET", &uri, Some(&token), None).await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_participant_cannot_read_messages() {
        let app = app();
        let (_, owner) = register(&app.router, "jane").await;
        let (_, stranger) = register(&app.router, "john").await;
        let chat_id = new_chat(&app.router, &owner).await;

        let uri = format!("/api/chat/{}/messages", chat_id);
        let (status, _) = call(&app.router, "GET", &uri, Some(&stranger), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_starter_cannot_raise_own_tier_without_payment() {
        let app = app();
        let (_, token) = register(&app.router, "jane").await;

        let (status, _) = call(
            &app.router,
            "PUT",
            "/api/users/upgrade",
            Some(&token),
            Some(json!({"new_role": "enterprise"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, profile) = call(&app.router, "GET", "/api/users/profile", Some(&token), None).await;
        assert_eq!(profile["role"], "starter");

        let chat_id = new_chat(&app.router, &token).await;
        let (status, _) = call(
            &app.router,
            "POST",
            "/api/chat/message",
            Some(&token),
            Some(json!({"chat_id": chat_id, "content": "hi", "model": ENTERPRISE_MODEL})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(app.completion.calls.load(Ordering::SeqCst), 0);
    }

    async fn order(router: &Router, token: &str, plan: &str) {
        let (status, _) = call(
            router,
            "POST",
            "/api/payment/order",
            Some(token),
            Some(json!({"plan": plan})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    fn confirmation(plan: &str) -> Value {
        json!({
            "razorpay_order_id": "order_api",
            "razorpay_payment_id": "pay_api",
            "razorpay_signature": sign(GATEWAY_SECRET, "order_api", "pay_api"),
            "plan": plan,
        })
    }

    #[tokio::test]
    async fn test_verified_payment_unlocks_enterprise_models() {
        let app = app();
        let (_, token) = register(&app.router, "jane").await;

        let (status, order) = call(
            &app.router,
            "POST",
            "/api/payment/order",
            Some(&token),
            Some(json!({"plan": "enterprise"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(order["amount"], 59_900);
        assert_eq!(order["plan_name"], "Enterprise Plan");

        let (status, body) = call(
            &app.router,
            "POST",
            "/api/payment/verify",
            Some(&token),
            Some(confirmation("enterprise")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], "enterprise");

        let (_, status_body) = call(&app.router, "GET", "/api/payment/status", Some(&token), None).await;
        assert_eq!(status_body["role"], "enterprise");

        let chat_id = new_chat(&app.router, &token).await;
        let (status, _) = call(
            &app.router,
            "POST",
            "/api/chat/message",
            Some(&token),
            Some(json!({"chat_id": chat_id, "content": "hi", "model": ENTERPRISE_MODEL})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_bad_signature_is_recorded_as_failed() {
        let app = app();
        let (_, token) = register(&app.router, "jane").await;
        order(&app.router, &token, "professional").await;

        let (status, _) = call(
            &app.router,
            "POST",
            "/api/payment/verify",
            Some(&token),
            Some(json!({
                "razorpay_order_id": "order_api",
                "razorpay_payment_id": "pay_api",
                "razorpay_signature": "00ff",
                "plan": "professional",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, history) = call(&app.router, "GET", "/api/payment/history", Some(&token), None).await;
        let history = history.as_array().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0]["status"], "failed");
    }

    #[tokio::test]
    async fn test_verify_rejects_plan_other_than_ordered() {
        let app = app();
        let (_, token) = register(&app.router, "jane").await;
        order(&app.router, &token, "professional").await;

        let (status, _) = call(
            &app.router,
            "POST",
            "/api/payment/verify",
            Some(&token),
            Some(confirmation("enterprise")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, status_body) = call(&app.router, "GET", "/api/payment/status", Some(&token), None).await;
        assert_eq!(status_body["role"], "starter");
    }

    #[tokio::test]
    async fn test_paid_order_cannot_be_replayed_by_another_account() {
        let app = app();
        let (_, jane) = register(&app.router, "jane").await;
        let (_, john) = register(&app.router, "john").await;
        order(&app.router, &jane, "enterprise").await;

        let (status, body) = call(
            &app.router,
            "POST",
            "/api/payment/verify",
            Some(&jane),
            Some(confirmation("")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], "enterprise");

        let (status, _) = call(
            &app.router,
            "POST",
            "/api/payment/verify",
            Some(&john),
            Some(confirmation("enterprise")),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (_, status_body) = call(&app.router, "GET", "/api/payment/status", Some(&john), None).await;
        assert_eq!(status_body["role"], "starter");

        let (status, _) = call(
            &app.router,
            "POST",
            "/api/payment/verify",
            Some(&jane),
            Some(confirmation("enterprise")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rate_limit_buckets_are_per_account() {
        let app = app_with_limiter(RateLimiter::new(
            RateLimitConfig {
                requests_per_minute: 2,
                requests_per_hour: 100,
            },
            true,
        ));
        let (_, alice) = register(&app.router, "alice").await;
        let (_, bob) = register(&app.router, "bob").await;

        for _ in 0..2 {
            let (status, _) = call(&app.router, "GET", "/api/users/profile", Some(&alice), None).await;
            assert_eq!(status, StatusCode::OK);
        }
        let (status, body) = call(&app.router, "GET", "/api/users/profile", Some(&alice), None).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["code"], "RATE_LIMITED");

        let (status, _) = call(&app.router, "GET", "/api/users/profile", Some(&bob), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_falls_back_to_not_found() {
        let app = app();
        let (status, body) = call(&app.router, "GET", "/api/nowhere", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }
}
