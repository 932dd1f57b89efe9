//! Router tests against stub classifiers

#[cfg(test)]
mod router_tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use tokio_test::assert_ok;
    use tower::ServiceExt;

    use crate::binder::COLUMN_COUNT;
    use crate::config::Config;
    use crate::error::InferenceError;
    use crate::model::{
        ClassProbabilities, FeatureOrder, LoadedModel, ModelCell, ModelInput, ModelState, RiskModel,
    };
    use crate::schema::Schema;
    use crate::session::SessionStore;
    use crate::{create_router, AppState};

    const DEFAULT_FORM: &str = "Age=0&Sex=0&BMI=0&Operating_room_temperature=22";

    /// Succeeds `ok_calls` times with `probability`, then fails
    struct StubModel {
        probability: f32,
        ok_calls: usize,
        calls: AtomicUsize,
    }

    impl StubModel {
        fn always(probability: f32) -> Self {
            Self { probability, ok_calls: usize::MAX, calls: AtomicUsize::new(0) }
        }

        fn failing_after(probability: f32, ok_calls: usize) -> Self {
            Self { probability, ok_calls, calls: AtomicUsize::new(0) }
        }
    }

    impl RiskModel for StubModel {
        fn predict_proba(&self, input: &ModelInput) -> Result<ClassProbabilities, InferenceError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) >= self.ok_calls {
                return Err(InferenceError(format!("feature_names mismatch ({} columns)", input.len())));
            }
            Ok(ClassProbabilities { negative: 1.0 - self.probability, positive: self.probability })
        }

        fn describe(&self) -> String {
            "stub".to_string()
        }
    }

    /// Holds the blocking pool for `delay` per prediction
    struct SlowModel {
        delay: Duration,
    }

    impl RiskModel for SlowModel {
        fn predict_proba(&self, _: &ModelInput) -> Result<ClassProbabilities, InferenceError> {
            std::thread::sleep(self.delay);
            Ok(ClassProbabilities { negative: 0.6, positive: 0.4 })
        }

        fn describe(&self) -> String {
            "slow".to_string()
        }
    }

    fn available(model: impl RiskModel + 'static) -> ModelState {
        let order = FeatureOrder::new(
            ["Age", "Sex", "BMI", "Operating_room_temperature"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
        .unwrap();
        ModelState::Available(Arc::new(LoadedModel::new(order, Box::new(model))))
    }

    fn unavailable() -> ModelState {
        ModelState::Unavailable { reason: "artifact not found: xgboost_model_deploy.onnx".to_string() }
    }

    fn app(model: ModelState) -> Router {
        app_with_sessions(model).0
    }

    fn app_with_sessions(model: ModelState) -> (Router, Arc<SessionStore>) {
        let sessions = Arc::new(SessionStore::new(Duration::from_secs(600)));
        let router = create_router(AppState {
            model: Arc::new(ModelCell::preloaded(model)),
            schema: Arc::new(Schema::builtin()),
            sessions: sessions.clone(),
            config: Config::default(),
        });
        (router, sessions)
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = assert_ok!(to_bytes(response.into_body(), usize::MAX).await);
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn session_cookie(response: &axum::response::Response) -> String {
        let set_cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_degraded_page_shows_banner_only() {
        let response = app(unavailable()).oneshot(get("/", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        assert!(html.contains("Model unavailable."));
        assert!(html.contains("xgboost_model_deploy.onnx"));
        assert!(!html.contains("<input"));
        assert!(!html.contains("Calculate Risk"));
    }

    #[tokio::test]
    async fn test_degraded_calculate_is_not_offered() {
        let response = app(unavailable())
            .oneshot(post_form("/calculate", DEFAULT_FORM, None))
            .await
            .unwrap();
        let html = body_string(response).await;
        assert!(html.contains("Model unavailable."));
        assert!(!html.contains("Calculate Risk"));
    }

    #[tokio::test]
    async fn test_index_renders_inputs_and_idle_prompt() {
        let response = app(available(StubModel::always(0.42))).oneshot(get("/", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());

        let html = body_string(response).await;
        for feature in ["Age", "Sex", "BMI", "Operating_room_temperature"] {
            assert!(html.contains(&format!("data-feature=\"{}\"", feature)));
        }
        assert!(html.contains("Calculate Risk"));
        assert!(html.contains("Click &#39;Calculate Risk&#39; to see the result."));
        assert!(html.contains("&lt;18.5 (Code: 0)"));
    }

    #[tokio::test]
    async fn test_calculate_shows_gauge_and_tier() {
        let response = app(available(StubModel::always(0.42)))
            .oneshot(post_form("/calculate", DEFAULT_FORM, None))
            .await
            .unwrap();
        let html = body_string(response).await;

        assert!(html.contains("<strong>Medium Risk</strong>: 42.0%"));
        assert!(html.contains("gauge-bar"));
        assert!(html.contains("width: 42.0%; background-color: #2ca02c;"));
        assert!(!html.contains("Prediction Error"));
    }

    #[tokio::test]
    async fn test_failed_calculation_keeps_previous_result() {
        let app = app(available(StubModel::failing_after(0.42, 1)));

        let first = app.clone().oneshot(post_form("/calculate", DEFAULT_FORM, None)).await.unwrap();
        let cookie = session_cookie(&first);
        assert!(body_string(first).await.contains("42.0%"));

        let second = app
            .oneshot(post_form("/calculate", DEFAULT_FORM, Some(&cookie)))
            .await
            .unwrap();
        let html = body_string(second).await;
        assert!(html.contains("Prediction Error: feature_names mismatch (4 columns)"));
        assert!(html.contains("<strong>Medium Risk</strong>: 42.0%"));
        assert!(html.contains("Calculate Risk"));
    }

    #[tokio::test]
    async fn test_sticky_edit_survives_rerender() {
        let app = app(available(StubModel::always(0.1)));

        let edit = app
            .clone()
            .oneshot(post_json(
                "/api/v1/session/inputs",
                serde_json::json!({"feature": "Sex", "value": 1}),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(edit.status(), StatusCode::NO_CONTENT);
        let cookie = session_cookie(&edit);
        assert!(cookie.starts_with("iih_session="));

        let html = body_string(app.clone().oneshot(get("/", Some(&cookie))).await.unwrap()).await;
        assert!(html.contains("id=\"Sex-1\" name=\"Sex\" value=\"1\" checked"));

        let other = body_string(app.oneshot(get("/", None)).await.unwrap()).await;
        assert!(other.contains("id=\"Sex-0\" name=\"Sex\" value=\"0\" checked"));
    }

    #[tokio::test]
    async fn test_sessions_stored_only_on_write() {
        let (app, sessions) = app_with_sessions(available(StubModel::always(0.1)));

        for _ in 0..3 {
            let page = app.clone().oneshot(get("/", None)).await.unwrap();
            assert!(page.headers().get(header::SET_COOKIE).is_none());
        }
        let rejected = app
            .clone()
            .oneshot(post_json(
                "/api/v1/session/inputs",
                serde_json::json!({"feature": "BMI", "value": 9}),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
        assert!(rejected.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(sessions.count(), 0);

        let stale = format!("iih_session={}", uuid::Uuid::new_v4());
        let page = app.clone().oneshot(get("/", Some(&stale))).await.unwrap();
        assert!(page.headers().get(header::SET_COOKIE).is_none());

        let edit = app
            .oneshot(post_json(
                "/api/v1/session/inputs",
                serde_json::json!({"feature": "Sex", "value": 1}),
                Some(&stale),
            ))
            .await
            .unwrap();
        assert_ne!(session_cookie(&edit), stale);
        assert_eq!(sessions.count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_calculation_does_not_block_other_sessions() {
        let delay = Duration::from_millis(400);
        let app = app(available(SlowModel { delay }));

        let edit = app
            .clone()
            .oneshot(post_json(
                "/api/v1/session/inputs",
                serde_json::json!({"feature": "Sex", "value": 1}),
                None,
            ))
            .await
            .unwrap();
        let other_session = session_cookie(&edit);

        let slow = tokio::spawn(app.clone().oneshot(post_form("/calculate", DEFAULT_FORM, None)));
        tokio::time::sleep(Duration::from_millis(50)).await;

        let started = Instant::now();
        let page = app.oneshot(get("/", Some(&other_session))).await.unwrap();
        assert_eq!(page.status(), StatusCode::OK);
        assert!(started.elapsed() < delay / 2, "waited {:?}", started.elapsed());

        let html = body_string(slow.await.unwrap().unwrap()).await;
        assert!(html.contains("<strong>Medium Risk</strong>: 40.0%"));
    }

    #[tokio::test]
    async fn test_session_edit_validation() {
        let app = app(available(StubModel::always(0.1)));

        let unknown = app
            .clone()
            .oneshot(post_json(
                "/api/v1/session/inputs",
                serde_json::json!({"feature": "Weight", "value": 70}),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);

        let bad_code = app
            .clone()
            .oneshot(post_json(
                "/api/v1/session/inputs",
                serde_json::json!({"feature": "BMI", "value": 9}),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(bad_code.status(), StatusCode::BAD_REQUEST);

        let empty = app
            .oneshot(post_json(
                "/api/v1/session/inputs",
                serde_json::json!({"feature": "", "value": 1}),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_api_predict_fills_defaults_in_order() {
        let response = app(available(StubModel::always(0.75)))
            .oneshot(post_json(
                "/api/v1/predict",
                serde_json::json!({"values": {"Operating_room_temperature": 19.5, "Age": 1}}),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["tier"], "high");
        assert_eq!(body["message"], "High Risk: 75.0%");
        assert_eq!(body["gauge_color"], "#d62728");

        let record = body["record"].as_array().unwrap();
        let names: Vec<&str> = record.iter().map(|f| f["feature"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Age", "Sex", "BMI", "Operating_room_temperature"]);
        assert_eq!(record[0]["value"], 1.0);
        assert_eq!(record[3]["value"], 19.5);
    }

    #[tokio::test]
    async fn test_api_predict_inference_error() {
        let response = app(available(StubModel::failing_after(0.5, 0)))
            .oneshot(post_json("/api/v1/predict", serde_json::json!({}), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_api_degraded_returns_503() {
        let response = app(unavailable())
            .oneshot(post_json("/api/v1/predict", serde_json::json!({}), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_schema_endpoint_in_feature_order() {
        let response = app(available(StubModel::always(0.1))).oneshot(get("/api/v1/schema", None)).await.unwrap();
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        let features = body["features"].as_array().unwrap();

        assert_eq!(features.len(), 4);
        assert_eq!(features[0]["name"], "Age");
        assert_eq!(features[0]["kind"], "categorical");
        assert_eq!(features[3]["name"], "Operating_room_temperature");
        assert_eq!(features[3]["kind"], "continuous");
        assert_eq!(features[3]["default"], 22.0);
        for (index, feature) in features.iter().enumerate() {
            assert_eq!(feature["column"], index % COLUMN_COUNT);
        }
    }

    #[tokio::test]
    async fn test_health_reports_engine_state() {
        let response = app(unavailable()).oneshot(get("/health", None)).await.unwrap();
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["engine"]["model_loaded"], false);

        let response = app(available(StubModel::always(0.1))).oneshot(get("/health", None)).await.unwrap();
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["engine"]["feature_count"], 4);
    }
}
