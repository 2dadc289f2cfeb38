//! Axum gateway for MagicQuest: landing page, `/ask` story endpoint, parental dashboard.
//!
//! ENVIRONMENT LOCKDOWN: `.env` is loaded first and `GOOGLE_API_KEY` stays in
//! the backend only. The browser is a stateless client and never receives or
//! sends the model API key.

mod render;

use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::Html,
    routing::{get, post},
    Json, Router,
};
use magicquest_core::{
    DashboardView, GeminiBridge, QuestConfig, StoryLog, StoryModel, StoryResult, StoryService,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone)]
struct AppState {
    config: Arc<QuestConfig>,
    service: Arc<StoryService>,
    /// Shared interaction log; the dashboard reads snapshots from it.
    log: Arc<StoryLog>,
    started_at: chrono::DateTime<chrono::Utc>,
}

#[derive(serde::Deserialize)]
struct AskRequest {
    question: String,
}

/// POST /ask – generate a story for a child's question and log the interaction.
///
/// Empty questions are accepted and forwarded as-is. A malformed model reply is
/// invisible here (the service substitutes its fallback); only a failure of the
/// Gemini call itself becomes an error response.
async fn ask(
    State(state): State<AppState>,
    Json(body): Json<AskRequest>,
) -> Result<Json<StoryResult>, (StatusCode, Json<serde_json::Value>)> {
    let correlation_id = uuid::Uuid::new_v4();
    tracing::info!(target: "quest::gateway", %correlation_id, "Story requested");

    match state.service.generate(&body.question).await {
        Ok(result) => {
            tracing::info!(
                target: "quest::gateway",
                %correlation_id,
                badge = %result.badge,
                tier = %result.learning_path_badge,
                "Story generated"
            );
            Ok(Json(result))
        }
        Err(e) => {
            tracing::error!(target: "quest::gateway", %correlation_id, "Story generation failed: {}", e);
            Err((
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({
                    "status": "error",
                    "error": e.to_string(),
                })),
            ))
        }
    }
}

/// GET /dashboard – parental dashboard rendered from a fresh log snapshot.
async fn dashboard(State(state): State<AppState>) -> Html<String> {
    let view = DashboardView::from_stories(state.log.snapshot());
    Html(render::dashboard_page(&view))
}

/// GET /api/v1/health – liveness check with identity and uptime.
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let uptime = chrono::Utc::now().signed_duration_since(state.started_at);
    Json(serde_json::json!({
        "status": "ok",
        "app_name": state.config.app_name,
        "version": env!("CARGO_PKG_VERSION"),
        "started_at": state.started_at.to_rfc3339(),
        "uptime_secs": uptime.num_seconds(),
    }))
}

fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let frontend_enabled = state.config.frontend_enabled;
    let static_dir = std::path::PathBuf::from(&state.config.static_dir);

    let mut app = Router::new()
        .route("/ask", post(ask))
        .route("/dashboard", get(dashboard))
        .route("/api/v1/health", get(health))
        .with_state(state);

    if frontend_enabled {
        // Map `/` -> `static/index.html` and `/static/*` -> `static/*`.
        app = app.route_service("/", ServeFile::new(static_dir.join("index.html")));
        app = app.nest_service("/static", ServeDir::new(static_dir));
    }

    app.layer(cors)
}

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!(
            "[magicquest-gateway] .env not loaded: {} (using system environment)",
            e
        );
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match QuestConfig::load() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            tracing::error!(target: "quest::gateway", "Config load failed: {}", e);
            std::process::exit(1);
        }
    };

    // Absence of the key is not handled here: the bridge is still built and the
    // first /ask fails with the API's auth error.
    let bridge = match GeminiBridge::from_env() {
        Some(b) => b.with_model(&config.model),
        None => {
            eprintln!(
                "[magicquest-gateway] Hint: set GOOGLE_API_KEY in .env for live story generation; \
                 the gateway holds the key, the frontend never sees it."
            );
            GeminiBridge::new(String::new()).with_model(&config.model)
        }
    };

    let log = Arc::new(StoryLog::new());
    let service = Arc::new(StoryService::new(
        Arc::new(bridge) as Arc<dyn StoryModel>,
        Arc::clone(&log),
    ));

    let app = build_app(AppState {
        config: Arc::clone(&config),
        service,
        log,
        started_at: chrono::Utc::now(),
    });

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(target: "quest::gateway", "{} listening on {}", config.app_name, addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(target: "quest::gateway", "Bind failed on {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!(target: "quest::gateway", "Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!(target: "quest::gateway", "Shutdown initiated (Ctrl+C received)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use magicquest_core::GeminiError;
    use tower::ServiceExt;

    struct CannedModel {
        reply: String,
    }

    #[async_trait::async_trait]
    impl StoryModel for CannedModel {
        async fn generate_content(&self, _prompt: &str) -> Result<String, GeminiError> {
            Ok(self.reply.clone())
        }
    }

    struct FailingModel;

    #[async_trait::async_trait]
    impl StoryModel for FailingModel {
        async fn generate_content(&self, _prompt: &str) -> Result<String, GeminiError> {
            Err(GeminiError::Api {
                status: reqwest::StatusCode::UNAUTHORIZED,
                body: "API key not valid".to_string(),
            })
        }
    }

    fn test_config() -> QuestConfig {
        QuestConfig {
            app_name: "MagicQuest Test".to_string(),
            port: 8000,
            model: "gemini-2.0-flash".to_string(),
            static_dir: "./static".to_string(),
            frontend_enabled: false,
        }
    }

    fn test_app(model: Arc<dyn StoryModel>) -> (Router, Arc<StoryLog>) {
        let log = Arc::new(StoryLog::new());
        let service = Arc::new(StoryService::new(model, Arc::clone(&log)));
        let app = build_app(AppState {
            config: Arc::new(test_config()),
            service,
            log: Arc::clone(&log),
            started_at: chrono::Utc::now(),
        });
        (app, log)
    }

    async fn body_json(res: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_app_identity() {
        let (app, _log) = test_app(Arc::new(CannedModel { reply: String::new() }));
        let res = app
            .oneshot(Request::builder().uri("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = body_json(res).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["app_name"], "MagicQuest Test");
    }

    #[tokio::test]
    async fn ask_returns_story_and_logs_interaction() {
        let (app, log) = test_app(Arc::new(CannedModel {
            reply: r#"{"story":"S","learning_point":"L","badge":"Science"}"#.to_string(),
        }));
        let req = Request::builder()
            .method("POST")
            .uri("/ask")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"question":"Why is the sky blue?"}"#))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = body_json(res).await;
        assert_eq!(json["story"], "S");
        assert_eq!(json["learning_point"], "L");
        assert_eq!(json["badge"], "Science");
        assert_eq!(json["badge_icon"], "🔬");
        assert_eq!(json["learning_path_badge"], "Beginner");
        assert_eq!(log.len(), 1);
    }

    #[tokio::test]
    async fn ask_accepts_empty_question() {
        let (app, log) = test_app(Arc::new(CannedModel {
            reply: r#"{"story":"S","learning_point":"L","badge":"Art"}"#.to_string(),
        }));
        let req = Request::builder()
            .method("POST")
            .uri("/ask")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"question":""}"#))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(log.snapshot()[0].question, "");
    }

    #[tokio::test]
    async fn ask_maps_model_failure_to_bad_gateway() {
        let (app, log) = test_app(Arc::new(FailingModel));
        let req = Request::builder()
            .method("POST")
            .uri("/ask")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"question":"Why?"}"#))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(res).await;
        assert_eq!(json["status"], "error");
        assert!(log.is_empty());
    }

    #[tokio::test]
    async fn dashboard_renders_logged_stories() {
        let (app, log) = test_app(Arc::new(CannedModel { reply: String::new() }));
        log.append(magicquest_core::Interaction {
            question: "Why is the sky blue?".to_string(),
            story: "Light scatters.".to_string(),
            learning_point: "Physics everywhere.".to_string(),
            badge: "Science".to_string(),
            badge_icon: "🔬".to_string(),
        });

        let res = app
            .oneshot(Request::builder().uri("/dashboard").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.contains("Science × 1"));
        assert!(page.contains("Why is the sky blue?"));
        assert!(page.contains("Beginner"));
    }
}
