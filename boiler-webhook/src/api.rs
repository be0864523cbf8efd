//! Webhook endpoint
//!
//! One handler serves every path: the provider is configured with this
//! server's address and the handler never inspects the URL. An inbound
//! request moves through three gates (method, signature, event filter) and
//! is answered before the pipeline runs; the deployment itself happens on a
//! background task.

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode},
};
use boiler_core::domain::{DeploymentRequest, ReleaseEvent};
use boiler_engine::DeployPipeline;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::config::WebhookSecret;
use crate::signature;

/// Shared state of the webhook endpoint
pub struct AppState {
    pub secret: WebhookSecret,
    pub pipeline: Arc<DeployPipeline>,
}

/// Creates the webhook router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(handle_delivery)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Binds a listener and serves the webhook endpoint until shutdown
pub async fn serve(addr: &str, state: Arc<AppState>) -> std::io::Result<()> {
    let app = create_router(state);

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

/// Handles one inbound delivery
///
/// Responses are status-only: the network caller never learns pipeline
/// detail, only whether the delivery was authenticated and accepted.
async fn handle_delivery(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if method != Method::POST {
        return StatusCode::BAD_REQUEST;
    }

    let Some(signature_header) = headers
        .get(signature::SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
    else {
        warn!("Rejected delivery without a signature header");
        return StatusCode::FORBIDDEN;
    };

    if !signature::verify(state.secret.as_bytes(), &body, signature_header) {
        warn!("Rejected delivery with an invalid signature");
        return StatusCode::FORBIDDEN;
    }

    let event: ReleaseEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            debug!("Rejected malformed delivery body: {}", e);
            return StatusCode::BAD_REQUEST;
        }
    };

    if !event.is_release_publication() {
        debug!("Ignoring delivery with action '{}'", event.action);
        return StatusCode::BAD_REQUEST;
    }

    info!(
        "Accepted release {} of {}",
        event.release.tag_name, event.repository.ssh_url
    );

    // Answer 200 now; the deploy can take minutes (it includes a container
    // rebuild) and the provider would time the delivery out.
    let pipeline = state.pipeline.clone();
    tokio::spawn(async move {
        let request = DeploymentRequest::new(event.repository.ssh_url)
            .with_revision(event.release.tag_name);

        match tokio::task::spawn_blocking(move || pipeline.run(&request)).await {
            Ok(outcome) if outcome.success => {
                info!("Run {} deployed successfully", outcome.run_id)
            }
            Ok(outcome) => error!(
                "Run {} failed at stage '{}': {}",
                outcome.run_id, outcome.stage_reached, outcome.message
            ),
            Err(e) => error!("Deployment task panicked: {}", e),
        }
    });

    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use boiler_core::StageError;
    use boiler_engine::container::ContainerEngine;
    use boiler_engine::progress::TracingSink;
    use boiler_engine::proxy::ProxyService;
    use boiler_engine::vcs::VcsClient;
    use boiler_engine::EngineConfig;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const SECRET: &str = "hunter2";

    /// Records fetch dispatches and fails fast so nothing touches the host
    struct RecordingVcs {
        fetches: Mutex<Vec<(String, String)>>,
    }

    impl VcsClient for RecordingVcs {
        fn check(&self) -> Result<(), StageError> {
            Ok(())
        }

        fn fetch(&self, remote: &str, revision: &str, _dest: &Path) -> Result<(), StageError> {
            self.fetches
                .lock()
                .unwrap()
                .push((remote.to_string(), revision.to_string()));
            Err(StageError::fetch(remote, revision, "test stub"))
        }
    }

    struct NullContainers;

    impl ContainerEngine for NullContainers {
        fn check(&self) -> Result<(), StageError> {
            Ok(())
        }

        fn build(&self, _workspace: &Path) -> bool {
            true
        }

        fn stop(&self, _workspace: &Path) -> bool {
            true
        }

        fn start(&self, _workspace: &Path) -> bool {
            true
        }
    }

    struct NullProxy;

    impl ProxyService for NullProxy {
        fn install(&self, _site_config: &Path, _project_name: &str) -> Result<(), StageError> {
            Ok(())
        }
    }

    struct TestApp {
        router: Router,
        vcs: Arc<RecordingVcs>,
        _root: TempDir,
    }

    fn test_app() -> TestApp {
        let root = TempDir::new().unwrap();
        let vcs = Arc::new(RecordingVcs {
            fetches: Mutex::new(Vec::new()),
        });

        let config = EngineConfig {
            work_root: root.path().to_path_buf(),
            config_dir: root.path().join("config"),
            sites_available: root.path().join("sites-available"),
            sites_enabled: root.path().join("sites-enabled"),
            fatal_build_errors: false,
        };

        let pipeline = Arc::new(DeployPipeline::new(
            config,
            vcs.clone(),
            Arc::new(NullContainers),
            Arc::new(NullProxy),
            Arc::new(TracingSink),
        ));

        let state = Arc::new(AppState {
            secret: WebhookSecret::new(SECRET),
            pipeline,
        });

        TestApp {
            router: create_router(state),
            vcs,
            _root: root,
        }
    }

    fn release_body(action: &str) -> String {
        format!(
            r#"{{
                "action": "{action}",
                "repository": {{ "ssh_url": "git@example.com:org/app.git" }},
                "release": {{ "tag_name": "v1.0" }}
            }}"#
        )
    }

    fn signed_post(body: &str) -> Request<Body> {
        let header = signature::sign(SECRET.as_bytes(), body.as_bytes());
        Request::builder()
            .method("POST")
            .uri("/")
            .header(signature::SIGNATURE_HEADER, header)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn wait_for_dispatch(vcs: &RecordingVcs) -> Vec<(String, String)> {
        for _ in 0..100 {
            {
                let fetches = vcs.fetches.lock().unwrap();
                if !fetches.is_empty() {
                    return fetches.clone();
                }
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        Vec::new()
    }

    #[tokio::test]
    async fn test_get_is_rejected() {
        let app = test_app();

        let response = app
            .router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_other_methods_are_rejected() {
        let app = test_app();

        let response = app
            .router
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/")
                    .body(Body::from(release_body("released")))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_signature_is_forbidden() {
        let app = test_app();

        let response = app
            .router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .body(Body::from(release_body("released")))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(app.vcs.fetches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tampered_body_is_forbidden() {
        let app = test_app();

        let header = signature::sign(SECRET.as_bytes(), release_body("released").as_bytes());
        let response = app
            .router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(signature::SIGNATURE_HEADER, header)
                    .body(Body::from(release_body("released").replace("v1.0", "v6.6")))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(app.vcs.fetches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_scheme_is_forbidden() {
        let app = test_app();

        let body = release_body("released");
        let header = signature::sign(SECRET.as_bytes(), body.as_bytes()).replace("sha1=", "sha256=");
        let response = app
            .router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(signature::SIGNATURE_HEADER, header)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_non_release_action_is_filtered() {
        let app = test_app();

        let response = app
            .router
            .oneshot(signed_post(&release_body("prereleased")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(app.vcs.fetches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let app = test_app();

        let response = app
            .router
            .oneshot(signed_post("{ not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_release_event_dispatches_pipeline() {
        let app = test_app();

        let response = app
            .router
            .oneshot(signed_post(&release_body("released")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let fetches = wait_for_dispatch(&app.vcs).await;
        assert_eq!(fetches.len(), 1);
        assert_eq!(fetches[0].0, "git@example.com:org/app.git");
        assert_eq!(fetches[0].1, "v1.0");
    }
}
