use tokio::signal;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use issue_tracker::config::Config;
use issue_tracker::handlers::{
    CreateIssueRequest, DeleteIssueRequest, IssueResult, UpdateIssueRequest,
};
use issue_tracker::models::Issue;
use issue_tracker::state::AppState;
use issue_tracker::{build_router, handlers};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::issue::list_issues,
        handlers::issue::create_issue,
        handlers::issue::update_issue,
        handlers::issue::delete_issue,
    ),
    components(schemas(
        Issue,
        CreateIssueRequest,
        UpdateIssueRequest,
        DeleteIssueRequest,
        IssueResult,
    )),
    tags(
        (name = "Issues", description = "Issue tracking scoped by project")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    if config.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let addr = config.server_addr();

    // Initialize application state (connects to the issue store)
    tracing::info!(store = ?config.store, "Connecting to issue store...");
    let state = AppState::new(config)
        .await
        .expect("Failed to initialize application state");
    tracing::info!("Issue store ready");

    // Build the main application router
    let app = build_router(state)
        // Add Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");

    tracing::info!("Server started on http://{}", addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui/", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
