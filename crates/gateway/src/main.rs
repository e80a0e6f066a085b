//! ReviewFlow HTTP service
//!
//! The entry point for all external API requests. Handles:
//! - Requester identification (authentication lives upstream)
//! - Request routing to the workflow services
//! - Observability (logging, metrics, tracing)

mod handlers;
mod middleware;
mod requester;

use axum::{
    routing::{get, post, put},
    Router,
};
use reviewflow_common::{
    clients::{HttpSubmissionsClient, HttpUsersClient, SubmissionsPort, UsersPort},
    clock::{Clock, SystemClock},
    config::AppConfig,
    db::{DbPool, Repository},
    metrics,
    workflow::{
        AssignmentService, BidService, DiscussionService, PhaseService, ReviewService,
        TrackService, VerificationService,
    },
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, Level};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub phases: PhaseService,
    pub bids: BidService,
    pub assignments: AssignmentService,
    pub reviews: ReviewService,
    pub discussion: DiscussionService,
    pub tracks: TrackService,
}

impl AppState {
    /// Wire the workflow services from configuration
    fn new(config: &AppConfig, db: DbPool) -> Self {
        let repo = Repository::new(db.clone());

        let users: Arc<dyn UsersPort> =
            Arc::new(HttpUsersClient::new(config.users_service.base_url.clone()));
        let submissions: Arc<dyn SubmissionsPort> = Arc::new(HttpSubmissionsClient::new(
            config.submissions_service.base_url.clone(),
        ));
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let phases = PhaseService::new(
            repo.clone(),
            users.clone(),
            submissions.clone(),
            clock.clone(),
        );
        let verification = VerificationService::new(
            repo.clone(),
            users.clone(),
            submissions.clone(),
            phases.clone(),
        );

        Self {
            db,
            phases: phases.clone(),
            bids: BidService::new(repo.clone(), verification.clone()),
            assignments: AssignmentService::new(
                repo.clone(),
                submissions,
                phases.clone(),
                verification.clone(),
            ),
            reviews: ReviewService::new(repo.clone(), verification.clone()),
            discussion: DiscussionService::new(repo.clone(), verification.clone(), clock),
            tracks: TrackService::new(repo, phases, verification),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(true)
        .json()
        .init();

    info!("Starting ReviewFlow v{}", reviewflow_common::VERSION);

    // Load configuration
    let config = AppConfig::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        e
    })?;

    // Initialize metrics
    metrics::register_metrics();
    if config.observability.metrics_port != 0 {
        let metrics_addr = SocketAddr::from(([0, 0, 0, 0], config.observability.metrics_port));
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(metrics_addr)
            .install()?;
        info!("Prometheus exporter listening on {}", metrics_addr);
    }

    // Initialize database connection
    info!("Connecting to database...");
    let db = DbPool::new(&config.database).await?;

    // Create app state
    let state = AppState::new(&config, db);

    // Build the router
    let app = create_router(state);

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    // API routes
    let api_routes = Router::new()
        // Health endpoints (no auth)
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        // Bidding
        .route("/papers/{paper_id}/bid", put(handlers::bids::place_bid))
        .route("/papers/{paper_id}/bids", get(handlers::bids::list_bids))
        // Assignment
        .route(
            "/papers/{paper_id}/assignments",
            post(handlers::assignments::assign_manually),
        )
        .route(
            "/papers/{paper_id}/reviewers",
            get(handlers::assignments::list_reviewers),
        )
        .route(
            "/tracks/{conference_id}/{track_id}/assignments",
            get(handlers::assignments::my_assignments),
        )
        .route(
            "/tracks/{conference_id}/{track_id}/assignments/auto",
            post(handlers::assignments::assign_automatically),
        )
        .route(
            "/tracks/{conference_id}/{track_id}/assignments/finalize",
            post(handlers::assignments::finalize_assignments),
        )
        // Reviews
        .route("/papers/{paper_id}/review", put(handlers::reviews::submit_review))
        .route(
            "/papers/{paper_id}/reviews/{reviewer_id}",
            get(handlers::reviews::get_review),
        )
        // Discussion
        .route(
            "/papers/{paper_id}/reviews/{reviewer_id}/comments",
            post(handlers::discussion::submit_comment)
                .get(handlers::discussion::list_comments),
        )
        .route(
            "/papers/{paper_id}/finalization",
            post(handlers::discussion::finalize),
        )
        // Phases
        .route("/papers/{paper_id}/phase", get(handlers::phases::paper_phase))
        .route(
            "/tracks/{conference_id}/{track_id}/phase",
            get(handlers::phases::track_phase),
        )
        // Track administration
        .route(
            "/tracks/{conference_id}/{track_id}/bidding-deadline",
            put(handlers::tracks::set_bidding_deadline)
                .get(handlers::tracks::get_bidding_deadline),
        )
        .route(
            "/tracks/{conference_id}/{track_id}/analytics",
            get(handlers::tracks::analytics),
        );

    // Compose the app
    Router::new()
        .nest("/v1", api_routes)
        .layer(axum::middleware::from_fn(middleware::track_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
