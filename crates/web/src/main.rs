use axum::{
    extract::State,
    response::{Html, Redirect},
    routing::{get, post},
    Form, Router,
};
use costwatch_core::api::http::HttpDashboardApi;
use costwatch_core::controller::DashboardController;
use costwatch_core::domain::recommendation::RecommendationRef;
use costwatch_core::view::{lock, shared, MemoryView};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod page;

type Controller = DashboardController<HttpDashboardApi, MemoryView>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = costwatch_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    if let Err(e) = settings.require_positive_refresh() {
        sentry_anyhow::capture_anyhow(&e);
        return Err(e);
    }

    let api = Arc::new(HttpDashboardApi::from_settings(&settings)?);
    let controller = DashboardController::from_settings(api, shared(MemoryView::new()), &settings);

    let refresher = controller.clone();
    let refresh_task = tokio::spawn(async move {
        refresher.run(shutdown_signal()).await;
    });

    let state = AppState {
        controller,
        page_refresh_secs: settings.page_refresh_secs,
    };
    let app = router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], settings.port));

    tracing::info!(%addr, backend = settings.backend_url(), "dashboard listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = refresh_task.await;
    Ok(())
}

#[derive(Clone)]
struct AppState {
    controller: Controller,
    page_refresh_secs: u64,
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/healthz", get(healthz))
        .route("/trigger-scan", post(trigger_scan))
        .route("/recommendations", get(recommendations))
        .route("/recommendations/execute", post(execute_recommendation))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn dashboard(State(state): State<AppState>) -> Html<String> {
    let view = lock(state.controller.view()).clone();
    Html(page::dashboard(&view, state.page_refresh_secs))
}

// The control is engaged before redirecting so the next render shows the
// scanning state. The request runs on its own task so a client that navigates
// away does not cancel it.
async fn trigger_scan(State(state): State<AppState>) -> Redirect {
    match state.controller.begin_manual_scan() {
        Some(scan) => {
            tokio::spawn(async move {
                let outcome = scan.await;
                tracing::debug!(?outcome, "manual scan settled");
            });
        }
        None => tracing::debug!("manual scan already in progress"),
    }
    Redirect::to("/")
}

async fn recommendations(State(state): State<AppState>) -> Html<String> {
    let latest = state.controller.latest_recommendations().await;
    if let Err(e) = &latest {
        tracing::error!(error = %format!("{e:#}"), "error loading recommendations");
    }
    let view = lock(state.controller.view()).clone();
    Html(page::recommendations(&latest, &view, state.page_refresh_secs))
}

async fn execute_recommendation(
    State(state): State<AppState>,
    Form(picked): Form<RecommendationRef>,
) -> Redirect {
    let outcome = state.controller.execute_latest(&picked).await;
    tracing::info!(
        index = picked.index,
        resource_id = %picked.resource_id,
        ?outcome,
        "recommendation execution settled"
    );
    Redirect::to("/recommendations")
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &costwatch_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
