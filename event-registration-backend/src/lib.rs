pub mod error;
pub mod routes;
pub mod session;
pub mod telemetry;
pub mod templating;

use std::sync::Arc;

use axum::extract::FromRef;
use axum::routing::{get, post};
use axum::Router;
use axum_extra::extract::cookie::Key;
use error::AppError;
use event_registration_config::Config;
use event_registration_database::{create_schema, get_database_connection, Pool};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, SetRequestIdLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{info, warn};

use crate::routes::attendance::mark_attendance;
use crate::routes::events::create::{create_event, create_event_form};
use crate::routes::events::list::list;
use crate::routes::events::register::register;
use crate::routes::feedback::submit_feedback;
use crate::routes::index::index;
use crate::routes::login::login;
use crate::routes::logout::logout;
use crate::session::session_key;
use crate::templating::Templates;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: Pool,
    pub key: Key,
    pub templates: Arc<Templates>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Opens the database, creates missing tables and loads the templates.
    pub async fn new(config: Config) -> Result<Self, AppError> {
        for setting in config.insecure_defaults() {
            warn!("{setting} still has its built-in default, set it before going to production");
        }

        let pool = get_database_connection(&config.database_url)?;
        create_schema(&pool).await?;

        Ok(Self {
            pool,
            key: session_key(&config.secret_key),
            templates: Arc::new(Templates::new()?),
            config: Arc::new(config),
        })
    }
}

pub fn router(state: AppState) -> Router {
    let app = Router::new()
        .route("/", get(index))
        .route("/create_event", get(create_event_form).post(create_event))
        .route("/events", get(list).post(register))
        .route("/login", post(login))
        .route("/logout", get(logout))
        .route("/mark_attendance/:reg_id", post(mark_attendance))
        .route("/submit_feedback/:reg_id", post(submit_feedback))
        .with_state(state);

    // layers are in reverse order
    let app = app.layer(
        ServiceBuilder::new()
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::default().include_headers(true))
                    .on_response(DefaultOnResponse::default().include_headers(true)),
            )
            .layer(CatchPanicLayer::new()),
    );
    app.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

pub async fn setup_server(config: Config) -> Result<Router, AppError> {
    info!("starting up server...");
    Ok(router(AppState::new(config).await?))
}

pub async fn run_server(config: Config) -> Result<(), AppError> {
    let listen_address = config.listen_address;
    let app = setup_server(config).await?;

    let listener = TcpListener::bind(listen_address).await?;
    info!("listening on {listen_address}");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    warn!("SHUTDOWN");
    Ok(())
}

#[allow(clippy::redundant_pub_crate)]
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
