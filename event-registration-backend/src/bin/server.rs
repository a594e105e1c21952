use event_registration_backend::error::AppError;
use event_registration_backend::run_server;
use event_registration_backend::telemetry::setup_tracing;
use event_registration_config::get_config;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    setup_tracing();
    let config = get_config()?;
    run_server(config).await
}
