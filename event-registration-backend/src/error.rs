use core::convert::Infallible;

use axum::extract::rejection::{FormRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use event_registration_config::ConfigError;
use event_registration_database::error::DatabaseError;
use event_registration_database::PoolError;
use handlebars::{RenderError, TemplateError};
use tracing::error;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("form submission error: {0}")]
    FormRejection(#[from] FormRejection),
    #[error("path error: {0}")]
    PathRejection(#[from] PathRejection),
    #[error("IO error: {0}")]
    File(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
    #[error("render error: {0}")]
    Render(#[from] RenderError),
    #[error("forbidden")]
    Forbidden,
}

impl From<Infallible> for AppError {
    fn from(value: Infallible) -> Self {
        match value {}
    }
}

impl From<PoolError> for AppError {
    fn from(value: PoolError) -> Self {
        Self::Database(value.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::Forbidden => StatusCode::FORBIDDEN.into_response(),
            err @ Self::Database(DatabaseError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, err.to_string()).into_response()
            }
            err @ (Self::FormRejection(_)
            | Self::PathRejection(_)
            | Self::File(_)
            | Self::Json(_)
            | Self::Config(_)
            | Self::Database(_)
            | Self::Template(_)
            | Self::Render(_)) => {
                error!("{err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html("<h1>Internal Server Error</h1><p>an unexpected internal error occured.</p>"),
                )
                    .into_response()
            }
        }
    }
}
