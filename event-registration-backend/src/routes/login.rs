use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Redirect};
use axum::Form;
use axum_extra::extract::WithRejection;
use event_registration_config::Config;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::AppError;
use crate::session::{Identity, Session};

/// Either `password` for the admin login or `name` and `email` for a student login.
#[derive(Deserialize)]
pub struct LoginPayload {
    password: Option<String>,
    name: Option<String>,
    email: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

impl LoginPayload {
    fn identity(self, config: &Config) -> Option<Identity> {
        if let Some(password) = self.password.filter(|password| !password.is_empty()) {
            return if password == config.admin_password {
                Some(Identity::Admin)
            } else {
                None
            };
        }
        // students are not verified, any name and email is accepted
        match (non_empty(self.name), non_empty(self.email)) {
            (Some(name), Some(email)) => Some(Identity::Student { name, email }),
            _ => None,
        }
    }
}

pub async fn login(
    State(config): State<Arc<Config>>,
    session: Session,
    WithRejection(Form(payload), _): WithRejection<Form<LoginPayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let session = match payload.identity(&config) {
        Some(identity) => {
            info!(role = ?identity, "signed in");
            session.sign_in(identity)?
        }
        None => {
            warn!("rejected login attempt");
            session
        }
    };
    Ok((session, Redirect::to("/")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(password: Option<&str>, name: Option<&str>, email: Option<&str>) -> LoginPayload {
        LoginPayload {
            password: password.map(ToOwned::to_owned),
            name: name.map(ToOwned::to_owned),
            email: email.map(ToOwned::to_owned),
        }
    }

    fn config() -> Config {
        Config {
            admin_password: "secret".to_owned(),
            ..Config::default()
        }
    }

    #[test]
    fn admin_needs_the_configured_password() {
        assert_eq!(
            payload(Some("secret"), None, None).identity(&config()),
            Some(Identity::Admin)
        );
        assert_eq!(payload(Some("wrong"), None, None).identity(&config()), None);
    }

    #[test]
    fn wrong_password_does_not_fall_back_to_student() {
        assert_eq!(
            payload(Some("wrong"), Some("Ann"), Some("ann@x.com")).identity(&config()),
            None
        );
    }

    #[test]
    fn student_needs_name_and_email() {
        assert_eq!(
            payload(Some(""), Some(" Ann "), Some("ann@x.com")).identity(&config()),
            Some(Identity::Student {
                name: "Ann".to_owned(),
                email: "ann@x.com".to_owned(),
            })
        );
        assert_eq!(payload(None, Some("Ann"), Some("  ")).identity(&config()), None);
        assert_eq!(payload(None, None, Some("ann@x.com")).identity(&config()), None);
    }
}
