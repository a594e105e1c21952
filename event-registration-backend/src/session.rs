use core::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::{IntoResponseParts, ResponseParts};
use axum::async_trait;
use axum_extra::extract::cookie::{Cookie, Key, SameSite};
use axum_extra::extract::PrivateCookieJar;
use event_registration_config::Config;
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha512};
use tracing::debug;

use crate::error::AppError;

/// The cookie key used to encrypt and authenticate the session cookie.
#[must_use]
pub fn session_key(secret: &str) -> Key {
    // Key::from needs exactly the 64 bytes a sha512 digest has
    Key::from(Sha512::digest(secret.as_bytes()).as_slice())
}

/// Who sent the request. Decoded from the session cookie for every request.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Identity {
    Anonymous,
    Admin,
    Student { name: String, email: String },
}

#[derive(Clone)]
#[must_use]
pub struct Session {
    private_cookies: PrivateCookieJar,
    identity: Identity,
    secure: bool,
}

impl Session {
    const COOKIE_NAME_SESSION: &'static str = "session";

    pub fn new(private_cookies: PrivateCookieJar, secure: bool) -> Self {
        let identity = private_cookies
            .get(Self::COOKIE_NAME_SESSION)
            .and_then(|cookie| match serde_json::from_str(cookie.value()) {
                Ok(identity) => Some(identity),
                Err(error) => {
                    debug!("ignoring unreadable session cookie: {error}");
                    None
                }
            })
            .unwrap_or(Identity::Anonymous);
        Self {
            private_cookies,
            identity,
            secure,
        }
    }

    #[must_use]
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn sign_in(self, identity: Identity) -> Result<Self, AppError> {
        let cookie = Cookie::build((Self::COOKIE_NAME_SESSION, serde_json::to_string(&identity)?))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure);
        Ok(Self {
            private_cookies: self.private_cookies.add(cookie),
            identity,
            secure: self.secure,
        })
    }

    pub fn sign_out(self) -> Self {
        let cookie = Cookie::build(Self::COOKIE_NAME_SESSION).path("/");
        Self {
            private_cookies: self.private_cookies.remove(cookie),
            identity: Identity::Anonymous,
            secure: self.secure,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    Key: FromRef<S>,
    Arc<Config>: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let private_cookies = PrivateCookieJar::<Key>::from_request_parts(parts, state).await?;
        let config = Arc::<Config>::from_ref(state);
        Ok(Self::new(private_cookies, config.secure_cookies))
    }
}

impl IntoResponseParts for Session {
    type Error = Infallible;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        self.private_cookies.into_response_parts(res)
    }
}

/// Passes only requests from an admin session.
pub struct RequireAdmin;

#[async_trait]
impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
    Key: FromRef<S>,
    Arc<Config>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        if *session.identity() == Identity::Admin {
            Ok(Self)
        } else {
            debug!(path = %parts.uri.path(), "admin role required");
            Err(AppError::Forbidden)
        }
    }
}

/// Passes only requests from a student session and hands out the student's identity.
pub struct RequireStudent {
    pub name: String,
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for RequireStudent
where
    S: Send + Sync,
    Key: FromRef<S>,
    Arc<Config>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Session::from_request_parts(parts, state).await?.identity {
            Identity::Student { name, email } => Ok(Self { name, email }),
            Identity::Anonymous | Identity::Admin => {
                debug!(path = %parts.uri.path(), "student role required");
                Err(AppError::Forbidden)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::header::COOKIE;
    use axum::http::HeaderMap;
    use axum::response::IntoResponse;

    use super::*;

    fn round_trip(session: Session, key: &Key) -> Session {
        let response = (session, ()).into_response();
        let mut headers = HeaderMap::new();
        for set_cookie in response.headers().get_all(axum::http::header::SET_COOKIE) {
            let set_cookie = set_cookie.to_str().unwrap();
            let pair = set_cookie.split(';').next().unwrap();
            headers.append(COOKIE, pair.parse().unwrap());
        }
        Session::new(PrivateCookieJar::from_headers(&headers, key.clone()), false)
    }

    #[test]
    fn session_key_is_deterministic() {
        let a = session_key("a secret");
        let b = session_key("a secret");
        let c = session_key("another secret");
        assert_eq!(a.master(), b.master());
        assert_ne!(a.master(), c.master());
    }

    #[test]
    fn identity_survives_the_cookie() {
        let key = session_key("test");
        let empty = Session::new(PrivateCookieJar::new(key.clone()), false);
        assert_eq!(*empty.identity(), Identity::Anonymous);

        let student = Identity::Student {
            name: "Ann".to_owned(),
            email: "ann@x.com".to_owned(),
        };
        let signed_in = empty.sign_in(student.clone()).unwrap();
        assert_eq!(*round_trip(signed_in, &key).identity(), student);
    }

    #[test]
    fn cookie_from_another_key_is_anonymous() {
        let session = Session::new(PrivateCookieJar::new(session_key("one")), false)
            .sign_in(Identity::Admin)
            .unwrap();
        let other_key = session_key("two");
        assert_eq!(
            *round_trip(session, &other_key).identity(),
            Identity::Anonymous
        );
    }

    #[test]
    fn sign_out_forgets_identity() {
        let key = session_key("test");
        let session = Session::new(PrivateCookieJar::new(key.clone()), false)
            .sign_in(Identity::Admin)
            .unwrap();
        let session = round_trip(session, &key).sign_out();
        assert_eq!(*session.identity(), Identity::Anonymous);
        assert_eq!(*round_trip(session, &key).identity(), Identity::Anonymous);
    }
}
