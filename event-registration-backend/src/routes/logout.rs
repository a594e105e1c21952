use axum::response::{IntoResponse, Redirect};

use crate::session::Session;

pub async fn logout(session: Session) -> impl IntoResponse {
    (session.sign_out(), Redirect::to("/"))
}
