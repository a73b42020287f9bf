use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use roster_core::User;

use crate::app::AppState;
use crate::domains::errors::UsersError;

const COUNT_ERROR_BODY: &str = "Error";
const INTERNAL_ERROR_BODY: &str = "internal error";

fn map_count_error(error: UsersError) -> Response {
    match error {
        UsersError::NotFound | UsersError::Db(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, COUNT_ERROR_BODY).into_response()
        }
    }
}

fn map_random_error(error: UsersError) -> Response {
    match error {
        UsersError::NotFound => StatusCode::NOT_FOUND.into_response(),
        UsersError::Db(_) => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response(),
    }
}

fn user_response(user: &User) -> Response {
    match serde_json::to_vec(user) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(err) => {
            tracing::error!(event = "user_serialize_failed", error = %err, "marshal user");
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
        }
    }
}

// The body is brace-wrapped text, not JSON; clients parse it as such.
#[tracing::instrument(skip(state))]
pub(crate) async fn count_users(State(state): State<AppState>) -> Response {
    match state.users.count_users().await {
        Ok(count) => (StatusCode::OK, format!("{{count of user: {count}}}")).into_response(),
        Err(err) => map_count_error(err),
    }
}

#[tracing::instrument(skip(state))]
pub(crate) async fn random_user(State(state): State<AppState>) -> Response {
    match state.users.random_user().await {
        Ok(user) => user_response(&user),
        Err(err) => map_random_error(err),
    }
}
