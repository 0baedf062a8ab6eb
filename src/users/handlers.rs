use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument};

use crate::state::AppState;
use crate::users::dto::{Message, RegisterRequest};
use crate::users::store::{NewUser, UserRecord};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/getusers", get(get_users))
}

/// POST /register: schema-check the payload and persist one user document.
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Message>), (StatusCode, Json<Message>)> {
    let draft = NewUser {
        name: payload.name,
        phone: payload.phone,
        email: payload.email,
        password: payload.password,
    };

    match state.store.insert(draft).await {
        Ok(user) => {
            info!(user_id = %user.id, email = %user.email, "user saved");
            Ok((
                StatusCode::CREATED,
                Json(Message::new("User registered successfully")),
            ))
        }
        Err(e) => {
            error!(error = %e, "saving user failed");
            Err(internal())
        }
    }
}

/// GET /getusers: the whole collection, verbatim.
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserRecord>>, (StatusCode, Json<Message>)> {
    match state.store.list().await {
        Ok(users) => Ok(Json(users)),
        Err(e) => {
            error!(error = %e, "fetching users failed");
            Err(internal())
        }
    }
}

fn internal() -> (StatusCode, Json<Message>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(Message::new("Internal Server Error")),
    )
}
