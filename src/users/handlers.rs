use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};

use crate::auth::extractors::CurrentUser;
use crate::error::{field_errors, ApiError};
use crate::state::AppState;
use crate::store::{StoreError, User, UserChanges};
use crate::users::dto::UpdateUserRequest;
use crate::validate::is_valid_email;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(get_me))
        .route("/users/me", put(update_me))
}

#[instrument(skip(user))]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<User> {
    // password_hash is stripped by serialization.
    Json(user)
}

#[instrument(skip(state, user, payload))]
pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    if payload.email.is_empty() || !is_valid_email(&payload.email) {
        return Err(ApiError::Validation(field_errors(
            "email",
            &["email must be an email"],
        )));
    }

    let changes = UserChanges {
        email: payload.email,
        first_name: payload.first_name,
        last_name: payload.last_name,
    };
    let updated = match state.store.update_user(user.id, &changes).await {
        Ok(updated) => updated,
        Err(StoreError::Conflict) => {
            return Err(ApiError::Duplicate(field_errors(
                "email",
                &["The email is already taken"],
            )))
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = %updated.id, "profile updated");
    Ok(Json(updated))
}
