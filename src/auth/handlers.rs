use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::auth::{
    dto::{AuthRequest, TokenResponse},
    jwt::JwtKeys,
    password::{hash_password, verify_password},
};
use crate::error::{field_errors, ApiError, FieldErrors};
use crate::state::AppState;
use crate::store::StoreError;
use crate::validate::is_valid_email;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(sign_up))
        .route("/auth/signin", post(sign_in))
}

fn validate_credentials(payload: &AuthRequest) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();
    if payload.email.is_empty() {
        errors.insert(
            "email".into(),
            vec![
                "email must be an email".into(),
                "email should not be empty".into(),
            ],
        );
    } else if !is_valid_email(&payload.email) {
        errors.insert("email".into(), vec!["email must be an email".into()]);
    }
    if payload.password.is_empty() {
        errors.insert(
            "password".into(),
            vec!["password should not be empty".into()],
        );
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

fn duplicate_email() -> ApiError {
    ApiError::Duplicate(field_errors("email", &["The email is already taken"]))
}

#[instrument(skip(state, payload))]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(payload): Json<AuthRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    validate_credentials(&payload)?;

    if state
        .store
        .find_user_by_email(&payload.email)
        .await?
        .is_some()
    {
        warn!(email = %payload.email, "email already registered");
        return Err(duplicate_email());
    }

    let hash = hash_password(&payload.password)?;
    let user = match state.store.create_user(&payload.email, &hash).await {
        Ok(user) => user,
        // Lost the race against a concurrent sign-up with the same email.
        Err(StoreError::Conflict) => return Err(duplicate_email()),
        Err(e) => return Err(e.into()),
    };

    let access_token = JwtKeys::from_ref(&state).sign(user.id, &user.email)?;
    info!(user_id = %user.id, "user signed up");
    Ok((StatusCode::CREATED, Json(TokenResponse { access_token })))
}

#[instrument(skip(state, payload))]
pub async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<AuthRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    validate_credentials(&payload)?;

    // Unknown email and wrong password take the same exit so the response
    // cannot be used to enumerate accounts.
    let user = state
        .store
        .find_user_by_email(&payload.email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "sign-in with wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let access_token = JwtKeys::from_ref(&state).sign(user.id, &user.email)?;
    info!(user_id = %user.id, "user signed in");
    Ok(Json(TokenResponse { access_token }))
}
