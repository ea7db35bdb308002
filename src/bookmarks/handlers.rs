use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::extractors::CurrentUser;
use crate::bookmarks::dto::BookmarkPayload;
use crate::error::{ApiError, FieldErrors};
use crate::state::AppState;
use crate::store::{Bookmark, BookmarkDraft};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookmarks", get(get_list))
        .route("/bookmarks", post(create))
        .route("/bookmarks/:id", get(get_by_id))
        .route("/bookmarks/:id", put(update))
        .route("/bookmarks/:id", delete(remove))
}

fn validate_payload(payload: &BookmarkPayload) -> Result<BookmarkDraft, ApiError> {
    let mut errors = FieldErrors::new();
    if payload.title.is_empty() {
        errors.insert("title".into(), vec!["title should not be empty".into()]);
    }
    if payload.link.is_empty() {
        errors.insert("link".into(), vec!["link should not be empty".into()]);
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }
    Ok(BookmarkDraft {
        title: payload.title.clone(),
        description: payload.description.clone(),
        link: payload.link.clone(),
    })
}

/// Fetch a bookmark and check ownership. Absent row and foreign row are
/// collapsed into the same not-found outcome so the existence of another
/// user's resource is never revealed.
async fn fetch_owned(state: &AppState, requester: Uuid, id: Uuid) -> Result<Bookmark, ApiError> {
    let bookmark = state
        .store
        .find_bookmark_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    if bookmark.user_id != requester {
        return Err(ApiError::NotFound);
    }
    Ok(bookmark)
}

#[instrument(skip(state, user))]
pub async fn get_list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Bookmark>>, ApiError> {
    let list = state.store.list_bookmarks_by_owner(user.id).await?;
    Ok(Json(list))
}

#[instrument(skip(state, user))]
pub async fn get_by_id(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Bookmark>, ApiError> {
    let bookmark = fetch_owned(&state, user.id, id).await?;
    Ok(Json(bookmark))
}

#[instrument(skip(state, user, payload))]
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<BookmarkPayload>,
) -> Result<(StatusCode, Json<Bookmark>), ApiError> {
    let draft = validate_payload(&payload)?;
    // Owner is always the requester, never client-supplied.
    let bookmark = state.store.create_bookmark(user.id, &draft).await?;
    info!(user_id = %user.id, bookmark_id = %bookmark.id, "bookmark created");
    Ok((StatusCode::CREATED, Json(bookmark)))
}

#[instrument(skip(state, user, payload))]
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<BookmarkPayload>,
) -> Result<Json<Bookmark>, ApiError> {
    let draft = validate_payload(&payload)?;
    fetch_owned(&state, user.id, id).await?;
    // The row may vanish between the check and the write; the store's
    // NotFound maps to the same 404.
    let bookmark = state.store.update_bookmark(id, &draft).await?;
    info!(user_id = %user.id, bookmark_id = %bookmark.id, "bookmark updated");
    Ok(Json(bookmark))
}

#[instrument(skip(state, user))]
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    fetch_owned(&state, user.id, id).await?;
    state.store.delete_bookmark(id).await?;
    info!(user_id = %user.id, bookmark_id = %id, "bookmark deleted");
    Ok(StatusCode::NO_CONTENT)
}
