use async_trait::async_trait;
use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

pub mod pg;

#[cfg(test)]
pub mod memory;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Opaque argon2 hash. Skipped on serialization so it can never leave
    /// the service boundary.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: Uuid,
    /// Owner id, stamped from the authenticated identity at creation and
    /// immutable afterwards.
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub link: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Full replacement for the caller's profile fields.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Full payload for a bookmark; update replaces all three fields.
#[derive(Debug, Clone)]
pub struct BookmarkDraft {
    pub title: String,
    pub description: Option<String>,
    pub link: String,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("row not found")]
    NotFound,
    #[error("unique constraint violation")]
    Conflict,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Persistence boundary. Every operation maps its error surface
/// deterministically onto [`StoreError`]: missing rows become `NotFound`,
/// unique-key violations become `Conflict`, everything else `Backend`.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError>;
    async fn update_user(&self, id: Uuid, changes: &UserChanges) -> Result<User, StoreError>;

    async fn find_bookmark_by_id(&self, id: Uuid) -> Result<Option<Bookmark>, StoreError>;
    async fn list_bookmarks_by_owner(&self, owner: Uuid) -> Result<Vec<Bookmark>, StoreError>;
    async fn create_bookmark(
        &self,
        owner: Uuid,
        draft: &BookmarkDraft,
    ) -> Result<Bookmark, StoreError>;
    async fn update_bookmark(
        &self,
        id: Uuid,
        draft: &BookmarkDraft,
    ) -> Result<Bookmark, StoreError>;
    async fn delete_bookmark(&self, id: Uuid) -> Result<(), StoreError>;
}
