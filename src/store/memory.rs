//! In-memory [`Store`] used by router tests, mirroring the Postgres
//! implementation's error mapping.

use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{Bookmark, BookmarkDraft, Store, StoreError, User, UserChanges};

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    bookmarks: Vec<Bookmark>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.iter().any(|u| u.email == email) {
            return Err(StoreError::Conflict);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            first_name: None,
            last_name: None,
            created_at: OffsetDateTime::now_utc(),
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, changes: &UserChanges) -> Result<User, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner
            .users
            .iter()
            .any(|u| u.id != id && u.email == changes.email)
        {
            return Err(StoreError::Conflict);
        }
        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound)?;
        user.email = changes.email.clone();
        user.first_name = changes.first_name.clone();
        user.last_name = changes.last_name.clone();
        Ok(user.clone())
    }

    async fn find_bookmark_by_id(&self, id: Uuid) -> Result<Option<Bookmark>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.bookmarks.iter().find(|b| b.id == id).cloned())
    }

    async fn list_bookmarks_by_owner(&self, owner: Uuid) -> Result<Vec<Bookmark>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .bookmarks
            .iter()
            .filter(|b| b.user_id == owner)
            .cloned()
            .collect())
    }

    async fn create_bookmark(
        &self,
        owner: Uuid,
        draft: &BookmarkDraft,
    ) -> Result<Bookmark, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let bookmark = Bookmark {
            id: Uuid::new_v4(),
            user_id: owner,
            title: draft.title.clone(),
            description: draft.description.clone(),
            link: draft.link.clone(),
            created_at: OffsetDateTime::now_utc(),
        };
        inner.bookmarks.push(bookmark.clone());
        Ok(bookmark)
    }

    async fn update_bookmark(
        &self,
        id: Uuid,
        draft: &BookmarkDraft,
    ) -> Result<Bookmark, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let bookmark = inner
            .bookmarks
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(StoreError::NotFound)?;
        bookmark.title = draft.title.clone();
        bookmark.description = draft.description.clone();
        bookmark.link = draft.link.clone();
        Ok(bookmark.clone())
    }

    async fn delete_bookmark(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.bookmarks.len();
        inner.bookmarks.retain(|b| b.id != id);
        if inner.bookmarks.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
