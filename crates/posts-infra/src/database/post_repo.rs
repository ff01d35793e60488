//! Post repository over a single table.

use std::sync::Arc;

use async_trait::async_trait;

use posts_core::domain::{Post, PostDraft, PostPatch};
use posts_core::error::{RepoError, StoreError};
use posts_core::ports::{
    AttrValue, Clock, Condition, IdGenerator, PostRepository, Query, SystemClock, TableStore,
    UlidGenerator, UpdateItem,
};

use super::entity::post::{from_item, patch_assignments, to_item};
use super::schema::{
    ATTR_DELETED_AT, ATTR_IS_DELETED, ATTR_LEGACY_IS_DELETED, ATTR_PK, LISTING_INDEX,
    POSTS_MARKER, SLUG_INDEX, post_key,
};

/// Post repository encoding the single-table layout on top of any [`TableStore`].
///
/// The store handle is shared; one repository can serve concurrent requests.
pub struct SingleTablePostRepository<S: ?Sized> {
    table: Arc<S>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl<S: TableStore + ?Sized> SingleTablePostRepository<S> {
    /// Repository with ULID ids and the system clock.
    pub fn new(table: Arc<S>) -> Self {
        Self::with_parts(table, Arc::new(UlidGenerator::new()), Arc::new(SystemClock))
    }

    pub fn with_parts(table: Arc<S>, ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self { table, ids, clock }
    }

    /// Conditions that hold only for records neither delete flag marks.
    fn live_only() -> [Condition; 2] {
        [
            Condition::not_equals(ATTR_IS_DELETED, true),
            Condition::not_equals(ATTR_LEGACY_IS_DELETED, true),
        ]
    }

    fn map_update_error(id: &str, err: StoreError) -> RepoError {
        match err {
            StoreError::ConditionFailed => RepoError::post_not_found(id),
            other => {
                tracing::error!(post_id = %id, error = %other, "Post update failed");
                other.into_write()
            }
        }
    }
}

#[async_trait]
impl<S: TableStore + ?Sized> PostRepository for SingleTablePostRepository<S> {
    async fn create(&self, mut draft: PostDraft) -> Result<String, RepoError> {
        let id = draft
            .id
            .take()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| self.ids.next_id());
        let post = draft.validate(id)?;

        tracing::debug!(post_id = %post.id, slug = %post.slug, "Creating post");

        self.table.put_item(to_item(&post)).await.map_err(|e| {
            tracing::error!(post_id = %post.id, error = %e, "Post create failed");
            e.into_write()
        })?;

        Ok(post.id)
    }

    async fn get(&self, id: &str) -> Result<Option<Post>, RepoError> {
        tracing::debug!(post_id = %id, "Getting post");

        let Some(item) = self
            .table
            .get_item(&post_key(id))
            .await
            .map_err(StoreError::into_read)?
        else {
            return Ok(None);
        };

        let post = from_item(item).map_err(StoreError::into_read)?;
        Ok((!post.is_deleted).then_some(post))
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        tracing::debug!(slug = %slug, "Getting post by slug");

        let by_slug = Query::new(SLUG_INDEX, slug);
        let items = self
            .table
            .query(Self::live_only().into_iter().fold(by_slug, Query::filter))
            .await
            .map_err(StoreError::into_read)?;

        if items.len() > 1 {
            tracing::warn!(slug = %slug, matches = items.len(), "Slug shared by several posts");
        }

        items
            .into_iter()
            .next()
            .map(from_item)
            .transpose()
            .map_err(StoreError::into_read)
    }

    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        let listing = Query::new(LISTING_INDEX, POSTS_MARKER).descending();
        let items = self
            .table
            .query(Self::live_only().into_iter().fold(listing, Query::filter))
            .await
            .map_err(StoreError::into_read)?;

        let posts: Vec<Post> = items
            .into_iter()
            .filter_map(|item| match from_item(item) {
                Ok(post) => Some(post),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed post record");
                    None
                }
            })
            .collect();

        tracing::debug!(count = posts.len(), "Listed posts");
        Ok(posts)
    }

    async fn update(&self, id: &str, patch: PostPatch) -> Result<(), RepoError> {
        patch.check()?;

        let assignments = patch_assignments(patch);
        if assignments.is_empty() {
            tracing::debug!(post_id = %id, "Empty update, nothing to write");
            return Ok(());
        }

        let fields: Vec<&str> = assignments.iter().map(|(attr, _)| attr.as_str()).collect();
        tracing::debug!(post_id = %id, fields = ?fields, "Updating post");

        let update = Self::live_only().into_iter().fold(
            UpdateItem::new(post_key(id), assignments)
                .map_err(StoreError::into_write)?
                .with_condition(Condition::attribute_exists(ATTR_PK)),
            UpdateItem::with_condition,
        );

        self.table
            .update_item(update)
            .await
            .map_err(|e| Self::map_update_error(id, e))
    }

    async fn delete(&self, id: &str) -> Result<(), RepoError> {
        let deleted_at = self.clock.now_iso();
        tracing::debug!(post_id = %id, deleted_at = %deleted_at, "Soft-deleting post");

        let update = UpdateItem::new(
            post_key(id),
            vec![
                (ATTR_IS_DELETED.to_string(), AttrValue::Bool(true)),
                (ATTR_DELETED_AT.to_string(), AttrValue::S(deleted_at)),
            ],
        )
        .map_err(StoreError::into_write)?
        .with_condition(Condition::attribute_exists(ATTR_PK));

        self.table
            .update_item(update)
            .await
            .map_err(|e| Self::map_update_error(id, e))
    }
}
