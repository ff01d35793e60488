use async_trait::async_trait;

use crate::domain::{Post, PostDraft, PostPatch};
use crate::error::RepoError;

/// Post repository - every read and write the HTTP layer performs on posts.
///
/// Soft-deleted posts are invisible through this trait: reads treat them as
/// absent and updates report them as not found.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Store a new post and return its id.
    ///
    /// A fresh time-ordered id is assigned when the draft carries none.
    async fn create(&self, draft: PostDraft) -> Result<String, RepoError>;

    /// Find a live post by id.
    async fn get(&self, id: &str) -> Result<Option<Post>, RepoError>;

    /// Find a live post by slug.
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// All live posts, most recent `date` first.
    async fn list(&self) -> Result<Vec<Post>, RepoError>;

    /// Apply a partial update to a live post.
    async fn update(&self, id: &str, patch: PostPatch) -> Result<(), RepoError>;

    /// Soft-delete a post. Deleting twice refreshes `deletedAt`.
    async fn delete(&self, id: &str) -> Result<(), RepoError>;
}
