//! Single-table schema constants
//!
//! ## Table Layout
//!
//! ```text
//! Table: blog-website-table (configurable)
//!
//! Primary Key:
//!   - PK (String, Partition Key): "POST#<id>"
//!   - SK (String, Sort Key): "METADATA"
//!
//! TypeIndex (listing):
//!   - GSI1PK (String, Partition Key): "POSTS"
//!   - GSI1SK (String, Sort Key): mirrors `date`
//!
//! SlugIndex:
//!   - slug (String, Partition Key)
//!
//! Entity attributes:
//!   id, title, slug, excerpt, content, author, authorId, date, tags (List),
//!   imageUrl, isDeleted (Bool), deletedAt (String | Null)
//!
//! Older records may carry is_deleted / deleted_at instead.
//! ```

use posts_core::ports::{IndexSpec, KeySchema, TableKey};

/// Partition key attribute.
pub const ATTR_PK: &str = "PK";

/// Sort key attribute.
pub const ATTR_SK: &str = "SK";

/// Listing index partition attribute.
pub const ATTR_GSI1PK: &str = "GSI1PK";

/// Listing index sort attribute, always equal to `date`.
pub const ATTR_GSI1SK: &str = "GSI1SK";

pub const ATTR_ID: &str = "id";
pub const ATTR_TITLE: &str = "title";
pub const ATTR_SLUG: &str = "slug";
pub const ATTR_EXCERPT: &str = "excerpt";
pub const ATTR_CONTENT: &str = "content";
pub const ATTR_AUTHOR: &str = "author";
pub const ATTR_AUTHOR_ID: &str = "authorId";
pub const ATTR_DATE: &str = "date";
pub const ATTR_TAGS: &str = "tags";
pub const ATTR_IMAGE_URL: &str = "imageUrl";
pub const ATTR_IS_DELETED: &str = "isDeleted";
pub const ATTR_DELETED_AT: &str = "deletedAt";

/// Soft-delete flags as written by the first version of the blog backend.
/// Read alongside the camelCase pair; never written.
pub const ATTR_LEGACY_IS_DELETED: &str = "is_deleted";
pub const ATTR_LEGACY_DELETED_AT: &str = "deleted_at";

/// Prefix of every post partition key.
pub const POST_PREFIX: &str = "POST#";

/// Sort key of the post record.
pub const METADATA_SK: &str = "METADATA";

/// Listing index partition value shared by all posts.
pub const POSTS_MARKER: &str = "POSTS";

/// Default table name
pub const DEFAULT_TABLE_NAME: &str = "blog-website-table";

pub const KEY_SCHEMA: KeySchema = KeySchema {
    partition_attr: ATTR_PK,
    sort_attr: ATTR_SK,
};

/// All posts ordered by date.
pub const LISTING_INDEX: IndexSpec = IndexSpec {
    name: "TypeIndex",
    partition_attr: ATTR_GSI1PK,
    sort_attr: Some(ATTR_GSI1SK),
};

/// Direct lookup by slug.
pub const SLUG_INDEX: IndexSpec = IndexSpec {
    name: "SlugIndex",
    partition_attr: ATTR_SLUG,
    sort_attr: None,
};

/// Primary key of the post with the given id.
pub fn post_key(id: &str) -> TableKey {
    TableKey::new(format!("{POST_PREFIX}{id}"), METADATA_SK)
}
