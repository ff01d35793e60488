use serde::{Deserialize, Serialize};

use crate::error::RepoError;

/// Author id assigned to posts written without one.
pub const UNKNOWN_AUTHOR_ID: &str = "unknown";

/// Cover image used when a post is created without one.
pub const DEFAULT_IMAGE_URL: &str = "/board.png";

/// Post entity - a blog post as stored and served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub author_id: String,
    /// ISO-8601 publication date, used for listing order.
    pub date: String,
    pub tags: Vec<String>,
    pub image_url: String,
    pub is_deleted: bool,
    pub deleted_at: Option<String>,
}

/// Payload for creating a post.
///
/// Every field is optional so that a missing required field is reported by
/// [`PostDraft::validate`] instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    pub id: Option<String>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub author_id: Option<String>,
    pub date: Option<String>,
    pub tags: Option<Vec<String>>,
    pub image_url: Option<String>,
}

impl PostDraft {
    /// Names of required fields that are absent or blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("slug", &self.slug),
            ("content", &self.content),
            ("author", &self.author),
            ("date", &self.date),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
        .map(|(name, _)| name)
        .collect()
    }

    /// Turn the draft into a live post with the given id.
    ///
    /// Optional fields fall back to their create-time defaults.
    pub fn validate(self, id: String) -> Result<Post, RepoError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(RepoError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        Ok(Post {
            id,
            title: self.title.unwrap_or_default(),
            slug: self.slug.unwrap_or_default(),
            excerpt: self.excerpt.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            author_id: self
                .author_id
                .unwrap_or_else(|| UNKNOWN_AUTHOR_ID.to_string()),
            date: self.date.unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
            image_url: self
                .image_url
                .unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string()),
            is_deleted: false,
            deleted_at: None,
        })
    }
}

/// Partial update of a post.
///
/// Only fields that are set are written. Keys and `id` have no place here,
/// so a request body carrying them deserializes with those entries dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub author_id: Option<String>,
    pub date: Option<String>,
    pub tags: Option<Vec<String>>,
    pub image_url: Option<String>,
}

impl PostPatch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn author_id(mut self, author_id: impl Into<String>) -> Self {
        self.author_id = Some(author_id.into());
        self
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Required fields the patch would set to a blank value.
    pub fn blank_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("slug", &self.slug),
            ("content", &self.content),
            ("author", &self.author),
            ("date", &self.date),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_some_and(|v| v.trim().is_empty()))
        .map(|(name, _)| name)
        .collect()
    }

    /// Reject a patch that would blank a required field.
    pub fn check(&self) -> Result<(), RepoError> {
        let blank = self.blank_fields();
        if blank.is_empty() {
            return Ok(());
        }

        Err(RepoError::Validation(format!(
            "required fields cannot be blank: {}",
            blank.join(", ")
        )))
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.slug.is_none()
            && self.excerpt.is_none()
            && self.content.is_none()
            && self.author.is_none()
            && self.author_id.is_none()
            && self.date.is_none()
            && self.tags.is_none()
            && self.image_url.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> PostDraft {
        PostDraft {
            title: Some("A".into()),
            slug: Some("a".into()),
            content: Some("c".into()),
            author: Some("X".into()),
            date: Some("2024-01-01".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_applies_defaults() {
        let post = draft().validate("01HX".into()).unwrap();
        assert_eq!(post.id, "01HX");
        assert_eq!(post.excerpt, "");
        assert_eq!(post.author_id, UNKNOWN_AUTHOR_ID);
        assert_eq!(post.image_url, DEFAULT_IMAGE_URL);
        assert!(post.tags.is_empty());
        assert!(!post.is_deleted);
        assert_eq!(post.deleted_at, None);
    }

    #[test]
    fn test_validate_reports_every_missing_field() {
        let draft = PostDraft {
            title: None,
            date: Some("   ".into()),
            ..draft()
        };
        let err = draft.validate("id".into()).unwrap_err();
        match err {
            RepoError::Validation(msg) => {
                assert!(msg.contains("title"));
                assert!(msg.contains("date"));
                assert!(!msg.contains("slug"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_patch_drops_key_fields() {
        let body = serde_json::json!({
            "id": "other",
            "PK": "POST#other",
            "SK": "METADATA",
            "GSI1PK": "POSTS",
            "title": "New"
        });
        let patch: PostPatch = serde_json::from_value(body).unwrap();
        assert_eq!(patch, PostPatch::new().title("New"));
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(PostPatch::new().is_empty());
        assert!(!PostPatch::new().tags(vec![]).is_empty());

        let only_keys: PostPatch =
            serde_json::from_value(serde_json::json!({ "id": "x", "GSI1SK": "y" })).unwrap();
        assert!(only_keys.is_empty());
    }

    #[test]
    fn test_patch_rejects_blank_required_fields() {
        assert!(PostPatch::new().check().is_ok());
        assert!(PostPatch::new().excerpt("").check().is_ok());

        let err = PostPatch::new().date("").slug("  ").title("T").check().unwrap_err();
        match err {
            RepoError::Validation(msg) => {
                assert!(msg.contains("slug"));
                assert!(msg.contains("date"));
                assert!(!msg.contains("title"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_post_serializes_camel_case() {
        let post = draft().validate("1".into()).unwrap();
        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["authorId"], "unknown");
        assert_eq!(value["imageUrl"], "/board.png");
        assert_eq!(value["isDeleted"], false);
        assert!(value["deletedAt"].is_null());
    }
}
