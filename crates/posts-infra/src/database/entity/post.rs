//! Post record for the single table.

use posts_core::StoreError;
use posts_core::domain::{Post, PostPatch, UNKNOWN_AUTHOR_ID};
use posts_core::ports::{AttrValue, Item};

use crate::database::schema::*;

/// Build the full record for a post, including every key mirror.
pub fn to_item(post: &Post) -> Item {
    let key = post_key(&post.id);

    let mut item = Item::new();
    item.insert(ATTR_PK.into(), key.partition.into());
    item.insert(ATTR_SK.into(), key.sort.into());
    item.insert(ATTR_GSI1PK.into(), POSTS_MARKER.into());
    item.insert(ATTR_GSI1SK.into(), post.date.clone().into());
    item.insert(ATTR_ID.into(), post.id.clone().into());
    item.insert(ATTR_TITLE.into(), post.title.clone().into());
    item.insert(ATTR_SLUG.into(), post.slug.clone().into());
    item.insert(ATTR_EXCERPT.into(), post.excerpt.clone().into());
    item.insert(ATTR_CONTENT.into(), post.content.clone().into());
    item.insert(ATTR_AUTHOR.into(), post.author.clone().into());
    item.insert(ATTR_AUTHOR_ID.into(), post.author_id.clone().into());
    item.insert(ATTR_DATE.into(), post.date.clone().into());
    item.insert(ATTR_TAGS.into(), post.tags.clone().into());
    item.insert(ATTR_IMAGE_URL.into(), post.image_url.clone().into());
    item.insert(ATTR_IS_DELETED.into(), post.is_deleted.into());
    item.insert(ATTR_DELETED_AT.into(), post.deleted_at.clone().into());
    item
}

/// Read a post back from its record.
///
/// Records written by older versions may lack bookkeeping fields; those are
/// back-filled so every returned post has the same shape.
pub fn from_item(mut item: Item) -> Result<Post, StoreError> {
    let id = match take_string(&mut item, ATTR_ID) {
        Some(id) => id,
        None => item
            .get(ATTR_PK)
            .and_then(AttrValue::as_str)
            .and_then(|pk| pk.strip_prefix(POST_PREFIX))
            .map(str::to_string)
            .ok_or_else(|| StoreError::Malformed("record has neither id nor PK".to_string()))?,
    };

    let mut required = |attr: &str| {
        take_string(&mut item, attr)
            .ok_or_else(|| StoreError::Malformed(format!("post {id} is missing {attr}")))
    };

    let title = required(ATTR_TITLE)?;
    let slug = required(ATTR_SLUG)?;
    let content = required(ATTR_CONTENT)?;
    let author = required(ATTR_AUTHOR)?;
    let date = required(ATTR_DATE)?;

    let tags = item
        .get(ATTR_TAGS)
        .and_then(AttrValue::as_list)
        .map(|values| {
            values
                .iter()
                .filter_map(AttrValue::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(Post {
        id,
        title,
        slug,
        excerpt: take_string(&mut item, ATTR_EXCERPT).unwrap_or_default(),
        content,
        author,
        author_id: take_string(&mut item, ATTR_AUTHOR_ID)
            .unwrap_or_else(|| UNKNOWN_AUTHOR_ID.to_string()),
        date,
        tags,
        image_url: take_string(&mut item, ATTR_IMAGE_URL).unwrap_or_default(),
        is_deleted: [ATTR_IS_DELETED, ATTR_LEGACY_IS_DELETED]
            .iter()
            .any(|attr| item.get(*attr).and_then(AttrValue::as_bool) == Some(true)),
        deleted_at: take_string(&mut item, ATTR_DELETED_AT)
            .or_else(|| take_string(&mut item, ATTR_LEGACY_DELETED_AT)),
    })
}

/// Assignments for a partial update.
///
/// Only entity fields are ever assigned. A new `date` also moves the
/// listing sort key so both land in the same write.
pub fn patch_assignments(patch: PostPatch) -> Vec<(String, AttrValue)> {
    let PostPatch {
        title,
        slug,
        excerpt,
        content,
        author,
        author_id,
        date,
        tags,
        image_url,
    } = patch;

    let mut assignments: Vec<(String, AttrValue)> = Vec::new();
    let mut set = |attr: &str, value: Option<AttrValue>| {
        if let Some(value) = value {
            assignments.push((attr.to_string(), value));
        }
    };

    set(ATTR_TITLE, title.map(Into::into));
    set(ATTR_SLUG, slug.map(Into::into));
    set(ATTR_EXCERPT, excerpt.map(Into::into));
    set(ATTR_CONTENT, content.map(Into::into));
    set(ATTR_AUTHOR, author.map(Into::into));
    set(ATTR_AUTHOR_ID, author_id.map(Into::into));
    set(ATTR_GSI1SK, date.clone().map(Into::into));
    set(ATTR_DATE, date.map(Into::into));
    set(ATTR_TAGS, tags.map(Into::into));
    set(ATTR_IMAGE_URL, image_url.map(Into::into));

    assignments
}

fn take_string(item: &mut Item, attr: &str) -> Option<String> {
    match item.remove(attr) {
        Some(AttrValue::S(s)) => Some(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Post {
        Post {
            id: "01HZX".into(),
            title: "Hello".into(),
            slug: "hello".into(),
            excerpt: "short".into(),
            content: "body".into(),
            author: "Ana".into(),
            author_id: "u-1".into(),
            date: "2024-05-01".into(),
            tags: vec!["rust".into(), "aws".into()],
            image_url: "/img.png".into(),
            is_deleted: false,
            deleted_at: None,
        }
    }

    #[test]
    fn test_record_carries_key_mirrors() {
        let item = to_item(&sample());
        assert_eq!(item[ATTR_PK], AttrValue::from("POST#01HZX"));
        assert_eq!(item[ATTR_SK], AttrValue::from(METADATA_SK));
        assert_eq!(item[ATTR_GSI1PK], AttrValue::from(POSTS_MARKER));
        assert_eq!(item[ATTR_GSI1SK], AttrValue::from("2024-05-01"));
        assert_eq!(item[ATTR_SLUG], AttrValue::from("hello"));
        assert_eq!(item[ATTR_DELETED_AT], AttrValue::Null);
        assert_eq!(from_item(item).unwrap(), sample());
    }

    #[test]
    fn test_legacy_record_is_backfilled() {
        let mut item = to_item(&sample());
        item.remove(ATTR_ID);
        item.remove(ATTR_AUTHOR_ID);
        item.remove(ATTR_TAGS);
        item.remove(ATTR_IS_DELETED);
        item.remove(ATTR_DELETED_AT);

        let post = from_item(item).unwrap();
        assert_eq!(post.id, "01HZX");
        assert_eq!(post.author_id, UNKNOWN_AUTHOR_ID);
        assert!(post.tags.is_empty());
        assert!(!post.is_deleted);
        assert_eq!(post.deleted_at, None);
    }

    #[test]
    fn test_snake_case_delete_flags_are_honoured() {
        let mut item = to_item(&sample());
        item.remove(ATTR_IS_DELETED);
        item.remove(ATTR_DELETED_AT);
        item.insert(ATTR_LEGACY_IS_DELETED.into(), true.into());
        item.insert(
            ATTR_LEGACY_DELETED_AT.into(),
            "2023-11-02T10:00:00.000Z".into(),
        );

        let post = from_item(item).unwrap();
        assert!(post.is_deleted);
        assert_eq!(post.deleted_at.as_deref(), Some("2023-11-02T10:00:00.000Z"));
    }

    #[test]
    fn test_either_delete_flag_marks_post_deleted() {
        let mut item = to_item(&sample());
        item.insert(ATTR_LEGACY_IS_DELETED.into(), false.into());
        item.insert(ATTR_IS_DELETED.into(), true.into());
        assert!(from_item(item).unwrap().is_deleted);
    }

    #[test]
    fn test_missing_required_field_is_malformed() {
        let mut item = to_item(&sample());
        item.remove(ATTR_TITLE);
        assert!(matches!(from_item(item), Err(StoreError::Malformed(_))));
    }

    #[test]
    fn test_date_patch_moves_listing_key() {
        let assignments = patch_assignments(PostPatch::new().date("2025-01-01").title("T"));
        let attrs: Vec<&str> = assignments.iter().map(|(a, _)| a.as_str()).collect();
        assert_eq!(attrs, vec![ATTR_TITLE, ATTR_GSI1SK, ATTR_DATE]);
        assert!(
            assignments
                .iter()
                .all(|(a, v)| a == ATTR_TITLE || *v == AttrValue::from("2025-01-01"))
        );
    }

    #[test]
    fn test_empty_patch_has_no_assignments() {
        assert!(patch_assignments(PostPatch::new()).is_empty());
    }
}
