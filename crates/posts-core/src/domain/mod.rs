//! Domain entities - the core business objects.

mod post;

pub use post::{DEFAULT_IMAGE_URL, Post, PostDraft, PostPatch, UNKNOWN_AUTHOR_ID};
