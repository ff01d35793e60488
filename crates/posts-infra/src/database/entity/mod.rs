//! Record codecs between domain entities and table items.

pub mod post;
