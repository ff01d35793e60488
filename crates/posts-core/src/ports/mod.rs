//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod clock;
mod id_generator;
mod repository;
mod table;

pub use clock::{Clock, FixedClock, SystemClock};
pub use id_generator::{IdGenerator, UlidGenerator};
pub use repository::PostRepository;
pub use table::{
    AttrValue, Condition, IndexSpec, Item, KeySchema, Query, TableKey, TableStore, UpdateItem,
};
