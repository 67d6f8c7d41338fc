mod coordinator;

pub use coordinator::{CoordinatorView, EncodeReport};
