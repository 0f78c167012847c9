pub mod completion;
pub mod expand;
pub mod tasks;

pub use completion::{completion_of, completion_percentage};
pub use expand::{expand_day_type, instantiate};
