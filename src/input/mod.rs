pub mod reader;
pub mod types;

pub use reader::{rev_ids, InputError, DEFAULT_REV_ID_COLUMN};
pub use types::RevId;
