//! Retention side: directory selection, record scanning, date filtering,
//! interactive confirmation and deletion.

pub mod emptier;
pub mod guard;
pub mod policy;
pub mod reader;
pub mod selector;

pub use emptier::{Emptier, EmptyStats};
pub use guard::{DeletePass, Guard};
pub use policy::RetentionPolicy;
pub use reader::{list_entries, TrashEntry};
pub use selector::TrashDirsSelector;
